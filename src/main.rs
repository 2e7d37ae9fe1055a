mod cli;

use std::io::{self, IsTerminal};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Config, Source};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let config = Config::parse();
    init_tracing(config.verbose);

    info!(
        class_name = %config.class_name,
        out_dir = %config.out_dir.display(),
        verbose = config.verbose,
        "options"
    );

    let source = match cli::load_source(&config.input) {
        Ok(source) => source,
        Err(err) => {
            eprint!("{}", err.render(""));
            return ExitCode::FAILURE;
        }
    };
    match &source {
        Source::File(path, _) => info!(path = %path.display(), "compiling program"),
        Source::Inline(_) => info!("compiling program"),
    }
    debug!(source = source.text(), "source text");

    match cli::run(&config, source.text()) {
        Ok(path) => {
            info!(path = %path.display(), "wrote class file");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprint!("{}", err.render(source.text()));
            ExitCode::FAILURE
        }
    }
}
