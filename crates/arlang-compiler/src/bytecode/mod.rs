//! Bytecode building blocks for the generated class.
//!
//! - [`OpCode`]: the JVM instructions ArLang emits
//! - [`BytecodeChunk`]: the code array of `main`
//! - [`ConstantPool`]: deduplicated class-file constants

mod chunk;
mod constant;
mod opcode;

pub use chunk::BytecodeChunk;
pub use constant::{Constant, ConstantPool, MAX_ENTRIES};
pub use opcode::OpCode;
