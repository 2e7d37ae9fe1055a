//! Instruction emitter for the generated `main` method.
//!
//! The [`Emitter`] owns the code array, the constant pool and the local slot
//! and operand-stack counters. The code generator drives it through a small
//! set of primitives and never writes bytes itself.
//!
//! # Example
//!
//! ```
//! use arlang_compiler::emit::Emitter;
//! use arlang_core::{Literal, ValueKind};
//!
//! let mut emitter = Emitter::new();
//! emitter.begin("Hello").unwrap();
//! emitter.emit_literal(&Literal::Integer(5)).unwrap();
//! emitter.emit_print(ValueKind::Int).unwrap();
//! let module = emitter.finalize().unwrap();
//!
//! assert_eq!(module.max_stack(), 2);
//! assert_eq!(module.file_name(), "Hello.class");
//! ```

mod jumps;

use std::fmt;

use arlang_core::{CompileError, Literal, ValueKind};
use arlang_parser::ast::BinaryOp;
use tracing::{debug, trace};

use crate::bytecode::{BytecodeChunk, ConstantPool, OpCode};
use crate::module::Module;

pub use jumps::{LoopLabel, LoopStack};

type Result<T> = std::result::Result<T, CompileError>;

/// Largest `max_locals` a method can declare.
pub const MAX_LOCALS: usize = u16::MAX as usize;

const SYSTEM: &str = "java/lang/System";
const PRINT_STREAM: &str = "java/io/PrintStream";
const PRINT_STREAM_DESCRIPTOR: &str = "Ljava/io/PrintStream;";

/// A local variable slot of `main`. Slot 0 holds the `String[]` argument and
/// is never handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(u16);

impl Slot {
    pub fn index(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The branch that leaves a loop when `op` no longer holds.
///
/// Returns `None` for operators a loop guard cannot test.
pub fn negated_branch(op: BinaryOp) -> Option<OpCode> {
    match op {
        BinaryOp::Lt => Some(OpCode::IfIcmpge),
        BinaryOp::Lte => Some(OpCode::IfIcmpgt),
        BinaryOp::Gt => Some(OpCode::IfIcmple),
        BinaryOp::Gte => Some(OpCode::IfIcmplt),
        BinaryOp::Eq | BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => None,
    }
}

/// Emits the single method of a class.
///
/// Every primitive except [`begin`](Self::begin) fails with
/// [`CompileError::EmitterState`] unless a module is open.
#[derive(Debug, Default)]
pub struct Emitter {
    /// `Some` between `begin` and `finalize`.
    class_name: Option<String>,
    chunk: BytecodeChunk,
    constants: ConstantPool,
    loops: LoopStack,
    /// Number of slots handed out so far.
    slots: u16,
    depth: u32,
    max_depth: u32,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a module for class `class_name`.
    pub fn begin(&mut self, class_name: &str) -> Result<()> {
        if self.is_open() {
            return Err(CompileError::EmitterState {
                operation: "begin",
                reason: "a module is already open",
            });
        }
        *self = Self {
            class_name: Some(class_name.to_owned()),
            ..Self::default()
        };
        debug!(class = class_name, "module begun");
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.class_name.is_some()
    }

    // ==========================================================================
    // Values
    // ==========================================================================

    /// Push a literal.
    ///
    /// Integers in -1..=5 use `ICONST_*` and never touch the constant pool.
    /// Every other integer, and all text, is loaded from the pool.
    pub fn emit_literal(&mut self, literal: &Literal) -> Result<()> {
        self.ensure_open("emit literal")?;
        match literal {
            Literal::Integer(value) => match OpCode::iconst(*value) {
                Some(op) => self.emit_op(op),
                None => {
                    let index = self.constants.add_integer(*value)?;
                    self.emit_ldc(index);
                }
            },
            Literal::Text(text) => {
                let index = self.constants.add_string(text)?;
                self.emit_ldc(index);
            }
        }
        self.push(1);
        Ok(())
    }

    /// Pop two integers and push the result of `op`.
    ///
    /// Only `+ - * /` are accepted.
    pub fn emit_binary_op(&mut self, op: BinaryOp) -> Result<()> {
        self.ensure_open("emit binary op")?;
        let opcode = match op {
            BinaryOp::Add => OpCode::Iadd,
            BinaryOp::Sub => OpCode::Isub,
            BinaryOp::Mul => OpCode::Imul,
            BinaryOp::Div => OpCode::Idiv,
            BinaryOp::Eq | BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
                return Err(CompileError::UnsupportedOperator {
                    op: op.to_string(),
                    span: Default::default(),
                });
            }
        };
        self.require(2, "emit binary op")?;
        self.emit_op(opcode);
        self.pop(2);
        self.push(1);
        Ok(())
    }

    // ==========================================================================
    // Locals
    // ==========================================================================

    /// Allocate the next local slot. Slots are handed out in increasing
    /// order starting at 1.
    pub fn declare_slot(&mut self) -> Result<Slot> {
        self.ensure_open("declare slot")?;
        if self.slots as usize + 1 >= MAX_LOCALS {
            return Err(CompileError::TooManyLocals { limit: MAX_LOCALS });
        }
        self.slots += 1;
        let slot = Slot(self.slots);
        trace!(%slot, "slot declared");
        Ok(slot)
    }

    /// Pop the top of the stack into `slot`.
    pub fn emit_store(&mut self, slot: Slot) -> Result<()> {
        self.ensure_open("emit store")?;
        self.require(1, "emit store")?;
        self.emit_local(OpCode::Istore, slot);
        self.pop(1);
        Ok(())
    }

    /// Push the value of `slot`.
    pub fn emit_load(&mut self, slot: Slot) -> Result<()> {
        self.ensure_open("emit load")?;
        self.emit_local(OpCode::Iload, slot);
        self.push(1);
        Ok(())
    }

    /// Add `delta` to `slot` in place.
    pub fn emit_increment(&mut self, slot: Slot, delta: i16) -> Result<()> {
        self.ensure_open("emit increment")?;
        match (u8::try_from(slot.0), i8::try_from(delta)) {
            (Ok(index), Ok(delta)) => {
                self.emit_op(OpCode::Iinc);
                self.chunk.write_byte(index);
                self.chunk.write_byte(delta as u8);
            }
            _ => {
                self.emit_op(OpCode::Wide);
                self.emit_op(OpCode::Iinc);
                self.chunk.write_u16(slot.0);
                self.chunk.write_i16(delta);
            }
        }
        Ok(())
    }

    // ==========================================================================
    // Loops
    // ==========================================================================

    /// Place the top label of a new loop at the current offset.
    pub fn begin_loop(&mut self) -> Result<LoopLabel> {
        self.ensure_open("begin loop")?;
        let label = self.loops.enter(self.chunk.current_offset());
        trace!(depth = self.loops.depth(), "loop begun");
        Ok(label)
    }

    /// Compare the two values on the stack and leave the loop when `op`
    /// does not hold.
    pub fn emit_loop_guard(&mut self, op: BinaryOp, label: LoopLabel) -> Result<()> {
        self.ensure_open("emit loop guard")?;
        let Some(branch) = negated_branch(op) else {
            return Err(CompileError::InvalidLoopCondition {
                op: op.to_string(),
                span: Default::default(),
            });
        };
        self.require(2, "emit loop guard")?;
        let at = self.chunk.current_offset();
        self.loops.set_guard(label, at, "emit loop guard")?;
        trace!(offset = at, op = branch.name(), "emit");
        self.chunk.emit_branch(branch);
        self.pop(2);
        Ok(())
    }

    /// Jump back to the top of `label`'s loop.
    pub fn emit_loop_back(&mut self, label: LoopLabel) -> Result<()> {
        self.ensure_open("emit loop back")?;
        let top = self.loops.top(label, "emit loop back")?;
        trace!(offset = self.chunk.current_offset(), op = "GOTO", "emit");
        self.chunk.emit_branch_to(OpCode::Goto, top)
    }

    /// Close `label`'s loop and point its guard at the current offset.
    pub fn end_loop(&mut self, label: LoopLabel) -> Result<()> {
        self.ensure_open("end loop")?;
        if let Some(guard) = self.loops.exit(label)? {
            self.chunk.patch_branch(guard, self.chunk.current_offset())?;
        }
        Ok(())
    }

    // ==========================================================================
    // Output
    // ==========================================================================

    /// Print the value on top of the stack with `System.out.println`.
    pub fn emit_print(&mut self, kind: ValueKind) -> Result<()> {
        self.ensure_open("emit print")?;
        self.require(1, "emit print")?;
        let descriptor = match kind {
            ValueKind::Int => "(I)V",
            ValueKind::Text => "(Ljava/lang/String;)V",
        };
        let out = self
            .constants
            .add_field_ref(SYSTEM, "out", PRINT_STREAM_DESCRIPTOR)?;
        let println = self
            .constants
            .add_method_ref(PRINT_STREAM, "println", descriptor)?;

        self.emit_op(OpCode::Getstatic);
        self.chunk.write_u16(out);
        self.push(1);
        self.emit_op(OpCode::Swap);
        self.emit_op(OpCode::Invokevirtual);
        self.chunk.write_u16(println);
        self.pop(2);
        Ok(())
    }

    /// Close `main` with `RETURN` and build the class file.
    ///
    /// The emitter is left empty and may `begin` another module.
    pub fn finalize(&mut self) -> Result<Module> {
        self.ensure_open("finalize")?;
        if !self.loops.is_empty() {
            return Err(CompileError::EmitterState {
                operation: "finalize",
                reason: "a loop is still open",
            });
        }
        self.emit_op(OpCode::Return);

        let Self {
            class_name,
            chunk,
            constants,
            slots,
            max_depth,
            ..
        } = std::mem::take(self);
        let class_name = class_name.unwrap_or_default();
        let max_stack = u16::try_from(max_depth).unwrap_or(u16::MAX);
        let max_locals = slots + 1;

        debug!(
            class = %class_name,
            code_len = chunk.len(),
            max_stack,
            max_locals,
            "module finalized"
        );
        Module::assemble(class_name, chunk, constants, max_stack, max_locals)
    }

    // ==========================================================================
    // Inspection
    // ==========================================================================

    pub fn chunk(&self) -> &BytecodeChunk {
        &self.chunk
    }

    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    /// Current operand-stack depth.
    pub fn stack_depth(&self) -> u32 {
        self.depth
    }

    /// Number of slots declared in the open module.
    pub fn declared_slots(&self) -> u16 {
        self.slots
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if !self.is_open() {
            return Err(CompileError::EmitterState {
                operation,
                reason: "no module has begun",
            });
        }
        Ok(())
    }

    fn require(&self, values: u32, operation: &'static str) -> Result<()> {
        if self.depth < values {
            return Err(CompileError::EmitterState {
                operation,
                reason: "not enough values on the operand stack",
            });
        }
        Ok(())
    }

    fn emit_op(&mut self, op: OpCode) {
        trace!(offset = self.chunk.current_offset(), op = op.name(), "emit");
        self.chunk.write_op(op);
    }

    fn emit_ldc(&mut self, index: u16) {
        match u8::try_from(index) {
            Ok(narrow) => {
                self.emit_op(OpCode::Ldc);
                self.chunk.write_byte(narrow);
            }
            Err(_) => {
                self.emit_op(OpCode::LdcW);
                self.chunk.write_u16(index);
            }
        }
    }

    fn emit_local(&mut self, op: OpCode, slot: Slot) {
        match u8::try_from(slot.0) {
            Ok(narrow) => {
                self.emit_op(op);
                self.chunk.write_byte(narrow);
            }
            Err(_) => {
                self.emit_op(OpCode::Wide);
                self.emit_op(op);
                self.chunk.write_u16(slot.0);
            }
        }
    }

    fn push(&mut self, values: u32) {
        self.depth += values;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn pop(&mut self, values: u32) {
        self.depth = self.depth.saturating_sub(values);
    }
}
