//! The JVM instructions the compiler emits.
//!
//! Only the subset ArLang needs is modelled. Discriminants are the real JVM
//! opcode bytes, so `op as u8` is the encoded instruction.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// A JVM opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum OpCode {
    // =========================================================================
    // Constants
    // =========================================================================
    /// Push int -1.
    IconstM1 = 0x02,
    /// Push int 0.
    Iconst0 = 0x03,
    /// Push int 1.
    Iconst1 = 0x04,
    /// Push int 2.
    Iconst2 = 0x05,
    /// Push int 3.
    Iconst3 = 0x06,
    /// Push int 4.
    Iconst4 = 0x07,
    /// Push int 5.
    Iconst5 = 0x08,
    /// Push a constant-pool int or string. Operand: u8 pool index.
    Ldc = 0x12,
    /// Push a constant-pool int or string. Operand: u16 pool index.
    LdcW = 0x13,

    // =========================================================================
    // Locals
    // =========================================================================
    /// Push an int local. Operand: u8 slot (u16 after `Wide`).
    Iload = 0x15,
    /// Pop into an int local. Operand: u8 slot (u16 after `Wide`).
    Istore = 0x36,
    /// Add a constant to an int local. Operands: u8 slot, i8 delta (u16, i16 after `Wide`).
    Iinc = 0x84,
    /// Widen the operands of the following `Iload`/`Istore`/`Iinc`.
    Wide = 0xc4,

    // =========================================================================
    // Stack
    // =========================================================================
    /// Swap the two top stack values.
    Swap = 0x5f,

    // =========================================================================
    // Arithmetic
    // =========================================================================
    Iadd = 0x60,
    Isub = 0x64,
    Imul = 0x68,
    Idiv = 0x6c,

    // =========================================================================
    // Control flow
    // =========================================================================
    /// Branch if `a < b`. Operand: i16 offset.
    IfIcmplt = 0xa1,
    /// Branch if `a >= b`. Operand: i16 offset.
    IfIcmpge = 0xa2,
    /// Branch if `a > b`. Operand: i16 offset.
    IfIcmpgt = 0xa3,
    /// Branch if `a <= b`. Operand: i16 offset.
    IfIcmple = 0xa4,
    /// Unconditional branch. Operand: i16 offset.
    Goto = 0xa7,
    /// Return from a void method.
    Return = 0xb1,

    // =========================================================================
    // Fields and calls
    // =========================================================================
    /// Push a static field. Operand: u16 Fieldref index.
    Getstatic = 0xb2,
    /// Call an instance method. Operand: u16 Methodref index.
    Invokevirtual = 0xb6,
}

impl OpCode {
    /// Decode an opcode byte.
    pub fn from_u8(byte: u8) -> Option<Self> {
        Self::try_from(byte).ok()
    }

    /// The dedicated push instruction for `value`, if it has one.
    pub fn iconst(value: i32) -> Option<Self> {
        Some(match value {
            -1 => OpCode::IconstM1,
            0 => OpCode::Iconst0,
            1 => OpCode::Iconst1,
            2 => OpCode::Iconst2,
            3 => OpCode::Iconst3,
            4 => OpCode::Iconst4,
            5 => OpCode::Iconst5,
            _ => return None,
        })
    }

    /// Mnemonic as printed by `javap`.
    pub fn name(&self) -> &'static str {
        match self {
            OpCode::IconstM1 => "ICONST_M1",
            OpCode::Iconst0 => "ICONST_0",
            OpCode::Iconst1 => "ICONST_1",
            OpCode::Iconst2 => "ICONST_2",
            OpCode::Iconst3 => "ICONST_3",
            OpCode::Iconst4 => "ICONST_4",
            OpCode::Iconst5 => "ICONST_5",
            OpCode::Ldc => "LDC",
            OpCode::LdcW => "LDC_W",
            OpCode::Iload => "ILOAD",
            OpCode::Istore => "ISTORE",
            OpCode::Iinc => "IINC",
            OpCode::Wide => "WIDE",
            OpCode::Swap => "SWAP",
            OpCode::Iadd => "IADD",
            OpCode::Isub => "ISUB",
            OpCode::Imul => "IMUL",
            OpCode::Idiv => "IDIV",
            OpCode::IfIcmplt => "IF_ICMPLT",
            OpCode::IfIcmpge => "IF_ICMPGE",
            OpCode::IfIcmpgt => "IF_ICMPGT",
            OpCode::IfIcmple => "IF_ICMPLE",
            OpCode::Goto => "GOTO",
            OpCode::Return => "RETURN",
            OpCode::Getstatic => "GETSTATIC",
            OpCode::Invokevirtual => "INVOKEVIRTUAL",
        }
    }

    /// Operand bytes following the opcode in its narrow form.
    ///
    /// `Wide` reports 0; the widened instruction after it is decoded by
    /// [`OpCode::wide_operand_size`].
    pub fn operand_size(&self) -> usize {
        match self {
            OpCode::Ldc | OpCode::Iload | OpCode::Istore => 1,
            OpCode::LdcW
            | OpCode::Iinc
            | OpCode::IfIcmplt
            | OpCode::IfIcmpge
            | OpCode::IfIcmpgt
            | OpCode::IfIcmple
            | OpCode::Goto
            | OpCode::Getstatic
            | OpCode::Invokevirtual => 2,
            _ => 0,
        }
    }

    /// Operand bytes of an instruction prefixed by `Wide`.
    pub fn wide_operand_size(&self) -> Option<usize> {
        match self {
            OpCode::Iload | OpCode::Istore => Some(2),
            OpCode::Iinc => Some(4),
            _ => None,
        }
    }

    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            OpCode::IfIcmplt | OpCode::IfIcmpge | OpCode::IfIcmpgt | OpCode::IfIcmple | OpCode::Goto
        )
    }
}
