//! The instruction stream of the generated `main` method.

use arlang_core::CompileError;

use super::OpCode;

/// A growable JVM code array.
///
/// Multi-byte operands are written big-endian. Branch operands are signed
/// offsets relative to the address of the branch opcode itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytecodeChunk {
    code: Vec<u8>,
}

impl BytecodeChunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_op(&mut self, op: OpCode) {
        self.code.push(op.into());
    }

    pub fn write_byte(&mut self, byte: u8) {
        self.code.push(byte);
    }

    /// Write a 16-bit operand (big-endian).
    pub fn write_u16(&mut self, value: u16) {
        self.code.extend_from_slice(&value.to_be_bytes());
    }

    /// Write a signed 16-bit operand (big-endian).
    pub fn write_i16(&mut self, value: i16) {
        self.code.extend_from_slice(&value.to_be_bytes());
    }

    /// Offset of the next byte to be written.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Emit a forward branch with a zero placeholder offset.
    ///
    /// Returns the address of the branch opcode, to be handed to
    /// [`patch_branch`](Self::patch_branch) once the target is known.
    pub fn emit_branch(&mut self, op: OpCode) -> usize {
        let at = self.current_offset();
        self.write_op(op);
        self.write_i16(0);
        at
    }

    /// Point the branch at `at` to `target`.
    pub fn patch_branch(&mut self, at: usize, target: usize) -> Result<(), CompileError> {
        let offset = branch_offset(at, target)?.to_be_bytes();
        self.code[at + 1] = offset[0];
        self.code[at + 2] = offset[1];
        Ok(())
    }

    /// Emit a branch to an already-known (usually backward) target.
    pub fn emit_branch_to(&mut self, op: OpCode, target: usize) -> Result<(), CompileError> {
        let offset = branch_offset(self.current_offset(), target)?;
        self.write_op(op);
        self.write_i16(offset);
        Ok(())
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn read_byte(&self, offset: usize) -> Option<u8> {
        self.code.get(offset).copied()
    }

    /// Read a u16 at the given offset (big-endian).
    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        let bytes = self.code.get(offset..offset + 2)?;
        Some(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    /// Read an i16 at the given offset (big-endian).
    pub fn read_i16(&self, offset: usize) -> Option<i16> {
        self.read_u16(offset).map(|value| value as i16)
    }

    pub fn read_op(&self, offset: usize) -> Option<OpCode> {
        self.code.get(offset).and_then(|&b| OpCode::from_u8(b))
    }

    /// Decode the stream into `(address, opcode)` pairs, skipping operands.
    ///
    /// A `Wide` prefix is reported as its own entry, followed by the widened
    /// instruction at the next address.
    pub fn instructions(&self) -> Vec<(usize, OpCode)> {
        let mut instructions = Vec::new();
        let mut offset = 0;
        while offset < self.code.len() {
            let Some(op) = self.read_op(offset) else {
                offset += 1;
                continue;
            };
            instructions.push((offset, op));
            if op != OpCode::Wide {
                offset += 1 + op.operand_size();
                continue;
            }
            match self.read_op(offset + 1) {
                Some(widened) => {
                    instructions.push((offset + 1, widened));
                    offset += 2 + widened.wide_operand_size().unwrap_or(0);
                }
                None => offset += 1,
            }
        }
        instructions
    }

    /// All opcodes in order, without operands.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.instructions().into_iter().map(|(_, op)| op).collect()
    }

    /// Assert this chunk holds exactly the given opcode sequence.
    #[track_caller]
    pub fn assert_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        assert_eq!(
            actual,
            expected,
            "Bytecode mismatch.\nExpected: {:?}\nActual:   {:?}",
            expected.iter().map(|op| op.name()).collect::<Vec<_>>(),
            actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
        );
    }

    /// Assert the given opcodes appear in order, not necessarily contiguously.
    #[track_caller]
    pub fn assert_contains_opcodes(&self, expected: &[OpCode]) {
        let actual = self.opcodes();
        let mut remaining = expected.iter().peekable();
        for op in &actual {
            if remaining.peek() == Some(&op) {
                remaining.next();
            }
        }
        if remaining.peek().is_some() {
            panic!(
                "Missing opcodes in sequence.\nExpected to find: {:?}\nActual bytecode:  {:?}",
                remaining.map(|op| op.name()).collect::<Vec<_>>(),
                actual.iter().map(|op| op.name()).collect::<Vec<_>>(),
            );
        }
    }
}

fn branch_offset(at: usize, target: usize) -> Result<i16, CompileError> {
    let distance = target as i64 - at as i64;
    i16::try_from(distance).map_err(|_| CompileError::BranchOutOfRange { distance })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chunk_is_empty() {
        let chunk = BytecodeChunk::new();
        assert!(chunk.is_empty());
        assert_eq!(chunk.read_byte(0), None);
    }

    #[test]
    fn write_op_and_operands() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Getstatic);
        chunk.write_u16(0x0102);
        chunk.write_op(OpCode::Ldc);
        chunk.write_byte(7);
        assert_eq!(chunk.code(), &[0xb2, 0x01, 0x02, 0x12, 7]);
        assert_eq!(chunk.read_u16(1), Some(0x0102));
        assert_eq!(chunk.read_op(3), Some(OpCode::Ldc));
    }

    #[test]
    fn forward_branch_is_relative_to_opcode() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Iconst1);
        let at = chunk.emit_branch(OpCode::IfIcmpge);
        chunk.write_op(OpCode::Iconst2);
        chunk.write_op(OpCode::Iconst3);
        let target = chunk.current_offset();
        chunk.patch_branch(at, target).unwrap();

        assert_eq!(at, 1);
        // branch at 1, target at 6
        assert_eq!(chunk.read_i16(2), Some(5));
    }

    #[test]
    fn backward_branch_is_negative() {
        let mut chunk = BytecodeChunk::new();
        let top = chunk.current_offset();
        chunk.write_op(OpCode::Iconst0);
        chunk.write_op(OpCode::Iconst0);
        chunk.emit_branch_to(OpCode::Goto, top).unwrap();

        assert_eq!(chunk.read_op(2), Some(OpCode::Goto));
        assert_eq!(chunk.read_i16(3), Some(-2));
    }

    #[test]
    fn branch_out_of_range() {
        let mut chunk = BytecodeChunk::new();
        let at = chunk.emit_branch(OpCode::Goto);
        let err = chunk.patch_branch(at, 40_000).unwrap_err();
        assert_eq!(err, CompileError::BranchOutOfRange { distance: 40_000 });
    }

    #[test]
    fn opcodes_skip_operands_and_decode_wide() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Ldc);
        chunk.write_byte(3);
        chunk.write_op(OpCode::Wide);
        chunk.write_op(OpCode::Istore);
        chunk.write_u16(300);
        chunk.write_op(OpCode::Wide);
        chunk.write_op(OpCode::Iinc);
        chunk.write_u16(300);
        chunk.write_i16(1);
        chunk.write_op(OpCode::Return);

        chunk.assert_opcodes(&[
            OpCode::Ldc,
            OpCode::Wide,
            OpCode::Istore,
            OpCode::Wide,
            OpCode::Iinc,
            OpCode::Return,
        ]);
        assert_eq!(chunk.instructions().last(), Some(&(12, OpCode::Return)));
    }

    #[test]
    fn contains_opcodes_in_order() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Iconst1);
        chunk.write_op(OpCode::Iconst2);
        chunk.write_op(OpCode::Iadd);
        chunk.write_op(OpCode::Return);
        chunk.assert_contains_opcodes(&[OpCode::Iconst1, OpCode::Iadd, OpCode::Return]);
    }

    #[test]
    #[should_panic(expected = "Missing opcodes")]
    fn contains_opcodes_reports_missing() {
        let mut chunk = BytecodeChunk::new();
        chunk.write_op(OpCode::Return);
        chunk.assert_contains_opcodes(&[OpCode::Iadd]);
    }
}
