//! The finished class file.

use arlang_core::CompileError;

use crate::bytecode::{BytecodeChunk, ConstantPool};

pub const MAGIC: u32 = 0xCAFE_BABE;
pub const MINOR_VERSION: u16 = 0;
/// Java 5. Branches need no `StackMapTable` at this version.
pub const MAJOR_VERSION: u16 = 49;

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_SUPER: u16 = 0x0020;

pub const SUPER_CLASS: &str = "java/lang/Object";
pub const MAIN_NAME: &str = "main";
pub const MAIN_DESCRIPTOR: &str = "([Ljava/lang/String;)V";

/// A compiled ArLang program: one public class with a static `main`.
///
/// Built once by [`Emitter::finalize`](crate::emit::Emitter::finalize) and
/// never modified afterwards.
#[derive(Debug, Clone)]
pub struct Module {
    class_name: String,
    code: BytecodeChunk,
    constants: ConstantPool,
    max_stack: u16,
    max_locals: u16,
    bytes: Vec<u8>,
}

impl Module {
    /// Lay out the class file. Adds the class-structure entries to `constants`
    /// before serializing it.
    pub(crate) fn assemble(
        class_name: String,
        code: BytecodeChunk,
        mut constants: ConstantPool,
        max_stack: u16,
        max_locals: u16,
    ) -> Result<Self, CompileError> {
        let this_class = constants.add_class(&class_name)?;
        let super_class = constants.add_class(SUPER_CLASS)?;
        let main_name = constants.add_utf8(MAIN_NAME)?;
        let main_descriptor = constants.add_utf8(MAIN_DESCRIPTOR)?;
        let code_name = constants.add_utf8("Code")?;

        if code.len() > u16::MAX as usize {
            return Err(CompileError::CodeTooLarge { length: code.len() });
        }
        let code_len = code.len() as u32;

        let mut bytes = Vec::with_capacity(128 + code.len());
        bytes.extend_from_slice(&MAGIC.to_be_bytes());
        bytes.extend_from_slice(&MINOR_VERSION.to_be_bytes());
        bytes.extend_from_slice(&MAJOR_VERSION.to_be_bytes());
        constants.write_to(&mut bytes)?;

        bytes.extend_from_slice(&(ACC_PUBLIC | ACC_SUPER).to_be_bytes());
        bytes.extend_from_slice(&this_class.to_be_bytes());
        bytes.extend_from_slice(&super_class.to_be_bytes());
        push_u16(&mut bytes, 0); // interfaces
        push_u16(&mut bytes, 0); // fields

        push_u16(&mut bytes, 1); // methods
        bytes.extend_from_slice(&(ACC_PUBLIC | ACC_STATIC).to_be_bytes());
        bytes.extend_from_slice(&main_name.to_be_bytes());
        bytes.extend_from_slice(&main_descriptor.to_be_bytes());
        push_u16(&mut bytes, 1); // method attributes

        // Code attribute: max_stack, max_locals, code_length, code,
        // exception_table_length, attributes_count
        let attribute_len = 2 + 2 + 4 + code_len + 2 + 2;
        bytes.extend_from_slice(&code_name.to_be_bytes());
        bytes.extend_from_slice(&attribute_len.to_be_bytes());
        bytes.extend_from_slice(&max_stack.to_be_bytes());
        bytes.extend_from_slice(&max_locals.to_be_bytes());
        bytes.extend_from_slice(&code_len.to_be_bytes());
        bytes.extend_from_slice(code.code());
        push_u16(&mut bytes, 0); // exception table
        push_u16(&mut bytes, 0); // code attributes

        push_u16(&mut bytes, 0); // class attributes

        Ok(Self {
            class_name,
            code,
            constants,
            max_stack,
            max_locals,
            bytes,
        })
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// `<ClassName>.class`
    pub fn file_name(&self) -> String {
        format!("{}.class", self.class_name)
    }

    /// The serialized class file.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The code array of `main`.
    pub fn code(&self) -> &BytecodeChunk {
        &self.code
    }

    pub fn constants(&self) -> &ConstantPool {
        &self.constants
    }

    pub fn max_stack(&self) -> u16 {
        self.max_stack
    }

    pub fn max_locals(&self) -> u16 {
        self.max_locals
    }
}

fn push_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::{Constant, OpCode};

    fn return_only() -> Module {
        let mut code = BytecodeChunk::new();
        code.write_op(OpCode::Return);
        Module::assemble("Hello".into(), code, ConstantPool::new(), 0, 1).unwrap()
    }

    #[test]
    fn header() {
        let module = return_only();
        let bytes = module.as_bytes();
        assert_eq!(&bytes[0..4], &[0xca, 0xfe, 0xba, 0xbe]);
        assert_eq!(&bytes[4..6], &[0, 0]);
        assert_eq!(&bytes[6..8], &[0, 49]);
    }

    #[test]
    fn class_structure_constants() {
        let module = return_only();
        let pool = module.constants();
        assert!(pool.find(&Constant::Utf8("Hello".into())).is_some());
        assert!(pool.find(&Constant::Utf8(SUPER_CLASS.into())).is_some());
        assert!(pool.find(&Constant::Utf8(MAIN_DESCRIPTOR.into())).is_some());
        assert!(pool.find(&Constant::Utf8("Code".into())).is_some());
    }

    #[test]
    fn trailer_holds_code_attribute() {
        let module = return_only();
        let bytes = module.as_bytes();
        // ... max_stack, max_locals, code_length, RETURN, 0, 0, class attrs 0
        let tail = &bytes[bytes.len() - 15..];
        assert_eq!(
            tail,
            &[0, 0, 0, 1, 0, 0, 0, 1, 0xb1, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(module.max_locals(), 1);
    }

    fn code_of_len(len: usize) -> BytecodeChunk {
        let mut code = BytecodeChunk::new();
        for _ in 0..len - 1 {
            code.write_op(OpCode::Swap);
        }
        code.write_op(OpCode::Return);
        code
    }

    #[test]
    fn code_at_the_length_limit() {
        let module = Module::assemble("Big".into(), code_of_len(65535), ConstantPool::new(), 0, 1)
            .unwrap();
        assert_eq!(module.code().len(), 65535);
    }

    #[test]
    fn code_past_the_length_limit() {
        let err = Module::assemble("Big".into(), code_of_len(65536), ConstantPool::new(), 0, 1)
            .unwrap_err();
        assert_eq!(err, CompileError::CodeTooLarge { length: 65536 });
    }

    #[test]
    fn file_name() {
        assert_eq!(return_only().file_name(), "Hello.class");
    }
}
