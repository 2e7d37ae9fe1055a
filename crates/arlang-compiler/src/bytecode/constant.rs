//! Class-file constant pool.
//!
//! The pool stores every symbolic value the code refers to: integer and
//! string literals, plus the class, field and method references needed to
//! call `System.out.println`.

use arlang_core::CompileError;
use rustc_hash::FxHashMap;

/// Largest number of entries a pool can hold.
///
/// `constant_pool_count` is a u16 holding `entries + 1`.
pub const MAX_ENTRIES: usize = u16::MAX as usize - 1;

/// A constant-pool entry.
///
/// Reference entries hold the pool indices of the entries they point at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Utf8(String),
    Integer(i32),
    /// Index of the `Utf8` internal class name.
    Class(u16),
    /// Index of the `Utf8` text.
    String(u16),
    Fieldref { class: u16, name_and_type: u16 },
    Methodref { class: u16, name_and_type: u16 },
    NameAndType { name: u16, descriptor: u16 },
}

impl Constant {
    /// The entry's tag byte.
    pub fn tag(&self) -> u8 {
        match self {
            Constant::Utf8(_) => 1,
            Constant::Integer(_) => 3,
            Constant::Class(_) => 7,
            Constant::String(_) => 8,
            Constant::Fieldref { .. } => 9,
            Constant::Methodref { .. } => 10,
            Constant::NameAndType { .. } => 12,
        }
    }

    fn write_to(&self, out: &mut Vec<u8>) -> Result<(), CompileError> {
        out.push(self.tag());
        match self {
            Constant::Utf8(text) => {
                let encoded = modified_utf8(text);
                let length = u16::try_from(encoded.len()).map_err(|_| {
                    CompileError::TextTooLong {
                        length: encoded.len(),
                    }
                })?;
                out.extend_from_slice(&length.to_be_bytes());
                out.extend_from_slice(&encoded);
            }
            Constant::Integer(value) => out.extend_from_slice(&value.to_be_bytes()),
            Constant::Class(index) | Constant::String(index) => {
                out.extend_from_slice(&index.to_be_bytes())
            }
            Constant::Fieldref {
                class,
                name_and_type,
            }
            | Constant::Methodref {
                class,
                name_and_type,
            } => {
                out.extend_from_slice(&class.to_be_bytes());
                out.extend_from_slice(&name_and_type.to_be_bytes());
            }
            Constant::NameAndType { name, descriptor } => {
                out.extend_from_slice(&name.to_be_bytes());
                out.extend_from_slice(&descriptor.to_be_bytes());
            }
        }
        Ok(())
    }
}

/// Deduplicating constant pool.
///
/// Indices are 1-based, as in the class file.
#[derive(Debug, Clone, Default)]
pub struct ConstantPool {
    constants: Vec<Constant>,
    index: FxHashMap<Constant, u16>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get an existing constant, returning its pool index.
    pub fn add(&mut self, constant: Constant) -> Result<u16, CompileError> {
        if let Some(&idx) = self.index.get(&constant) {
            return Ok(idx);
        }
        if self.constants.len() >= MAX_ENTRIES {
            return Err(CompileError::ConstantPoolOverflow { limit: MAX_ENTRIES });
        }

        // len < MAX_ENTRIES, so len + 1 fits
        let idx = (self.constants.len() + 1) as u16;
        self.constants.push(constant.clone());
        self.index.insert(constant, idx);
        Ok(idx)
    }

    pub fn add_utf8(&mut self, text: &str) -> Result<u16, CompileError> {
        self.add(Constant::Utf8(text.to_owned()))
    }

    pub fn add_integer(&mut self, value: i32) -> Result<u16, CompileError> {
        self.add(Constant::Integer(value))
    }

    pub fn add_string(&mut self, text: &str) -> Result<u16, CompileError> {
        let utf8 = self.add_utf8(text)?;
        self.add(Constant::String(utf8))
    }

    /// Add a class reference by internal name (`java/lang/Object`).
    pub fn add_class(&mut self, name: &str) -> Result<u16, CompileError> {
        let utf8 = self.add_utf8(name)?;
        self.add(Constant::Class(utf8))
    }

    pub fn add_name_and_type(&mut self, name: &str, descriptor: &str) -> Result<u16, CompileError> {
        let name = self.add_utf8(name)?;
        let descriptor = self.add_utf8(descriptor)?;
        self.add(Constant::NameAndType { name, descriptor })
    }

    pub fn add_field_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<u16, CompileError> {
        let class = self.add_class(class)?;
        let name_and_type = self.add_name_and_type(name, descriptor)?;
        self.add(Constant::Fieldref {
            class,
            name_and_type,
        })
    }

    pub fn add_method_ref(
        &mut self,
        class: &str,
        name: &str,
        descriptor: &str,
    ) -> Result<u16, CompileError> {
        let class = self.add_class(class)?;
        let name_and_type = self.add_name_and_type(name, descriptor)?;
        self.add(Constant::Methodref {
            class,
            name_and_type,
        })
    }

    /// Get a constant by its 1-based pool index.
    pub fn get(&self, index: u16) -> Option<&Constant> {
        (index as usize)
            .checked_sub(1)
            .and_then(|i| self.constants.get(i))
    }

    /// Index of a constant already in the pool, without adding it.
    pub fn find(&self, constant: &Constant) -> Option<u16> {
        self.index.get(constant).copied()
    }

    /// Whether any `Integer` entry is present.
    pub fn has_integers(&self) -> bool {
        self.constants
            .iter()
            .any(|c| matches!(c, Constant::Integer(_)))
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }

    /// `(index, constant)` pairs in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> {
        self.constants
            .iter()
            .enumerate()
            .map(|(i, c)| ((i + 1) as u16, c))
    }

    /// Write `constant_pool_count` followed by every entry.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), CompileError> {
        let count = (self.constants.len() + 1) as u16;
        out.extend_from_slice(&count.to_be_bytes());
        for constant in &self.constants {
            constant.write_to(out)?;
        }
        Ok(())
    }
}

/// Encode text the way class files store `Utf8` entries.
///
/// NUL becomes the two-byte form `C0 80`, and characters outside the BMP are
/// written as a surrogate pair of three-byte sequences.
fn modified_utf8(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007f => out.push(unit as u8),
            0x0000 | 0x0080..=0x07ff => {
                out.push(0xc0 | (unit >> 6) as u8);
                out.push(0x80 | (unit & 0x3f) as u8);
            }
            _ => {
                out.push(0xe0 | (unit >> 12) as u8);
                out.push(0x80 | ((unit >> 6) & 0x3f) as u8);
                out.push(0x80 | (unit & 0x3f) as u8);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_start_at_one() {
        let mut pool = ConstantPool::new();
        assert_eq!(pool.add_integer(42), Ok(1));
        assert_eq!(pool.add_integer(43), Ok(2));
        assert_eq!(pool.get(0), None);
        assert_eq!(pool.get(1), Some(&Constant::Integer(42)));
    }

    #[test]
    fn deduplicates() {
        let mut pool = ConstantPool::new();
        let a = pool.add_string("hello").unwrap();
        let b = pool.add_string("hello").unwrap();
        assert_eq!(a, b);
        // Utf8 + String
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn string_points_at_utf8() {
        let mut pool = ConstantPool::new();
        let idx = pool.add_string("hi").unwrap();
        let Some(Constant::String(utf8)) = pool.get(idx) else {
            panic!("expected String entry");
        };
        assert_eq!(pool.get(*utf8), Some(&Constant::Utf8("hi".into())));
    }

    #[test]
    fn field_and_method_refs_share_class_entries() {
        let mut pool = ConstantPool::new();
        pool.add_field_ref("java/lang/System", "out", "Ljava/io/PrintStream;")
            .unwrap();
        let before = pool.len();
        pool.add_method_ref("java/io/PrintStream", "println", "(I)V")
            .unwrap();
        let after_int = pool.len();
        pool.add_method_ref("java/io/PrintStream", "println", "(Ljava/lang/String;)V")
            .unwrap();

        // Utf8 class name, Class, Utf8 "println", Utf8 "(I)V", NameAndType, Methodref
        assert_eq!(after_int - before, 6);
        // only the descriptor, NameAndType and Methodref are new
        assert_eq!(pool.len() - after_int, 3);
        assert!(pool.find(&Constant::Utf8("java/io/PrintStream".into())).is_some());
    }

    #[test]
    fn has_integers_only_after_integer_added() {
        let mut pool = ConstantPool::new();
        pool.add_string("5").unwrap();
        assert!(!pool.has_integers());
        pool.add_integer(5).unwrap();
        assert!(pool.has_integers());
    }

    #[test]
    fn overflow_is_reported() {
        let mut pool = ConstantPool::new();
        for value in 0..MAX_ENTRIES as i32 {
            pool.add_integer(value).unwrap();
        }
        // existing entries still resolve
        assert_eq!(pool.add_integer(0), Ok(1));
        assert_eq!(
            pool.add_integer(-1),
            Err(CompileError::ConstantPoolOverflow { limit: MAX_ENTRIES })
        );
    }

    #[test]
    fn serializes_entries() {
        let mut pool = ConstantPool::new();
        pool.add_integer(-2).unwrap();
        pool.add_string("ab").unwrap();

        let mut out = Vec::new();
        pool.write_to(&mut out).unwrap();
        assert_eq!(
            out,
            vec![
                0, 4, // count = entries + 1
                3, 0xff, 0xff, 0xff, 0xfe, // Integer -2
                1, 0, 2, b'a', b'b', // Utf8 "ab"
                8, 0, 2, // String -> #2
            ]
        );
    }

    #[test]
    fn modified_utf8_encoding() {
        assert_eq!(modified_utf8("a"), vec![b'a']);
        assert_eq!(modified_utf8("\0"), vec![0xc0, 0x80]);
        assert_eq!(modified_utf8("é"), vec![0xc3, 0xa9]);
        assert_eq!(modified_utf8("€"), vec![0xe2, 0x82, 0xac]);
        // U+1F600 as surrogate pair D83D DE00
        assert_eq!(
            modified_utf8("\u{1F600}"),
            vec![0xed, 0xa0, 0xbd, 0xed, 0xb8, 0x80]
        );
    }

    #[test]
    fn oversized_text_fails_to_serialize() {
        let mut pool = ConstantPool::new();
        pool.add_utf8(&"x".repeat(70_000)).unwrap();
        let mut out = Vec::new();
        assert_eq!(
            pool.write_to(&mut out),
            Err(CompileError::TextTooLong { length: 70_000 })
        );
    }
}
