//! Shared helpers for integration tests: a small class-file reader and an
//! interpreter for the instructions the compiler emits.

#![allow(dead_code)]

use arlang::Module;

// ============================================================================
// Class-file reader
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum PoolEntry {
    Utf8(String),
    Integer(i32),
    Class(u16),
    String(u16),
    Fieldref(u16, u16),
    Methodref(u16, u16),
    NameAndType(u16, u16),
}

#[derive(Debug)]
pub struct Method {
    pub access: u16,
    pub name: String,
    pub descriptor: String,
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

#[derive(Debug)]
pub struct ClassFile {
    pub major: u16,
    pub minor: u16,
    /// Index 0 is unused, as in the class file.
    pub pool: Vec<Option<PoolEntry>>,
    pub access: u16,
    pub this_class: String,
    pub super_class: String,
    pub interfaces: u16,
    pub fields: u16,
    pub methods: Vec<Method>,
    pub attributes: u16,
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn u8(&mut self) -> u8 {
        let b = self.bytes[self.pos];
        self.pos += 1;
        b
    }

    fn u16(&mut self) -> u16 {
        u16::from_be_bytes([self.u8(), self.u8()])
    }

    fn u32(&mut self) -> u32 {
        u32::from_be_bytes([self.u8(), self.u8(), self.u8(), self.u8()])
    }

    fn take(&mut self, len: usize) -> &'a [u8] {
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        slice
    }
}

impl ClassFile {
    pub fn parse(bytes: &[u8]) -> ClassFile {
        let mut r = Reader { bytes, pos: 0 };
        assert_eq!(r.u32(), 0xCAFE_BABE, "bad magic");
        let minor = r.u16();
        let major = r.u16();

        let count = r.u16() as usize;
        let mut pool = vec![None];
        for _ in 1..count {
            let entry = match r.u8() {
                1 => {
                    let len = r.u16() as usize;
                    PoolEntry::Utf8(decode_modified_utf8(r.take(len)))
                }
                3 => PoolEntry::Integer(r.u32() as i32),
                7 => PoolEntry::Class(r.u16()),
                8 => PoolEntry::String(r.u16()),
                9 => PoolEntry::Fieldref(r.u16(), r.u16()),
                10 => PoolEntry::Methodref(r.u16(), r.u16()),
                12 => PoolEntry::NameAndType(r.u16(), r.u16()),
                tag => panic!("unexpected constant tag {tag}"),
            };
            pool.push(Some(entry));
        }

        let access = r.u16();
        let this_class = r.u16();
        let super_class = r.u16();
        let interfaces = r.u16();
        let fields = r.u16();

        let mut class = ClassFile {
            major,
            minor,
            pool,
            access,
            this_class: String::new(),
            super_class: String::new(),
            interfaces,
            fields,
            methods: Vec::new(),
            attributes: 0,
        };
        class.this_class = class.class_name(this_class).to_owned();
        class.super_class = class.class_name(super_class).to_owned();

        let method_count = r.u16();
        for _ in 0..method_count {
            let access = r.u16();
            let name = class.utf8(r.u16()).to_owned();
            let descriptor = class.utf8(r.u16()).to_owned();
            let mut method = Method {
                access,
                name,
                descriptor,
                max_stack: 0,
                max_locals: 0,
                code: Vec::new(),
            };
            for _ in 0..r.u16() {
                let attr_name = class.utf8(r.u16()).to_owned();
                let len = r.u32() as usize;
                let start = r.pos;
                if attr_name == "Code" {
                    method.max_stack = r.u16();
                    method.max_locals = r.u16();
                    let code_len = r.u32() as usize;
                    method.code = r.take(code_len).to_vec();
                    assert_eq!(r.u16(), 0, "exception table should be empty");
                    assert_eq!(r.u16(), 0, "code attributes should be empty");
                }
                assert_eq!(r.pos - start, len, "attribute length mismatch");
            }
            class.methods.push(method);
        }

        class.attributes = r.u16();
        assert_eq!(r.pos, bytes.len(), "trailing bytes after class file");
        class
    }

    pub fn entry(&self, index: u16) -> &PoolEntry {
        self.pool
            .get(index as usize)
            .and_then(Option::as_ref)
            .unwrap_or_else(|| panic!("no constant #{index}"))
    }

    pub fn utf8(&self, index: u16) -> &str {
        match self.entry(index) {
            PoolEntry::Utf8(text) => text,
            other => panic!("#{index} is not Utf8: {other:?}"),
        }
    }

    pub fn class_name(&self, index: u16) -> &str {
        match self.entry(index) {
            PoolEntry::Class(name) => self.utf8(*name),
            other => panic!("#{index} is not a Class: {other:?}"),
        }
    }

    /// `(class, name, descriptor)` of a field or method reference.
    pub fn member(&self, index: u16) -> (&str, &str, &str) {
        let (class, nat) = match self.entry(index) {
            PoolEntry::Fieldref(c, n) | PoolEntry::Methodref(c, n) => (*c, *n),
            other => panic!("#{index} is not a member reference: {other:?}"),
        };
        let PoolEntry::NameAndType(name, descriptor) = self.entry(nat) else {
            panic!("#{nat} is not a NameAndType");
        };
        (self.class_name(class), self.utf8(*name), self.utf8(*descriptor))
    }

    pub fn main(&self) -> &Method {
        self.methods
            .iter()
            .find(|m| m.name == "main")
            .expect("class has no main method")
    }

    pub fn integer_constants(&self) -> Vec<i32> {
        self.pool
            .iter()
            .filter_map(|entry| match entry {
                Some(PoolEntry::Integer(value)) => Some(*value),
                _ => None,
            })
            .collect()
    }
}

fn decode_modified_utf8(bytes: &[u8]) -> String {
    let mut units = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i] as u16;
        if b & 0x80 == 0 {
            units.push(b);
            i += 1;
        } else if b & 0xe0 == 0xc0 {
            units.push(((b & 0x1f) << 6) | (bytes[i + 1] as u16 & 0x3f));
            i += 2;
        } else {
            units.push(
                ((b & 0x0f) << 12)
                    | ((bytes[i + 1] as u16 & 0x3f) << 6)
                    | (bytes[i + 2] as u16 & 0x3f),
            );
            i += 3;
        }
    }
    String::from_utf16(&units).expect("invalid UTF-16 in constant")
}

// ============================================================================
// Interpreter
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i32),
    Str(String),
    PrintStream,
}

/// What a run of `main` produced.
#[derive(Debug)]
pub struct Execution {
    pub output: Vec<String>,
    /// Highest operand-stack depth reached.
    pub max_depth: usize,
    /// Final values of the int locals, slot 0 excluded.
    pub locals: Vec<Option<i32>>,
}

const STEP_LIMIT: usize = 1_000_000;

/// Execute `main` of `class`.
pub fn execute(class: &ClassFile) -> Execution {
    let method = class.main();
    let code = &method.code;
    let mut stack: Vec<Value> = Vec::new();
    let mut locals: Vec<Option<i32>> = vec![None; method.max_locals as usize];
    let mut output = Vec::new();
    let mut max_depth = 0;
    let mut pc = 0usize;

    let u16_at = |at: usize| u16::from_be_bytes([code[at], code[at + 1]]);
    let i16_at = |at: usize| i16::from_be_bytes([code[at], code[at + 1]]);

    for step in 0.. {
        assert!(step < STEP_LIMIT, "step limit exceeded");
        let op = code[pc];
        match op {
            0x02..=0x08 => {
                stack.push(Value::Int(op as i32 - 3));
                pc += 1;
            }
            0x12 | 0x13 => {
                let (index, len) = if op == 0x12 {
                    (code[pc + 1] as u16, 2)
                } else {
                    (u16_at(pc + 1), 3)
                };
                stack.push(match class.entry(index) {
                    PoolEntry::Integer(value) => Value::Int(*value),
                    PoolEntry::String(utf8) => Value::Str(class.utf8(*utf8).to_owned()),
                    other => panic!("ldc of {other:?}"),
                });
                pc += len;
            }
            0x15 => {
                let slot = code[pc + 1] as usize;
                stack.push(Value::Int(load(&locals, slot)));
                pc += 2;
            }
            0x36 => {
                let slot = code[pc + 1] as usize;
                locals[slot] = Some(pop_int(&mut stack));
                pc += 2;
            }
            0x84 => {
                let slot = code[pc + 1] as usize;
                let delta = code[pc + 2] as i8 as i32;
                locals[slot] = Some(load(&locals, slot).wrapping_add(delta));
                pc += 3;
            }
            0xc4 => {
                let slot = u16_at(pc + 2) as usize;
                match code[pc + 1] {
                    0x15 => {
                        stack.push(Value::Int(load(&locals, slot)));
                        pc += 4;
                    }
                    0x36 => {
                        locals[slot] = Some(pop_int(&mut stack));
                        pc += 4;
                    }
                    0x84 => {
                        let delta = i16_at(pc + 4) as i32;
                        locals[slot] = Some(load(&locals, slot).wrapping_add(delta));
                        pc += 6;
                    }
                    other => panic!("wide {other:#x}"),
                }
            }
            0x5f => {
                let a = stack.pop().expect("swap on empty stack");
                let b = stack.pop().expect("swap on short stack");
                stack.push(a);
                stack.push(b);
                pc += 1;
            }
            0x60 | 0x64 | 0x68 | 0x6c => {
                let b = pop_int(&mut stack);
                let a = pop_int(&mut stack);
                stack.push(Value::Int(match op {
                    0x60 => a.wrapping_add(b),
                    0x64 => a.wrapping_sub(b),
                    0x68 => a.wrapping_mul(b),
                    _ => {
                        assert_ne!(b, 0, "ArithmeticException: / by zero");
                        a.wrapping_div(b)
                    }
                }));
                pc += 1;
            }
            0xa1..=0xa4 => {
                let b = pop_int(&mut stack);
                let a = pop_int(&mut stack);
                let taken = match op {
                    0xa1 => a < b,
                    0xa2 => a >= b,
                    0xa3 => a > b,
                    _ => a <= b,
                };
                pc = if taken {
                    (pc as isize + i16_at(pc + 1) as isize) as usize
                } else {
                    pc + 3
                };
            }
            0xa7 => {
                pc = (pc as isize + i16_at(pc + 1) as isize) as usize;
            }
            0xb1 => break,
            0xb2 => {
                let (class_name, name, _) = class.member(u16_at(pc + 1));
                assert_eq!((class_name, name), ("java/lang/System", "out"));
                stack.push(Value::PrintStream);
                pc += 3;
            }
            0xb6 => {
                let (class_name, name, descriptor) = class.member(u16_at(pc + 1));
                assert_eq!((class_name, name), ("java/io/PrintStream", "println"));
                let arg = stack.pop().expect("println without argument");
                let receiver = stack.pop().expect("println without receiver");
                assert_eq!(receiver, Value::PrintStream);
                let line = match (descriptor, arg) {
                    ("(I)V", Value::Int(value)) => value.to_string(),
                    ("(Ljava/lang/String;)V", Value::Str(text)) => text,
                    (descriptor, arg) => panic!("println{descriptor} called with {arg:?}"),
                };
                output.push(line);
                pc += 3;
            }
            other => panic!("unsupported opcode {other:#04x} at {pc}"),
        }
        max_depth = max_depth.max(stack.len());
    }

    assert!(stack.is_empty(), "stack not empty at return: {stack:?}");
    Execution {
        output,
        max_depth,
        locals: locals.into_iter().skip(1).collect(),
    }
}

fn load(locals: &[Option<i32>], slot: usize) -> i32 {
    locals[slot].unwrap_or_else(|| panic!("read of unset local {slot}"))
}

fn pop_int(stack: &mut Vec<Value>) -> i32 {
    match stack.pop() {
        Some(Value::Int(value)) => value,
        other => panic!("expected int on stack, got {other:?}"),
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Compile `source` or panic with the rendered diagnostic.
pub fn compile(source: &str) -> Module {
    arlang::compile(source, "Program")
        .unwrap_or_else(|err| panic!("{}", err.display_with_source(source)))
}

/// Compile and run `source`, checking the declared stack size against the
/// observed one, and return the printed lines.
pub fn run(source: &str) -> Vec<String> {
    let module = compile(source);
    let class = ClassFile::parse(module.as_bytes());
    let execution = execute(&class);
    assert_eq!(
        class.main().max_stack as usize,
        execution.max_depth,
        "declared max_stack differs from the observed high-water mark"
    );
    execution.output
}
