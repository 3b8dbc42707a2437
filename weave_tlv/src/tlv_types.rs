use std::convert::TryFrom;
use std::fmt;

/// A (vendor, profile) pair qualifying profile tags.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ProfileId {
    pub vendor_id: u16,
    pub profile_id: u16,
}

impl ProfileId {
    /// The core profile, encoded without vendor/profile bytes
    pub const CORE: ProfileId = ProfileId::new(0x0000, 0x0000);
    /// Profile used as the implicit context of TLV certificates
    pub const SECURITY: ProfileId = ProfileId::new(0x0000, 0x0008);

    pub const fn new(vendor_id: u16, profile_id: u16) -> Self {
        ProfileId {
            vendor_id,
            profile_id,
        }
    }

    pub fn is_core(&self) -> bool {
        *self == ProfileId::CORE
    }
}

/// Tags come in 4 flavours:
///  Anonymous - usually used to encode the members of an array
///  Context - ids scoped to the enclosing container
///  Implicit - ids whose profile is implied by the decoding context
///  Profile - fully qualified ids
///
/// `Implicit` is never produced by the decoder, it is always resolved to
/// `Profile` against the caller's profile context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Anonymous,
    Context(u8),
    Implicit(u32),
    Profile(ProfileId, u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Str(String),
    Bytes(Vec<u8>),
    Structure(Vec<Element>),
    // Array members are anonymous, so only the values are kept
    Array(Vec<Value>),
    List(Vec<Element>),
}

/// The unit of encoding and decoding: a tag and its value.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub value: Value,
}

impl Element {
    pub fn new(tag: Tag, value: Value) -> Self {
        Element { tag, value }
    }

    pub fn anonymous(value: Value) -> Self {
        Element {
            tag: Tag::Anonymous,
            value,
        }
    }

    /// Members of a structure or list. Arrays have no tagged members and
    /// return None, as do primitives.
    pub fn members(&self) -> Option<&[Element]> {
        match &self.value {
            Value::Structure(m) | Value::List(m) => Some(m),
            _ => None,
        }
    }

    /// First member of a structure or list carrying `tag`.
    pub fn find_element(&self, tag: Tag) -> Option<&Element> {
        self.members()?.iter().find(|e| e.tag == tag)
    }
}

impl Value {
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Value::Structure(_) | Value::Array(_) | Value::List(_)
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::I8(_) => "I8",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::U8(_) => "U8",
            Value::U16(_) => "U16",
            Value::U32(_) => "U32",
            Value::U64(_) => "U64",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::Str(_) => "Str",
            Value::Bytes(_) => "Bytes",
            Value::Structure(_) => "Structure",
            Value::Array(_) => "Array",
            Value::List(_) => "List",
        }
    }

    pub fn widen_to_u64(&self) -> Option<u64> {
        match *self {
            Value::U8(v) => Some(v as u64),
            Value::U16(v) => Some(v as u64),
            Value::U32(v) => Some(v as u64),
            Value::U64(v) => Some(v),
            _ => None,
        }
    }

    pub fn widen_to_i64(&self) -> Option<i64> {
        match *self {
            Value::I8(v) => Some(v as i64),
            Value::I16(v) => Some(v as i64),
            Value::I32(v) => Some(v as i64),
            Value::I64(v) => Some(v),
            _ => None,
        }
    }

    /// Shrink an integer to the narrowest width of the same signedness
    /// that holds it exactly. Anything else is returned as is.
    pub fn compress(&self) -> Value {
        if let Some(v) = self.widen_to_i64() {
            compress_signed(v)
        } else if let Some(v) = self.widen_to_u64() {
            compress_unsigned(v)
        } else {
            self.clone()
        }
    }
}

fn compress_signed(v: i64) -> Value {
    if let Ok(v) = i8::try_from(v) {
        Value::I8(v)
    } else if let Ok(v) = i16::try_from(v) {
        Value::I16(v)
    } else if let Ok(v) = i32::try_from(v) {
        Value::I32(v)
    } else {
        Value::I64(v)
    }
}

fn compress_unsigned(v: u64) -> Value {
    if let Ok(v) = u8::try_from(v) {
        Value::U8(v)
    } else if let Ok(v) = u16::try_from(v) {
        Value::U16(v)
    } else if let Ok(v) = u32::try_from(v) {
        Value::U32(v)
    } else {
        Value::U64(v)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Anonymous => Ok(()),
            Tag::Context(t) => write!(f, "{}:", t),
            Tag::Implicit(t) => write!(f, "?:{}:", t),
            Tag::Profile(p, t) => write!(f, "{:04x}:{:04x}:{}:", p.vendor_id, p.profile_id, t),
        }
    }
}

fn write_members<T: fmt::Display>(f: &mut fmt::Formatter<'_>, members: &[T]) -> fmt::Result {
    let mut comma = "";
    for m in members {
        write!(f, "{}{}", comma, m)?;
        comma = ", ";
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Structure(m) => {
                write!(f, "{{")?;
                write_members(f, m)?;
                write!(f, "}}")
            }
            Value::Array(m) => {
                write!(f, "[")?;
                write_members(f, m)?;
                write!(f, "]")
            }
            Value::List(m) => {
                write!(f, "[[")?;
                write_members(f, m)?;
                write!(f, "]]")
            }
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Str(s) => write!(f, "len[{}]\"{}\"", s.len(), s),
            Value::Bytes(a) => write!(f, "len[{}]{:x?}", a.len(), a),
            _ => write!(f, "{:?}", self),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.tag, self.value)
    }
}
