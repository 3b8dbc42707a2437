use crate::{
    error::Error,
    tlv_common::*,
    tlv_ordering::sort_canonical,
    tlv_types::{Element, ProfileId, Tag, Value},
    utils::parsebuf::ParseBuf,
};

use log::{error, info};

/// Containers nested deeper than this are rejected instead of recursing further
pub const MAX_NESTING_DEPTH: usize = 64;

// Result of reading a single control octet: either a complete element or
// the end-of-container marker that closes the innermost open container
enum Item {
    Element(Element),
    EndCnt,
}

/// Recursive-descent TLV decoder.
///
/// Implicit tags are resolved against `profile`, the decoder never hands
/// out `Tag::Implicit`. Members of every container are returned in
/// canonical order, whatever their order on the wire, so decoding and
/// re-encoding only reproduces the input bytes if the input was canonical.
pub struct TLVReader<'a> {
    buf: ParseBuf<'a>,
    profile: Option<ProfileId>,
    depth: usize,
}

impl<'a> TLVReader<'a> {
    pub fn new(buf: &'a [u8], profile: Option<ProfileId>) -> TLVReader<'a> {
        TLVReader {
            buf: ParseBuf::new(buf),
            profile,
            depth: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.buf.read_off()
    }

    pub fn remaining(&self) -> &'a [u8] {
        self.buf.as_slice()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.left() == 0
    }

    /// Read the next element. Bytes after it are left for the next call.
    pub fn element(&mut self) -> Result<Element, Error> {
        let offset = self.position();
        let item = self.next_item().map_err(|e| {
            error!("{}", e);
            e
        })?;
        match item {
            Item::Element(e) => Ok(e),
            Item::EndCnt => {
                let e = Error::UnexpectedEndOfContainer { offset };
                error!("{}", e);
                Err(e)
            }
        }
    }

    fn next_item(&mut self) -> Result<Item, Error> {
        let offset = self.position();
        /* Read Control */
        let control = self.buf.le_u8()?;
        let tag_bits = (control & TAG_MASK) >> TAG_SHIFT_BITS;
        let type_bits = control & TYPE_MASK;
        let tag_control: TagControl =
            num::FromPrimitive::from_u8(tag_bits).ok_or(Error::MalformedTagCode {
                offset,
                code: tag_bits,
            })?;
        let element_type: ElementType =
            num::FromPrimitive::from_u8(type_bits).ok_or(Error::MalformedValueCode {
                offset,
                code: type_bits,
            })?;

        // The end of container marker never carries a tag
        if element_type == ElementType::EndCnt && tag_control != TagControl::Anonymous {
            return Err(Error::MalformedTagCode {
                offset,
                code: tag_bits,
            });
        }

        /* Consume Tag */
        let tag = self.read_tag(tag_control, offset)?;

        /* Consume Value */
        let value = match element_type {
            ElementType::S8 => Value::I8(self.buf.le_i8()?),
            ElementType::S16 => Value::I16(self.buf.le_i16()?),
            ElementType::S32 => Value::I32(self.buf.le_i32()?),
            ElementType::S64 => Value::I64(self.buf.le_i64()?),
            ElementType::U8 => Value::U8(self.buf.le_u8()?),
            ElementType::U16 => Value::U16(self.buf.le_u16()?),
            ElementType::U32 => Value::U32(self.buf.le_u32()?),
            ElementType::U64 => Value::U64(self.buf.le_u64()?),
            ElementType::False => Value::Bool(false),
            ElementType::True => Value::Bool(true),
            ElementType::F32 => Value::F32(self.buf.le_f32()?),
            ElementType::F64 => Value::F64(self.buf.le_f64()?),
            ElementType::Utf8l
            | ElementType::Utf16l
            | ElementType::Utf32l
            | ElementType::Utf64l => {
                let data = self.len_prefixed(element_type)?;
                match std::str::from_utf8(data) {
                    Ok(s) => Value::Str(s.to_owned()),
                    Err(_) => {
                        return Err(Error::InvalidUtf8 {
                            offset: self.position() - data.len(),
                        })
                    }
                }
            }
            ElementType::Str8l
            | ElementType::Str16l
            | ElementType::Str32l
            | ElementType::Str64l => Value::Bytes(self.len_prefixed(element_type)?.to_vec()),
            ElementType::Null => Value::Null,
            ElementType::Struct => Value::Structure(self.container()?),
            ElementType::Array => {
                let members = self.container()?;
                if members.iter().any(|m| m.tag != Tag::Anonymous) {
                    return Err(Error::SchemaViolation {
                        reason: "array members should all have anonymous tags",
                    });
                }
                Value::Array(members.into_iter().map(|m| m.value).collect())
            }
            ElementType::List => Value::List(self.container()?),
            ElementType::EndCnt => return Ok(Item::EndCnt),
        };

        Ok(Item::Element(Element::new(tag, value)))
    }

    fn read_tag(&mut self, tag_control: TagControl, offset: usize) -> Result<Tag, Error> {
        let tag_size = TAG_SIZE_MAP[tag_control as usize];
        let tag = match tag_control {
            TagControl::Anonymous => Tag::Anonymous,
            TagControl::Context => Tag::Context(self.buf.le_u8()?),
            TagControl::CommonPrf16 | TagControl::CommonPrf32 => {
                Tag::Profile(ProfileId::CORE, self.buf.le_uint(tag_size)? as u32)
            }
            TagControl::ImplPrf16 | TagControl::ImplPrf32 => {
                let profile = self
                    .profile
                    .ok_or(Error::ProfileResolutionRequired { offset })?;
                Tag::Profile(profile, self.buf.le_uint(tag_size)? as u32)
            }
            TagControl::FullQual48 | TagControl::FullQual64 => {
                let vendor_id = self.buf.le_u16()?;
                let profile_id = self.buf.le_u16()?;
                let id = self.buf.le_uint(tag_size - 4)? as u32;
                Tag::Profile(ProfileId::new(vendor_id, profile_id), id)
            }
        };
        Ok(tag)
    }

    // The length prefix is as wide as the element type says, the 8 byte form
    // is kept as a u64 and checked against what is left
    fn len_prefixed(&mut self, element_type: ElementType) -> Result<&'a [u8], Error> {
        let len = self.buf.le_uint(VALUE_SIZE_MAP[element_type as usize])?;
        self.buf.take(len)
    }

    fn container(&mut self) -> Result<Vec<Element>, Error> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::SchemaViolation {
                reason: "containers nested too deeply",
            });
        }
        self.depth += 1;
        let members = self.members();
        // Restored on every path, the reader stays usable after an error
        self.depth -= 1;
        let mut members = members?;
        sort_canonical(&mut members)?;
        Ok(members)
    }

    fn members(&mut self) -> Result<Vec<Element>, Error> {
        let mut members = Vec::new();
        loop {
            match self.next_item()? {
                Item::Element(e) => members.push(e),
                Item::EndCnt => return Ok(members),
            }
        }
    }
}

/// Decode the first element in `b`, resolving implicit tags against `profile`.
pub fn decode(b: &[u8], profile: Option<ProfileId>) -> Result<Element, Error> {
    TLVReader::new(b, profile).element()
}

impl Element {
    pub fn from_bytes(b: &[u8], profile: Option<ProfileId>) -> Result<Element, Error> {
        decode(b, profile)
    }
}

pub fn print_element(b: &[u8], profile: Option<ProfileId>) {
    info!("TLV element:");
    let mut reader = TLVReader::new(b, profile);
    while !reader.is_empty() {
        match reader.element() {
            Ok(e) => info!("{}", e),
            Err(_) => break,
        }
    }
    info!("---------");
}
