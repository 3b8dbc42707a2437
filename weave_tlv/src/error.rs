use thiserror::Error;

use crate::tlv_types::Tag;

#[derive(Debug, Error, PartialEq, Clone, Copy)]
pub enum Error {
    #[error("TLV: invalid tag control {code:#x} at offset {offset}")]
    MalformedTagCode { offset: usize, code: u8 },

    #[error("TLV: invalid element type {code:#x} at offset {offset}")]
    MalformedValueCode { offset: usize, code: u8 },

    #[error("TLV: implicit tag at offset {offset} but no implicit profile provided")]
    ProfileResolutionRequired { offset: usize },

    #[error("TLV: buffer underflow at offset {offset}: need {needed} bytes, {remaining} left")]
    BufferUnderflow {
        offset: usize,
        needed: u64,
        remaining: usize,
    },

    #[error("TLV: schema violation: {reason}")]
    SchemaViolation { reason: &'static str },

    #[error("TLV: failed sorting elements, encountered unordered tag {tag:?}")]
    UnresolvableTagOrdering { tag: Tag },

    #[error("TLV: out of space: need {needed} bytes, {remaining} left")]
    OutOfSpace { needed: usize, remaining: usize },

    #[error("TLV: invalid UTF-8 string at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("TLV: end of container at offset {offset} outside of any container")]
    UnexpectedEndOfContainer { offset: usize },
}
