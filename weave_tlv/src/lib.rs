//! Encoder and decoder for the Weave/Matter TLV wire format.
//!
//! ```
//! use weave_tlv::tlv_types::{Element, ProfileId, Tag, Value};
//!
//! let e = Element::new(Tag::Profile(ProfileId::CORE, 1), Value::U8(42));
//! let bytes = e.encode(16).unwrap();
//! assert_eq!(bytes, [0x44, 0x01, 0x00, 0x2a]);
//! assert_eq!(Element::from_bytes(&bytes, None).unwrap(), e);
//! ```

pub mod cert;
pub mod error;
pub mod tlv;
pub mod tlv_common;
pub mod tlv_ordering;
pub mod tlv_types;
pub mod tlv_writer;
pub mod utils;
