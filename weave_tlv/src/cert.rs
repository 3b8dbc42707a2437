//! Structural check of TLV-encoded certificates.
//!
//! A certificate is a structure with exactly eleven context tagged members.
//! Only the shape is checked here, translating to and from X.509 and
//! verifying the signature is left to the caller.

use crate::{
    error::Error,
    tlv::decode,
    tlv_types::{Element, ProfileId, Tag, Value},
};
use log::error;
use num_derive::FromPrimitive;

#[derive(FromPrimitive, Debug, Copy, Clone, PartialEq)]
pub enum CertTags {
    SerialNum = 1,
    SignAlgo = 2,
    Issuer = 3,
    NotBefore = 4,
    NotAfter = 5,
    Subject = 6,
    PubKeyAlgo = 7,
    EcCurveId = 8,
    EcPubKey = 9,
    Extensions = 10,
    Signature = 11,
}

const CERT_FIELD_COUNT: usize = 11;

#[derive(Debug, Copy, Clone, PartialEq)]
enum FieldKind {
    Bytes,
    U8,
    U32,
    List,
}

impl CertTags {
    fn kind(&self) -> FieldKind {
        match self {
            CertTags::SerialNum | CertTags::EcPubKey | CertTags::Signature => FieldKind::Bytes,
            CertTags::Issuer | CertTags::Subject | CertTags::Extensions => FieldKind::List,
            CertTags::SignAlgo | CertTags::PubKeyAlgo | CertTags::EcCurveId => FieldKind::U8,
            CertTags::NotBefore | CertTags::NotAfter => FieldKind::U32,
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self.kind() {
            FieldKind::Bytes => matches!(value, Value::Bytes(_)),
            FieldKind::List => matches!(value, Value::List(_)),
            FieldKind::U8 => matches!(value, Value::U8(_)),
            FieldKind::U32 => matches!(value, Value::U32(_)),
        }
    }
}

/// Fails with `Error::SchemaViolation` unless `cert` is a structure holding
/// each of the eleven certificate fields exactly once.
pub fn check_cert_shape(cert: &Element) -> Result<(), Error> {
    let members = match &cert.value {
        Value::Structure(m) => m,
        v => {
            error!("Certificate should be a structure, found {}", v.type_name());
            return Err(Error::SchemaViolation {
                reason: "certificate is not a structure",
            });
        }
    };
    if members.len() != CERT_FIELD_COUNT {
        error!(
            "Certificate has {} fields, expected {}",
            members.len(),
            CERT_FIELD_COUNT
        );
        return Err(Error::SchemaViolation {
            reason: "certificate field count",
        });
    }

    let mut seen = [false; CERT_FIELD_COUNT];
    for m in members {
        let field: CertTags = match m.tag {
            Tag::Context(t) => <CertTags as num::FromPrimitive>::from_u8(t),
            _ => None,
        }
        .ok_or_else(|| {
            error!("Unexpected certificate tag {:?}", m.tag);
            Error::SchemaViolation {
                reason: "unexpected certificate tag",
            }
        })?;
        let index = field as usize - 1;
        if seen[index] {
            error!("Duplicate certificate field {:?}", field);
            return Err(Error::SchemaViolation {
                reason: "duplicate certificate field",
            });
        }
        seen[index] = true;
        if !field.matches(&m.value) {
            error!(
                "Certificate field {:?} has type {}",
                field,
                m.value.type_name()
            );
            return Err(Error::SchemaViolation {
                reason: "certificate field type mismatch",
            });
        }
    }
    Ok(())
}

/// Decode a TLV certificate. Implicit tags resolve against the security
/// profile.
pub fn decode_cert(b: &[u8]) -> Result<Element, Error> {
    let cert = decode(b, Some(ProfileId::SECURITY))?;
    check_cert_shape(&cert)?;
    Ok(cert)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dn(oid_tag: u8, value: &str) -> Element {
        Element::new(Tag::Context(oid_tag), Value::Str(value.to_string()))
    }

    fn sample_cert() -> Element {
        Element::anonymous(Value::Structure(vec![
            Element::new(Tag::Context(1), Value::Bytes(vec![0x01, 0x02])),
            Element::new(Tag::Context(2), Value::U8(1)),
            Element::new(Tag::Context(3), Value::List(vec![dn(17, "CACACACA")])),
            Element::new(Tag::Context(4), Value::U32(0x27812280)),
            Element::new(Tag::Context(5), Value::U32(0)),
            Element::new(Tag::Context(6), Value::List(vec![dn(20, "DEDEDEDE")])),
            Element::new(Tag::Context(7), Value::U8(1)),
            Element::new(Tag::Context(8), Value::U8(1)),
            Element::new(Tag::Context(9), Value::Bytes(vec![0x04; 65])),
            Element::new(
                Tag::Context(10),
                Value::List(vec![Element::new(
                    Tag::Context(1),
                    Value::Structure(vec![Element::new(Tag::Context(1), Value::Bool(true))]),
                )]),
            ),
            Element::new(Tag::Context(11), Value::Bytes(vec![0x30; 64])),
        ]))
    }

    #[test]
    fn test_valid_cert_shape() {
        let cert = sample_cert();
        assert_eq!(check_cert_shape(&cert), Ok(()));
        let bytes = cert.encode(512).unwrap();
        assert_eq!(decode_cert(&bytes), Ok(cert));
    }

    #[test]
    fn test_field_count() {
        let mut cert = sample_cert();
        if let Value::Structure(m) = &mut cert.value {
            m.pop();
        }
        assert_eq!(
            check_cert_shape(&cert),
            Err(Error::SchemaViolation {
                reason: "certificate field count"
            })
        );
    }

    #[test]
    fn test_duplicate_and_unknown_fields() {
        let mut cert = sample_cert();
        if let Value::Structure(m) = &mut cert.value {
            m[10] = Element::new(Tag::Context(1), Value::Bytes(vec![]));
        }
        assert_eq!(
            check_cert_shape(&cert),
            Err(Error::SchemaViolation {
                reason: "duplicate certificate field"
            })
        );

        let mut cert = sample_cert();
        if let Value::Structure(m) = &mut cert.value {
            m[10] = Element::new(Tag::Context(12), Value::Bytes(vec![]));
        }
        assert_eq!(
            check_cert_shape(&cert),
            Err(Error::SchemaViolation {
                reason: "unexpected certificate tag"
            })
        );
    }

    #[test]
    fn test_field_type_mismatch() {
        let mut cert = sample_cert();
        if let Value::Structure(m) = &mut cert.value {
            m[2] = Element::new(Tag::Context(3), Value::Structure(vec![]));
        }
        assert_eq!(
            check_cert_shape(&cert),
            Err(Error::SchemaViolation {
                reason: "certificate field type mismatch"
            })
        );
    }

    #[test]
    fn test_unsigned_field_widths() {
        let mismatch = Err(Error::SchemaViolation {
            reason: "certificate field type mismatch",
        });

        let mut cert = sample_cert();
        if let Value::Structure(m) = &mut cert.value {
            m[1] = Element::new(Tag::Context(2), Value::U64(1));
        }
        assert_eq!(check_cert_shape(&cert), mismatch);

        let mut cert = sample_cert();
        if let Value::Structure(m) = &mut cert.value {
            m[3] = Element::new(Tag::Context(4), Value::U8(1));
        }
        assert_eq!(check_cert_shape(&cert), mismatch);

        let mut cert = sample_cert();
        if let Value::Structure(m) = &mut cert.value {
            m[7] = Element::new(Tag::Context(8), Value::U16(1));
        }
        assert_eq!(check_cert_shape(&cert), mismatch);
    }

    #[test]
    fn test_not_a_structure() {
        let cert = Element::anonymous(Value::List(vec![]));
        assert!(check_cert_shape(&cert).is_err());
    }
}
