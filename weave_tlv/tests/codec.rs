use weave_tlv::{
    cert,
    error::Error,
    tlv::{decode, TLVReader},
    tlv_types::{Element, ProfileId, Tag, Value},
    utils::writebuf::WriteBuf,
};

mod common;
use common::{hex, init_logger, TestData};

const VENDOR: ProfileId = ProfileId::new(448, 57024);

// Decode, check against the expected element and check that re-encoding
// gives back the input
fn round_trip(input: &str, profile: Option<ProfileId>, expected: Element) {
    init_logger();
    let input = hex(input);
    let elem = decode(&input, profile).unwrap();
    assert_eq!(elem, expected);
    assert_eq!(elem.encode_default().unwrap(), input);
}

#[test]
fn test_anonymous_unsigned() {
    round_trip("04 2A", None, Element::anonymous(Value::U8(42)));
}

#[test]
fn test_context_tag() {
    round_trip(
        "24 01 2A",
        None,
        Element::new(Tag::Context(1), Value::U8(42)),
    );
}

#[test]
fn test_core_profile_tag() {
    round_trip(
        "44 01 00 2A",
        None,
        Element::new(Tag::Profile(ProfileId::CORE, 1), Value::U8(42)),
    );
}

#[test]
fn test_core_profile_large_tag() {
    round_trip(
        "64 A0 86 01 00 2A",
        None,
        Element::new(Tag::Profile(ProfileId::CORE, 100000), Value::U8(42)),
    );
}

#[test]
fn test_fully_qualified_tag() {
    round_trip(
        "C4 C0 01 C0 DE 01 00 2A",
        None,
        Element::new(Tag::Profile(VENDOR, 1), Value::U8(42)),
    );
}

#[test]
fn test_fully_qualified_large_tag() {
    round_trip(
        "E4 C0 01 C0 DE 00 FE ED 00 2A",
        None,
        Element::new(Tag::Profile(VENDOR, 15597056), Value::U8(42)),
    );
}

#[test]
fn test_structure() {
    round_trip(
        "D5 C0 01 C0 DE 01 00 C4 C0 01 C0 DE FE ED 2A 18",
        None,
        Element::new(
            Tag::Profile(VENDOR, 1),
            Value::Structure(vec![Element::new(
                Tag::Profile(VENDOR, 60926),
                Value::U8(42),
            )]),
        ),
    );
}

#[test]
fn test_structure_with_implicit_tags() {
    init_logger();
    let input = hex("D5 C0 01 C0 DE 01 00 84 FE ED 2A 18");
    let elem = decode(&input, Some(VENDOR)).unwrap();
    assert_eq!(
        elem,
        Element::new(
            Tag::Profile(VENDOR, 1),
            Value::Structure(vec![Element::new(
                Tag::Profile(VENDOR, 60926),
                Value::U8(42)
            )]),
        )
    );
    // Resolved tags are written fully qualified
    assert_eq!(
        elem.encode_default().unwrap(),
        hex("D5 C0 01 C0 DE 01 00 C4 C0 01 C0 DE FE ED 2A 18")
    );

    assert_eq!(
        decode(&input, None),
        Err(Error::ProfileResolutionRequired { offset: 7 })
    );
}

#[test]
fn test_out_of_order_input_is_not_reproduced() {
    init_logger();
    let input = hex("15 24 05 01 24 01 02 18");
    let elem = decode(&input, None).unwrap();
    assert_eq!(
        elem.members().unwrap(),
        &[
            Element::new(Tag::Context(1), Value::U8(2)),
            Element::new(Tag::Context(5), Value::U8(1)),
        ]
    );
    assert_eq!(elem.encode_default().unwrap(), hex("15 24 01 02 24 05 01 18"));
}

#[test]
fn test_nested_containers_round_trip() {
    let tree = Element::new(
        Tag::Context(0),
        Value::Structure(vec![
            Element::anonymous(Value::Null),
            Element::new(Tag::Context(1), Value::Str("weave".to_string())),
            Element::new(
                Tag::Context(2),
                Value::Array(vec![
                    Value::I16(-300),
                    Value::List(vec![Element::new(Tag::Context(9), Value::F64(0.25))]),
                    Value::Bytes(vec![]),
                ]),
            ),
            Element::new(Tag::Profile(ProfileId::CORE, 7), Value::U64(u64::MAX)),
            Element::new(Tag::Profile(VENDOR, 2), Value::Bool(true)),
        ]),
    );
    let bytes = tree.encode(128).unwrap();
    assert_eq!(decode(&bytes, None).unwrap(), tree);
    assert_eq!(decode(&bytes, None).unwrap().encode(128).unwrap(), bytes);
}

#[test]
fn test_implicit_tag_is_written_as_core_profile() {
    let elem = Element::new(Tag::Implicit(5), Value::Bool(false));
    let bytes = elem.encode(8).unwrap();
    assert_eq!(bytes, hex("48 05 00"));
    assert_eq!(
        decode(&bytes, Some(VENDOR)).unwrap().tag,
        Tag::Profile(ProfileId::CORE, 5)
    );
}

#[test]
fn test_out_of_space() {
    let elem = Element::new(Tag::Context(1), Value::Bytes(vec![0xaa; 10]));
    assert_eq!(
        elem.encode(8),
        Err(Error::OutOfSpace {
            needed: 10,
            remaining: 5
        })
    );
    assert_eq!(elem.encode(13).unwrap().len(), 13);
}

#[test]
fn test_reader_walks_a_sequence() {
    let input = hex("04 01 24 02 03 15 18");
    let mut reader = TLVReader::new(&input, None);
    let mut elems = Vec::new();
    while !reader.is_empty() {
        elems.push(reader.element().unwrap());
    }
    assert_eq!(
        elems,
        vec![
            Element::anonymous(Value::U8(1)),
            Element::new(Tag::Context(2), Value::U8(3)),
            Element::anonymous(Value::Structure(vec![])),
        ]
    );
}

#[test]
fn test_certificate_shape() {
    init_logger();
    let mut buf = [0u8; 256];
    let buf_len = buf.len();
    let mut wb = WriteBuf::new(&mut buf, buf_len);
    let mut td = TestData::new(&mut wb);
    td.cert(&[0x01, 0x02, 0x03], 0x27812280).unwrap();
    let len = wb.get_tail();

    let c = cert::decode_cert(&buf[..len]).unwrap();
    assert_eq!(
        c.find_element(Tag::Context(cert::CertTags::NotBefore as u8))
            .map(|e| &e.value),
        Some(&Value::U32(0x27812280))
    );
    // Fields were written canonically, so the bytes survive a round trip
    assert_eq!(c.encode(256).unwrap(), &buf[..len]);

    // Drop the trailing signature and close the structure early
    let mut short = buf[..len].to_vec();
    let sig_start = len - (1 + 1 + 1 + 64 + 1);
    short.truncate(sig_start);
    short.push(0x18);
    assert_eq!(
        cert::decode_cert(&short),
        Err(Error::SchemaViolation {
            reason: "certificate field count"
        })
    );
}
