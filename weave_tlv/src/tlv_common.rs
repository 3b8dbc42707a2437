use num_derive::FromPrimitive;

/* Tag Control */
#[derive(FromPrimitive, Debug, Copy, Clone, PartialEq)]
pub enum TagControl {
    Anonymous = 0,
    Context = 1,
    CommonPrf16 = 2,
    CommonPrf32 = 3,
    ImplPrf16 = 4,
    ImplPrf32 = 5,
    FullQual48 = 6,
    FullQual64 = 7,
}

pub const TAG_SHIFT_BITS: u8 = 5;
pub const TAG_MASK: u8 = 0xe0;
pub const TYPE_MASK: u8 = 0x1f;
pub const MAX_TAG_INDEX: usize = 8;

// Bytes that follow the control octet for each tag control
pub static TAG_SIZE_MAP: [usize; MAX_TAG_INDEX] = [
    0, // Anonymous
    1, // Context
    2, // CommonPrf16
    4, // CommonPrf32
    2, // ImplPrf16
    4, // ImplPrf32
    6, // FullQual48
    8, // FullQual64
];

/* Element Types, the numeric values are the 5 low bits of the control octet */
#[derive(FromPrimitive, Debug, Copy, Clone, PartialEq)]
pub enum ElementType {
    S8 = 0,
    S16 = 1,
    S32 = 2,
    S64 = 3,
    U8 = 4,
    U16 = 5,
    U32 = 6,
    U64 = 7,
    False = 8,
    True = 9,
    F32 = 10,
    F64 = 11,
    Utf8l = 12,
    Utf16l = 13,
    Utf32l = 14,
    Utf64l = 15,
    Str8l = 16,
    Str16l = 17,
    Str32l = 18,
    Str64l = 19,
    Null = 20,
    Struct = 21,
    Array = 22,
    List = 23,
    EndCnt = 24,
}

pub const MAX_ELEMENT_TYPE: usize = 25;

// The array indices here correspond to the numeric value of the Element Type.
// For strings this is the width of the length prefix.
pub static VALUE_SIZE_MAP: [usize; MAX_ELEMENT_TYPE] = [
    1, // S8   0
    2, // S16  1
    4, // S32  2
    8, // S64  3
    1, // U8   4
    2, // U16  5
    4, // U32  6
    8, // U64  7
    0, // False 8
    0, // True 9
    4, // F32  10
    8, // F64  11
    1, // Utf8l 12
    2, // Utf16l  13
    4, // Utf32l 14
    8, // Utf64l 15
    1, // Str8l 16
    2, // Str16l 17
    4, // Str32l 18
    8, // Str64l 19
    0, // Null  20
    0, // Struct 21
    0, // Array  22
    0, // List  23
    0, // EndCnt  24
];

pub fn control_octet(tag_control: TagControl, element_type: ElementType) -> u8 {
    ((tag_control as u8) << TAG_SHIFT_BITS) | (element_type as u8)
}

/// Width in bytes of the length prefix used for a payload of `len` bytes.
pub fn length_width(len: usize) -> usize {
    let len = len as u64;
    if len <= u8::MAX as u64 {
        1
    } else if len <= u16::MAX as u64 {
        2
    } else if len <= u32::MAX as u64 {
        4
    } else {
        8
    }
}

// Tag ids and lengths share the same 16/32 bit split for compressed ids
pub fn is_short(id: u32) -> bool {
    id <= u16::MAX as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_octet() {
        assert_eq!(control_octet(TagControl::Anonymous, ElementType::U8), 0x04);
        assert_eq!(control_octet(TagControl::Context, ElementType::U8), 0x24);
        assert_eq!(control_octet(TagControl::FullQual48, ElementType::Struct), 0xd5);
        assert_eq!(control_octet(TagControl::FullQual64, ElementType::U8), 0xe4);
        assert_eq!(control_octet(TagControl::Anonymous, ElementType::EndCnt), 0x18);
    }

    #[test]
    fn test_selectors_from_primitive() {
        let t: Option<TagControl> = num::FromPrimitive::from_u8(5);
        assert_eq!(t, Some(TagControl::ImplPrf32));
        let e: Option<ElementType> = num::FromPrimitive::from_u8(24);
        assert_eq!(e, Some(ElementType::EndCnt));
        for code in 25..32 {
            let e: Option<ElementType> = num::FromPrimitive::from_u8(code);
            assert_eq!(e, None);
        }
    }

    #[test]
    fn test_is_short() {
        assert!(is_short(0));
        assert!(is_short(0xff));
        assert!(is_short(0x100));
        assert!(is_short(0xffff));
        assert!(!is_short(0x10000));
        assert!(!is_short(0x1ffff));
        assert!(!is_short(0xffff_ffff));
    }

    #[test]
    fn test_length_width() {
        assert_eq!(length_width(0), 1);
        assert_eq!(length_width(0xff), 1);
        assert_eq!(length_width(0x100), 2);
        assert_eq!(length_width(0xffff), 2);
        assert_eq!(length_width(0x10000), 4);
    }
}
