use crate::{
    error::*,
    tlv_common::{
        control_octet, is_short, length_width, ElementType, TagControl, TAG_SIZE_MAP,
    },
    tlv_types::{Element, Tag, Value},
    utils::writebuf::WriteBuf,
};

/// Capacity used by `Element::encode_default()`, enough for most messages
/// and certificates.
pub const DEFAULT_ENCODE_CAPACITY: usize = 4000;

/// Writes TLV elements into a fixed capacity `WriteBuf`.
///
/// Members are written in the order given. No canonical sorting happens
/// here, callers that need canonical output must order their containers.
pub struct TLVWriter<'a, 'b> {
    buf: &'b mut WriteBuf<'a>,
}

impl<'a, 'b> TLVWriter<'a, 'b> {
    pub fn new(buf: &'b mut WriteBuf<'a>) -> Self {
        TLVWriter { buf }
    }

    // TODO: The current method of using writebuf's put methods force us to do
    // at max 3 checks while writing a single TLV (once for control, once for tag,
    // once for value), so do a single check and write the whole thing.
    #[inline(always)]
    fn put_control_tag(&mut self, tag: Tag, val_type: ElementType) -> Result<(), Error> {
        let (tag_control, tag_val) = match tag {
            Tag::Anonymous => (TagControl::Anonymous, 0),
            Tag::Context(v) => (TagControl::Context, v as u64),
            // Implicit tags are written like core profile tags
            Tag::Implicit(v) => (common_profile_control(v), v as u64),
            Tag::Profile(p, v) if p.is_core() => (common_profile_control(v), v as u64),
            Tag::Profile(p, v) => {
                let tag_control = if is_short(v) {
                    TagControl::FullQual48
                } else {
                    TagControl::FullQual64
                };
                (
                    tag_control,
                    (p.vendor_id as u64) | ((p.profile_id as u64) << 16) | ((v as u64) << 32),
                )
            }
        };
        self.buf.le_u8(control_octet(tag_control, val_type))?;
        if tag_control != TagControl::Anonymous {
            self.buf
                .le_uint(TAG_SIZE_MAP[tag_control as usize], tag_val)?;
        }
        Ok(())
    }

    pub fn i8(&mut self, tag: Tag, data: i8) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::S8)?;
        self.buf.le_i8(data)
    }

    pub fn i16(&mut self, tag: Tag, data: i16) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::S16)?;
        self.buf.le_i16(data)
    }

    pub fn i32(&mut self, tag: Tag, data: i32) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::S32)?;
        self.buf.le_i32(data)
    }

    pub fn i64(&mut self, tag: Tag, data: i64) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::S64)?;
        self.buf.le_i64(data)
    }

    pub fn u8(&mut self, tag: Tag, data: u8) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::U8)?;
        self.buf.le_u8(data)
    }

    pub fn u16(&mut self, tag: Tag, data: u16) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::U16)?;
        self.buf.le_u16(data)
    }

    pub fn u32(&mut self, tag: Tag, data: u32) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::U32)?;
        self.buf.le_u32(data)
    }

    pub fn u64(&mut self, tag: Tag, data: u64) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::U64)?;
        self.buf.le_u64(data)
    }

    pub fn f32(&mut self, tag: Tag, data: f32) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::F32)?;
        self.buf.le_f32(data)
    }

    pub fn f64(&mut self, tag: Tag, data: f64) -> Result<(), Error> {
        self.put_control_tag(tag, ElementType::F64)?;
        self.buf.le_f64(data)
    }

    /// Octet string, the length prefix is as wide as the length needs
    pub fn str(&mut self, tag: Tag, data: &[u8]) -> Result<(), Error> {
        self.len_prefixed(tag, false, data)
    }

    /// UTF-8 string, the length prefix is as wide as the length needs
    pub fn utf8(&mut self, tag: Tag, data: &str) -> Result<(), Error> {
        self.len_prefixed(tag, true, data.as_bytes())
    }

    fn len_prefixed(&mut self, tag: Tag, utf: bool, data: &[u8]) -> Result<(), Error> {
        let width = length_width(data.len());
        self.put_control_tag(tag, string_type(utf, width))?;
        self.buf.le_uint(width, data.len() as u64)?;
        self.buf.copy_from_slice(data)
    }

    fn no_val(&mut self, tag: Tag, element: ElementType) -> Result<(), Error> {
        self.put_control_tag(tag, element)
    }

    pub fn null(&mut self, tag: Tag) -> Result<(), Error> {
        self.no_val(tag, ElementType::Null)
    }

    pub fn start_struct(&mut self, tag: Tag) -> Result<(), Error> {
        self.no_val(tag, ElementType::Struct)
    }

    pub fn start_array(&mut self, tag: Tag) -> Result<(), Error> {
        self.no_val(tag, ElementType::Array)
    }

    pub fn start_list(&mut self, tag: Tag) -> Result<(), Error> {
        self.no_val(tag, ElementType::List)
    }

    pub fn end_container(&mut self) -> Result<(), Error> {
        self.no_val(Tag::Anonymous, ElementType::EndCnt)
    }

    pub fn bool(&mut self, tag: Tag, val: bool) -> Result<(), Error> {
        if val {
            self.no_val(tag, ElementType::True)
        } else {
            self.no_val(tag, ElementType::False)
        }
    }

    /// Write a whole element tree. On failure nothing of the element is
    /// left behind in the buffer.
    pub fn element(&mut self, element: &Element) -> Result<(), Error> {
        let anchor = self.get_tail();
        let result = element.value.to_tlv(self, element.tag);
        if result.is_err() {
            self.rewind_to(anchor);
        }
        result
    }

    pub fn get_tail(&self) -> usize {
        self.buf.get_tail()
    }

    pub fn rewind_to(&mut self, anchor: usize) {
        self.buf.rewind_tail_to(anchor);
    }
}

fn common_profile_control(id: u32) -> TagControl {
    if is_short(id) {
        TagControl::CommonPrf16
    } else {
        TagControl::CommonPrf32
    }
}

fn string_type(utf: bool, width: usize) -> ElementType {
    match (utf, width) {
        (true, 1) => ElementType::Utf8l,
        (true, 2) => ElementType::Utf16l,
        (true, 4) => ElementType::Utf32l,
        (true, _) => ElementType::Utf64l,
        (false, 1) => ElementType::Str8l,
        (false, 2) => ElementType::Str16l,
        (false, 4) => ElementType::Str32l,
        (false, _) => ElementType::Str64l,
    }
}

pub trait ToTLV {
    fn to_tlv(&self, tw: &mut TLVWriter, tag: Tag) -> Result<(), Error>;
}

macro_rules! totlv_for {
    ($($t:ident)*) => {
        $(
            impl ToTLV for $t {
                fn to_tlv(&self, tw: &mut TLVWriter, tag: Tag) -> Result<(), Error> {
                    tw.$t(tag, *self)
                }
            }
        )*
    };
}

// Generate ToTLV for standard data types
totlv_for!(i8 i16 i32 i64 u8 u16 u32 u64 f32 f64 bool);

impl<'a, T: ToTLV> ToTLV for &'a [T] {
    fn to_tlv(&self, tw: &mut TLVWriter, tag: Tag) -> Result<(), Error> {
        tw.start_array(tag)?;
        for i in *self {
            i.to_tlv(tw, Tag::Anonymous)?;
        }
        tw.end_container()
    }
}

impl ToTLV for Value {
    fn to_tlv(&self, tw: &mut TLVWriter, tag: Tag) -> Result<(), Error> {
        match self {
            Value::Null => tw.null(tag),
            Value::Bool(v) => v.to_tlv(tw, tag),
            Value::I8(v) => v.to_tlv(tw, tag),
            Value::I16(v) => v.to_tlv(tw, tag),
            Value::I32(v) => v.to_tlv(tw, tag),
            Value::I64(v) => v.to_tlv(tw, tag),
            Value::U8(v) => v.to_tlv(tw, tag),
            Value::U16(v) => v.to_tlv(tw, tag),
            Value::U32(v) => v.to_tlv(tw, tag),
            Value::U64(v) => v.to_tlv(tw, tag),
            Value::F32(v) => v.to_tlv(tw, tag),
            Value::F64(v) => v.to_tlv(tw, tag),
            Value::Str(s) => tw.utf8(tag, s),
            Value::Bytes(b) => tw.str(tag, b),
            Value::Structure(members) => {
                tw.start_struct(tag)?;
                for m in members {
                    m.value.to_tlv(tw, m.tag)?;
                }
                tw.end_container()
            }
            Value::Array(values) => values.as_slice().to_tlv(tw, tag),
            Value::List(members) => {
                tw.start_list(tag)?;
                for m in members {
                    m.value.to_tlv(tw, m.tag)?;
                }
                tw.end_container()
            }
        }
    }
}

impl Element {
    /// Encode into `buf`, returning the number of bytes written.
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<usize, Error> {
        let buf_len = buf.len();
        let mut writebuf = WriteBuf::new(buf, buf_len);
        let mut tw = TLVWriter::new(&mut writebuf);
        tw.element(self)?;
        Ok(tw.get_tail())
    }

    /// Encode into a buffer of exactly `capacity` bytes. The buffer never
    /// grows, an element that does not fit fails with `Error::OutOfSpace`.
    pub fn encode(&self, capacity: usize) -> Result<Vec<u8>, Error> {
        let mut buf = vec![0; capacity];
        let len = self.encode_into(&mut buf)?;
        buf.truncate(len);
        Ok(buf)
    }

    pub fn encode_default(&self) -> Result<Vec<u8>, Error> {
        self.encode(DEFAULT_ENCODE_CAPACITY)
    }
}
