use weave_tlv::{error::Error, tlv_types::Tag, tlv_writer::TLVWriter, utils::writebuf::WriteBuf};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// Parse "04 2A" style hex strings
pub fn hex(s: &str) -> Vec<u8> {
    s.split_whitespace()
        .map(|b| u8::from_str_radix(b, 16).unwrap())
        .collect()
}

pub struct TestData<'a, 'b> {
    tw: TLVWriter<'a, 'b>,
}

impl<'a, 'b> TestData<'a, 'b> {
    pub fn new(buf: &'b mut WriteBuf<'a>) -> Self {
        Self {
            tw: TLVWriter::new(buf),
        }
    }

    // A certificate written with the low level writer, fields in canonical order
    pub fn cert(&mut self, serial: &[u8], not_before: u32) -> Result<(), Error> {
        self.tw.start_struct(Tag::Anonymous)?;
        self.tw.str(Tag::Context(1), serial)?;
        self.tw.u8(Tag::Context(2), 1)?;
        self.tw.start_list(Tag::Context(3))?;
        self.tw.u64(Tag::Context(20), 0xcacacaca00000001)?;
        self.tw.end_container()?;
        self.tw.u32(Tag::Context(4), not_before)?;
        self.tw.u32(Tag::Context(5), 0)?;
        self.tw.start_list(Tag::Context(6))?;
        self.tw.u64(Tag::Context(17), 0xdededede00010001)?;
        self.tw.end_container()?;
        self.tw.u8(Tag::Context(7), 1)?;
        self.tw.u8(Tag::Context(8), 1)?;
        self.tw.str(Tag::Context(9), &[0x04; 65])?;
        self.tw.start_list(Tag::Context(10))?;
        self.tw.start_struct(Tag::Context(1))?;
        self.tw.bool(Tag::Context(1), true)?;
        self.tw.end_container()?;
        self.tw.u8(Tag::Context(2), 0x60)?;
        self.tw.end_container()?;
        self.tw.str(Tag::Context(11), &[0x30; 64])?;
        self.tw.end_container()
    }
}
