use crate::error::*;
use byteorder::{ByteOrder, LittleEndian};

/// A little-endian read cursor over a byte slice.
pub struct ParseBuf<'a> {
    buf: &'a [u8],
    read_off: usize,
}

impl<'a> ParseBuf<'a> {
    pub fn new(buf: &'a [u8]) -> ParseBuf<'a> {
        ParseBuf { buf, read_off: 0 }
    }

    pub fn read_off(&self) -> usize {
        self.read_off
    }

    pub fn left(&self) -> usize {
        self.buf.len() - self.read_off
    }

    // Return the data that is yet to be parsed
    pub fn as_slice(&self) -> &'a [u8] {
        &self.buf[self.read_off..]
    }

    fn underflow(&self, needed: u64) -> Error {
        Error::BufferUnderflow {
            offset: self.read_off,
            needed,
            remaining: self.left(),
        }
    }

    fn advance(&mut self, len: usize) {
        self.read_off += len;
    }

    pub fn parse_head_with<F, T>(&mut self, size: usize, f: F) -> Result<T, Error>
    where
        F: FnOnce(&[u8]) -> T,
    {
        if size <= self.left() {
            let data: T = f(&self.buf[self.read_off..(self.read_off + size)]);
            self.advance(size);
            return Ok(data);
        }
        Err(self.underflow(size as u64))
    }

    /// Consume `len` bytes and hand them out as a slice of the original buffer.
    pub fn take(&mut self, len: u64) -> Result<&'a [u8], Error> {
        if len > self.left() as u64 {
            return Err(self.underflow(len));
        }
        let len = len as usize;
        let data = &self.buf[self.read_off..(self.read_off + len)];
        self.advance(len);
        Ok(data)
    }

    pub fn le_u8(&mut self) -> Result<u8, Error> {
        self.parse_head_with(1, |x| x[0])
    }

    pub fn le_i8(&mut self) -> Result<i8, Error> {
        self.parse_head_with(1, |x| x[0] as i8)
    }

    pub fn le_u16(&mut self) -> Result<u16, Error> {
        self.parse_head_with(2, LittleEndian::read_u16)
    }

    pub fn le_i16(&mut self) -> Result<i16, Error> {
        self.parse_head_with(2, LittleEndian::read_i16)
    }

    pub fn le_u32(&mut self) -> Result<u32, Error> {
        self.parse_head_with(4, LittleEndian::read_u32)
    }

    pub fn le_i32(&mut self) -> Result<i32, Error> {
        self.parse_head_with(4, LittleEndian::read_i32)
    }

    pub fn le_u64(&mut self) -> Result<u64, Error> {
        self.parse_head_with(8, LittleEndian::read_u64)
    }

    pub fn le_i64(&mut self) -> Result<i64, Error> {
        self.parse_head_with(8, LittleEndian::read_i64)
    }

    pub fn le_f32(&mut self) -> Result<f32, Error> {
        self.parse_head_with(4, LittleEndian::read_f32)
    }

    pub fn le_f64(&mut self) -> Result<f64, Error> {
        self.parse_head_with(8, LittleEndian::read_f64)
    }

    pub fn le_uint(&mut self, nbytes: usize) -> Result<u64, Error> {
        self.parse_head_with(nbytes, |x| LittleEndian::read_uint(x, nbytes))
    }
}
