use crate::error::*;
use byteorder::{ByteOrder, LittleEndian};

/// A fixed capacity little-endian write buffer. It never grows, writes that
/// do not fit fail with `Error::OutOfSpace` and leave the buffer unchanged.
pub struct WriteBuf<'a> {
    buf: &'a mut [u8],
    end: usize,
}

impl<'a> WriteBuf<'a> {
    pub fn new(buf: &'a mut [u8], len: usize) -> WriteBuf<'a> {
        let len = len.min(buf.len());
        WriteBuf {
            buf: &mut buf[..len],
            end: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn get_tail(&self) -> usize {
        self.end
    }

    pub fn rewind_tail_to(&mut self, new_end: usize) {
        self.end = new_end.min(self.end);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.end]
    }

    pub fn append_with<F>(&mut self, size: usize, f: F) -> Result<(), Error>
    where
        F: FnOnce(&mut Self),
    {
        let remaining = self.buf.len() - self.end;
        if size <= remaining {
            f(self);
            self.end += size;
            Ok(())
        } else {
            Err(Error::OutOfSpace {
                needed: size,
                remaining,
            })
        }
    }

    fn tail_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.end..]
    }

    pub fn copy_from_slice(&mut self, src: &[u8]) -> Result<(), Error> {
        self.append_with(src.len(), |x| {
            x.tail_mut()[..src.len()].copy_from_slice(src);
        })
    }

    pub fn le_u8(&mut self, data: u8) -> Result<(), Error> {
        self.append_with(1, |x| {
            x.tail_mut()[0] = data;
        })
    }

    pub fn le_i8(&mut self, data: i8) -> Result<(), Error> {
        self.le_u8(data as u8)
    }

    pub fn le_u16(&mut self, data: u16) -> Result<(), Error> {
        self.append_with(2, |x| LittleEndian::write_u16(x.tail_mut(), data))
    }

    pub fn le_i16(&mut self, data: i16) -> Result<(), Error> {
        self.append_with(2, |x| LittleEndian::write_i16(x.tail_mut(), data))
    }

    pub fn le_u32(&mut self, data: u32) -> Result<(), Error> {
        self.append_with(4, |x| LittleEndian::write_u32(x.tail_mut(), data))
    }

    pub fn le_i32(&mut self, data: i32) -> Result<(), Error> {
        self.append_with(4, |x| LittleEndian::write_i32(x.tail_mut(), data))
    }

    pub fn le_u64(&mut self, data: u64) -> Result<(), Error> {
        self.append_with(8, |x| LittleEndian::write_u64(x.tail_mut(), data))
    }

    pub fn le_i64(&mut self, data: i64) -> Result<(), Error> {
        self.append_with(8, |x| LittleEndian::write_i64(x.tail_mut(), data))
    }

    pub fn le_f32(&mut self, data: f32) -> Result<(), Error> {
        self.append_with(4, |x| LittleEndian::write_f32(x.tail_mut(), data))
    }

    pub fn le_f64(&mut self, data: f64) -> Result<(), Error> {
        self.append_with(8, |x| LittleEndian::write_f64(x.tail_mut(), data))
    }

    // Caller guarantees that data fits in nbytes
    pub fn le_uint(&mut self, nbytes: usize, data: u64) -> Result<(), Error> {
        self.append_with(nbytes, |x| {
            LittleEndian::write_uint(x.tail_mut(), data, nbytes)
        })
    }
}
