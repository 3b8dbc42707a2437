pub mod parsebuf;
pub mod writebuf;
