/*
This code is part of the GeoShape geospatial library.
Authors: Dr. John Lindsay
Created: 02/03/2026
Last Modified: 14/10/2026
License: MIT
*/
use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::prelude::*;
use std::io::{Result, SeekFrom};

/// Reads numeric values from a seekable source in a byte order that can be
/// switched between calls. Shapefiles mix big- and little-endian fields
/// within a single record, so the order is expected to change often.
pub struct ByteOrderReader<R: Read + Seek> {
    is_le: bool,
    reader: R,
    pos: usize,
    len: usize,
}

impl<R: Read + Seek> ByteOrderReader<R> {
    pub fn new(mut reader: R, byte_order: Endianness) -> Result<ByteOrderReader<R>> {
        let len = reader.seek(SeekFrom::End(0))? as usize;
        reader.seek(SeekFrom::Start(0))?;
        Ok(ByteOrderReader {
            reader,
            is_le: byte_order == Endianness::LittleEndian,
            pos: 0usize,
            len,
        })
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.is_le = byte_order == Endianness::LittleEndian;
    }

    pub fn seek(&mut self, position: usize) -> Result<()> {
        self.pos = position;
        self.reader.seek(SeekFrom::Start(self.pos as u64))?;
        Ok(())
    }

    pub fn inc_pos(&mut self, skip: usize) -> Result<()> {
        self.seek(self.pos + skip)
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bytes between the current position and the end of the source.
    pub fn remaining(&self) -> usize {
        self.len.saturating_sub(self.pos)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.pos += 4;
        if self.is_le {
            return self.reader.read_i32::<LittleEndian>();
        }
        self.reader.read_i32::<BigEndian>()
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.pos += 8;
        if self.is_le {
            return self.reader.read_f64::<LittleEndian>();
        }
        self.reader.read_f64::<BigEndian>()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Endianness {
    LittleEndian,
    BigEndian,
}

impl Default for Endianness {
    fn default() -> Endianness {
        Endianness::LittleEndian
    }
}

#[cfg(test)]
mod test {
    use super::{ByteOrderReader, Endianness};
    use std::io::Cursor;

    #[test]
    fn test_switching_byte_order() {
        let bytes: Vec<u8> = vec![0, 0, 39, 10, 232, 3, 0, 0];
        let mut bor = ByteOrderReader::new(Cursor::new(bytes), Endianness::BigEndian).unwrap();
        assert_eq!(bor.len(), 8);
        assert_eq!(bor.read_i32().unwrap(), 9994);
        bor.set_byte_order(Endianness::LittleEndian);
        assert_eq!(bor.read_i32().unwrap(), 1000);
        assert_eq!(bor.remaining(), 0);
    }

    #[test]
    fn test_seek_and_skip() {
        let bytes: Vec<u8> = vec![0, 0, 0, 7, 0, 0, 0, 8, 0, 0, 0, 9];
        let mut bor = ByteOrderReader::new(Cursor::new(bytes), Endianness::BigEndian).unwrap();
        bor.inc_pos(4).unwrap();
        assert_eq!(bor.read_i32().unwrap(), 8);
        bor.seek(0).unwrap();
        assert_eq!(bor.pos(), 0);
        assert_eq!(bor.read_i32().unwrap(), 7);
        assert_eq!(bor.remaining(), 8);
    }
}
