use super::byte_order_reader::Endianness;
use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use std::io::prelude::*;
use std::io::Error;

/// Writes numeric values in a switchable byte order and keeps a running
/// count of the bytes emitted, which callers use to verify declared lengths.
pub struct ByteOrderWriter<W: Write> {
    byte_order: Endianness,
    writer: W,
    num_bytes_written: usize,
}

impl<W: Write> ByteOrderWriter<W> {
    pub fn new(writer: W, byte_order: Endianness) -> ByteOrderWriter<W> {
        ByteOrderWriter {
            byte_order,
            writer,
            num_bytes_written: 0,
        }
    }

    pub fn get_num_bytes_written(&self) -> usize {
        self.num_bytes_written
    }

    pub fn set_byte_order(&mut self, byte_order: Endianness) {
        self.byte_order = byte_order;
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.writer.write_all(bytes)?;
        self.num_bytes_written += bytes.len();
        Ok(())
    }

    pub fn write_i32(&mut self, value: i32) -> Result<(), Error> {
        match self.byte_order {
            Endianness::LittleEndian => self.writer.write_i32::<LittleEndian>(value)?,
            Endianness::BigEndian => self.writer.write_i32::<BigEndian>(value)?,
        }
        self.num_bytes_written += 4;
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        match self.byte_order {
            Endianness::LittleEndian => self.writer.write_f64::<LittleEndian>(value)?,
            Endianness::BigEndian => self.writer.write_f64::<BigEndian>(value)?,
        }
        self.num_bytes_written += 8;
        Ok(())
    }

    pub fn get_inner_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
