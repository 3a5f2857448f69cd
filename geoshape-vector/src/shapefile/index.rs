use crate::shapefile::error::{Result, ShapefileError};
use crate::shapefile::header::{ShapefileHeader, HEADER_LENGTH};
use byteorder::{BigEndian, ReadBytesExt};
use std::fs::File;
use std::io::prelude::*;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::{debug, warn};

/// The contents of a .shx index: one (offset, content length) pair per
/// record, both in 16-bit words as stored.
#[derive(Clone, Debug)]
pub struct IndexFile {
    header: ShapefileHeader,
    offsets: Vec<i32>,
    content_lengths: Vec<i32>,
}

impl IndexFile {
    pub fn open<P: AsRef<Path>>(path: P, strict: bool) -> Result<IndexFile> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading shapefile index");
        IndexFile::from_reader(BufReader::new(File::open(path)?), strict)
    }

    /// Reads the whole index from `reader`.
    pub fn from_reader<R: Read>(mut reader: R, strict: bool) -> Result<IndexFile> {
        let mut buffer = vec![];
        reader.read_to_end(&mut buffer)?;
        if buffer.len() < HEADER_LENGTH {
            return Err(ShapefileError::Header(format!(
                "index is {} bytes, shorter than its header",
                buffer.len()
            )));
        }
        let header = ShapefileHeader::from_bytes(&buffer[..HEADER_LENGTH], strict)?;

        let body = &buffer[HEADER_LENGTH..];
        if body.len() % 8 != 0 {
            warn!(trailing = body.len() % 8, "index body is not a whole number of entries");
        }
        let num_records = body.len() / 8;
        let mut offsets = Vec::with_capacity(num_records);
        let mut content_lengths = Vec::with_capacity(num_records);
        let mut cursor = Cursor::new(body);
        for _ in 0..num_records {
            offsets.push(cursor.read_i32::<BigEndian>()?);
            content_lengths.push(cursor.read_i32::<BigEndian>()?);
        }
        debug!(records = num_records, "shapefile index read");

        Ok(IndexFile {
            header,
            offsets,
            content_lengths,
        })
    }

    pub fn header(&self) -> &ShapefileHeader {
        &self.header
    }

    pub fn record_count(&self) -> usize {
        self.offsets.len()
    }

    fn check(&self, index: usize) -> Result<()> {
        if index >= self.offsets.len() {
            return Err(ShapefileError::RecordIndexOutOfRange {
                index,
                count: self.offsets.len(),
            });
        }
        Ok(())
    }

    /// Record offset in words, as stored in the index.
    pub fn offset(&self, index: usize) -> Result<i32> {
        self.check(index)?;
        Ok(self.offsets[index])
    }

    /// Record offset in bytes, suitable for `ShapefileReader::shape_at`.
    pub fn offset_in_bytes(&self, index: usize) -> Result<u64> {
        Ok(2 * self.offset(index)? as u64)
    }

    /// Record content length in words.
    pub fn content_length(&self, index: usize) -> Result<i32> {
        self.check(index)?;
        Ok(self.content_lengths[index])
    }
}

#[cfg(test)]
mod test {
    use super::IndexFile;
    use crate::shapefile::error::ShapefileError;
    use crate::shapefile::header::ShapefileHeader;
    use crate::shapefile::shape_type::ShapeType;
    use geoshape_common::structures::BoundingBox;
    use geoshape_common::utils::{ByteOrderWriter, Endianness};
    use std::io::Cursor;

    fn index_bytes(entries: &[(i32, i32)]) -> Vec<u8> {
        let mut bow = ByteOrderWriter::new(vec![], Endianness::BigEndian);
        let words = 50 + 4 * entries.len() as i32;
        let bbox = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        ShapefileHeader::new(ShapeType::MultiPoint, words, &bbox, [0.0, 0.0])
            .write(&mut bow)
            .unwrap();
        bow.set_byte_order(Endianness::BigEndian);
        for &(offset, length) in entries {
            bow.write_i32(offset).unwrap();
            bow.write_i32(length).unwrap();
        }
        bow.into_inner()
    }

    #[test]
    fn test_read_entries() {
        let bytes = index_bytes(&[(50, 28), (82, 36), (122, 20)]);
        let index = IndexFile::from_reader(Cursor::new(bytes), true).unwrap();
        assert_eq!(index.header().shape_type, ShapeType::MultiPoint);
        assert_eq!(index.record_count(), 3);
        assert_eq!(index.offset(1).unwrap(), 82);
        assert_eq!(index.offset_in_bytes(1).unwrap(), 164);
        assert_eq!(index.content_length(2).unwrap(), 20);
    }

    #[test]
    fn test_out_of_range() {
        let bytes = index_bytes(&[(50, 10)]);
        let index = IndexFile::from_reader(Cursor::new(bytes), true).unwrap();
        assert!(matches!(
            index.offset(1),
            Err(ShapefileError::RecordIndexOutOfRange { index: 1, count: 1 })
        ));
        assert!(index.content_length(5).is_err());
    }

    #[test]
    fn test_empty_and_short_index() {
        let index = IndexFile::from_reader(Cursor::new(index_bytes(&[])), true).unwrap();
        assert_eq!(index.record_count(), 0);
        assert!(IndexFile::from_reader(Cursor::new(vec![0u8; 40]), true).is_err());
    }
}
