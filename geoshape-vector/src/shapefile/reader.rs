/*
This code is part of the GeoShape geospatial library.
Authors: Dr. John Lindsay
Created: 06/03/2026
Last Modified: 16/10/2026
License: MIT

Notes: A sequential reader over the main (.shp) file. Records are decoded
one at a time; nothing beyond the current record is held in memory unless
the whole-file source was selected.
*/
use crate::shapefile::error::{Result, ShapefileError};
use crate::shapefile::geometry::Geometry;
use crate::shapefile::handlers::{Handler, ShapeHandler};
use crate::shapefile::header::{ShapefileHeader, HEADER_LENGTH};
use crate::shapefile::shape_type::ShapeType;
use crate::shapefile::source::{ByteSource, StreamingSource, WholeFileSource};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use geoshape_common::configs::Configs;
use geoshape_common::structures::BoundingBox;
use geoshape_common::utils::{ByteOrderReader, Endianness};
use std::fmt;
use std::fs::{self, File};
use std::io::prelude::*;
use std::io::{BufReader, Cursor};
use std::path::Path;
use tracing::{debug, trace, warn};

const RECORD_HEADER_LENGTH: usize = 8;

/// One decoded record of the main file.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// 1-based record number.
    pub number: i32,
    /// Content length in bytes, record header excluded.
    pub content_length: usize,
    /// The record's own type code: the file's type or Null.
    pub shape_type: ShapeType,
    /// Stored extent of multipoint, polyline and polygon records.
    pub bbox: Option<BoundingBox>,
    pub shape: Geometry,
    /// Byte offset of the record header within the main file.
    pub offset: u64,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "record {} ({}, {} bytes at offset {})",
            self.number, self.shape_type, self.content_length, self.offset
        )
    }
}

/// Reads records from a main (.shp) file in on-disk order.
///
/// Examples:
///
/// ```no_run
/// use geoshape_vector::{Configs, ShapefileReader};
///
/// let mut reader = ShapefileReader::open("roads.shp", &Configs::new())?;
/// while reader.has_next()? {
///     let record = reader.next_record()?;
///     println!("{}", record);
/// }
/// reader.close();
/// # Ok::<(), geoshape_vector::ShapefileError>(())
/// ```
pub struct ShapefileReader {
    source: Option<Box<dyn ByteSource>>,
    header: ShapefileHeader,
    handler: ShapeHandler,
    last_record_number: i32,
    failed: bool,
}

impl ShapefileReader {
    /// Opens a main file. Depending on `configs.buffer_whole_file` the file is
    /// loaded into memory at once or streamed in `read_buffer_size` chunks.
    pub fn open<P: AsRef<Path>>(path: P, configs: &Configs) -> Result<ShapefileReader> {
        let path = path.as_ref();
        let source: Box<dyn ByteSource> = if configs.buffer_whole_file {
            Box::new(WholeFileSource::new(fs::read(path)?))
        } else {
            let f = BufReader::new(File::open(path)?);
            Box::new(StreamingSource::new(f, configs.read_buffer_size))
        };
        debug!(
            path = %path.display(),
            whole_file = configs.buffer_whole_file,
            "opening shapefile"
        );
        ShapefileReader::with_source(source, configs.strict_headers)
    }

    /// Streams from a seekable reader. If the reader turns out not to seek,
    /// it is read forward-only, as with `from_stream`.
    pub fn from_reader<R: Read + Seek + 'static>(
        reader: R,
        configs: &Configs,
    ) -> Result<ShapefileReader> {
        let source = StreamingSource::new(reader, configs.read_buffer_size);
        ShapefileReader::with_source(Box::new(source), configs.strict_headers)
    }

    /// Streams from a reader that cannot seek, such as a pipe or a socket.
    /// Sequential reading works as usual; `shape_at` and `count_records`
    /// fail with `ShapefileError::NotSeekable`.
    pub fn from_stream<R: Read + 'static>(reader: R, configs: &Configs) -> Result<ShapefileReader> {
        let source = StreamingSource::forward_only(reader, configs.read_buffer_size);
        ShapefileReader::with_source(Box::new(source), configs.strict_headers)
    }

    pub fn from_bytes(bytes: Vec<u8>, strict: bool) -> Result<ShapefileReader> {
        ShapefileReader::with_source(Box::new(WholeFileSource::new(bytes)), strict)
    }

    fn with_source(mut source: Box<dyn ByteSource>, strict: bool) -> Result<ShapefileReader> {
        let available = source.fill(HEADER_LENGTH)?;
        if available < HEADER_LENGTH {
            return Err(ShapefileError::Header(format!(
                "file is {} bytes, shorter than its header",
                available
            )));
        }
        let header_bytes = &source.bytes()[..HEADER_LENGTH];
        let header = ShapefileHeader::from_bytes(header_bytes, strict)?;
        let type_code = LittleEndian::read_i32(&header_bytes[32..36]);
        source.consume(HEADER_LENGTH);

        let handler = match header.shape_type {
            ShapeType::Null | ShapeType::Undefined => {
                return Err(ShapefileError::UnsupportedShapeType(type_code))
            }
            st => ShapeHandler::for_shape_type(st)?,
        };

        if let Some(len) = source.len() {
            if len != header.file_length_bytes() {
                warn!(
                    declared = header.file_length_bytes(),
                    actual = len,
                    "shapefile length does not match its header"
                );
            }
        }
        debug!(shape_type = %header.shape_type, "shapefile header read");

        Ok(ShapefileReader {
            source: Some(source),
            header,
            handler,
            last_record_number: 0,
            failed: false,
        })
    }

    pub fn header(&self) -> &ShapefileHeader {
        &self.header
    }

    pub fn shape_type(&self) -> ShapeType {
        self.header.shape_type
    }

    fn source_mut(&mut self) -> Result<&mut Box<dyn ByteSource>> {
        self.source.as_mut().ok_or(ShapefileError::Closed)
    }

    /// True if another record follows. A next record whose number is not
    /// one greater than the last one read is treated as the end of the data.
    pub fn has_next(&mut self) -> Result<bool> {
        let expected = self.last_record_number + 1;
        let source = self.source_mut()?;
        if source.fill(RECORD_HEADER_LENGTH)? < RECORD_HEADER_LENGTH {
            return Ok(false);
        }
        let number = BigEndian::read_i32(&source.bytes()[..4]);
        if number != expected {
            debug!(
                found = number,
                expected, "record sequence broken, treating as end of data"
            );
            return Ok(false);
        }
        Ok(true)
    }

    /// Decodes the record at the current position and advances past it.
    pub fn next_record(&mut self) -> Result<Record> {
        let file_type = self.header.shape_type;
        let source = self.source.as_mut().ok_or(ShapefileError::Closed)?;
        let expected = self.last_record_number + 1;
        let record = read_record(&mut **source, &self.handler, file_type, expected)?;
        self.last_record_number = record.number;
        trace!(record = record.number, offset = record.offset, "record read");
        Ok(record)
    }

    /// Decodes the single record whose header starts at byte `offset`, such
    /// as one obtained from `IndexFile::offset_in_bytes`. Sequential reading
    /// resumes where it was afterwards.
    pub fn shape_at(&mut self, offset: u64) -> Result<Record> {
        let file_type = self.header.shape_type;
        let source = self.source.as_mut().ok_or(ShapefileError::Closed)?;
        if !source.can_seek() {
            return Err(ShapefileError::NotSeekable);
        }
        let resume = source.position();
        source.seek(offset)?;
        let record = read_record(&mut **source, &self.handler, file_type, 0);
        source.seek(resume)?;
        record
    }

    /// Counts the records from the start of the file by walking the record
    /// headers only. The current position is kept.
    pub fn count_records(&mut self) -> Result<usize> {
        let source = self.source_mut()?;
        if !source.can_seek() {
            return Err(ShapefileError::NotSeekable);
        }
        let resume = source.position();
        source.seek(HEADER_LENGTH as u64)?;
        let mut count = 0usize;
        loop {
            if source.fill(RECORD_HEADER_LENGTH)? < RECORD_HEADER_LENGTH {
                break;
            }
            let number = BigEndian::read_i32(&source.bytes()[..4]);
            let words = BigEndian::read_i32(&source.bytes()[4..8]);
            if number != count as i32 + 1 || words < 0 {
                break;
            }
            let offset = source.position() + RECORD_HEADER_LENGTH as u64 + words as u64 * 2;
            source.seek(offset)?;
            count += 1;
        }
        source.seek(resume)?;
        Ok(count)
    }

    /// Releases the byte source. Later calls fail with `ShapefileError::Closed`.
    pub fn close(&mut self) {
        if self.source.take().is_some() {
            debug!("shapefile reader closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }
}

impl Iterator for ShapefileReader {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        if self.failed {
            return None;
        }
        let item = match self.has_next() {
            Ok(true) => self.next_record(),
            Ok(false) => return None,
            Err(e) => Err(e),
        };
        if item.is_err() {
            self.failed = true;
        }
        Some(item)
    }
}

/// Reads one record at the source's current position and consumes it.
/// `expected_number` only labels errors raised before the record header is
/// available.
fn read_record(
    source: &mut dyn ByteSource,
    handler: &ShapeHandler,
    file_type: ShapeType,
    expected_number: i32,
) -> Result<Record> {
    let offset = source.position();
    let available = source.fill(RECORD_HEADER_LENGTH)?;
    if available < RECORD_HEADER_LENGTH {
        return Err(ShapefileError::TruncatedRecord {
            record: expected_number,
            needed: RECORD_HEADER_LENGTH,
            available,
        });
    }
    let number = BigEndian::read_i32(&source.bytes()[..4]);
    let words = BigEndian::read_i32(&source.bytes()[4..8]);
    if words < 2 {
        return Err(ShapefileError::CorruptRecord(format!(
            "record {} declares a content length of {} words",
            number, words
        )));
    }
    let content_length = words as usize * 2;
    let total = RECORD_HEADER_LENGTH + content_length;
    let available = source.fill(total)?;
    if available < total {
        return Err(ShapefileError::TruncatedRecord {
            record: number,
            needed: total,
            available,
        });
    }

    let content = &source.bytes()[RECORD_HEADER_LENGTH..total];
    let mut bor = ByteOrderReader::new(Cursor::new(content), Endianness::LittleEndian)?;
    let record_type = ShapeType::from_int(bor.read_i32()?);
    if record_type != ShapeType::Null && record_type != file_type {
        return Err(ShapefileError::ShapeTypeMismatch {
            record: number,
            expected: file_type,
            found: record_type,
        });
    }

    let bbox = if record_type != ShapeType::Null && file_type.has_record_bounds() {
        if bor.remaining() < 32 {
            return Err(ShapefileError::CorruptRecord(format!(
                "record {} is too short for its bounding box",
                number
            )));
        }
        // peek; the handler reads the box again as part of the payload
        let bb = BoundingBox {
            min_x: bor.read_f64()?,
            min_y: bor.read_f64()?,
            max_x: bor.read_f64()?,
            max_y: bor.read_f64()?,
        };
        bor.seek(4)?;
        Some(bb)
    } else {
        None
    };

    let shape = handler.read(&mut bor, record_type)?;
    source.consume(total);

    Ok(Record {
        number,
        content_length,
        shape_type: record_type,
        bbox,
        shape,
        offset,
    })
}
