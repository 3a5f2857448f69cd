/*
This code is part of the GeoShape geospatial library.
Authors: Dr. John Lindsay
Created: 07/03/2026
Last Modified: 16/10/2026
License: MIT

Notes: Writes a main (.shp) file and its index (.shx) in lock-step. Nothing
is rolled back on failure; a failed write leaves both sinks partially
written.
*/
use crate::shapefile::error::{Result, ShapefileError};
use crate::shapefile::geometry::Geometry;
use crate::shapefile::handlers::{written_z_range, Handler, ShapeHandler};
use crate::shapefile::header::{ShapefileHeader, HEADER_LENGTH};
use crate::shapefile::shape_type::ShapeType;
use geoshape_common::configs::Configs;
use geoshape_common::structures::BoundingBox;
use geoshape_common::utils::{ByteBuffer, ByteOrderWriter, Endianness};
use std::fs::File;
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info, trace};

/// Streams geometries into a .shp/.shx pair.
///
/// Examples:
///
/// ```no_run
/// use geoshape_vector::{Configs, Coordinate, Geometry, ShapeType, ShapefileWriter};
///
/// let points = vec![
///     Geometry::Point(Coordinate::new(1.0, 2.0)),
///     Geometry::Point(Coordinate::new(3.0, 4.0)),
/// ];
/// let mut writer = ShapefileWriter::create("wells.shp", &Configs::new())?;
/// writer.write(&points, ShapeType::Point)?;
/// # Ok::<(), geoshape_vector::ShapefileError>(())
/// ```
pub struct ShapefileWriter<W: Write> {
    shp: Option<ByteOrderWriter<W>>,
    shx: Option<ByteOrderWriter<W>>,
    shape_buffer: ByteBuffer,
    handler: Option<ShapeHandler>,
    /// Offset of the next record, in 16-bit words.
    offset: i32,
    record_count: i32,
    verbose: bool,
}

impl ShapefileWriter<BufWriter<File>> {
    /// Creates `<path>.shp` and `<path>.shx`, replacing any extension on
    /// `path`.
    pub fn create<P: AsRef<Path>>(
        path: P,
        configs: &Configs,
    ) -> Result<ShapefileWriter<BufWriter<File>>> {
        let path = path.as_ref();
        let shp_file = path.with_extension("shp");
        let shx_file = path.with_extension("shx");
        let capacity = configs.write_buffer_size.max(HEADER_LENGTH);
        let shp = BufWriter::with_capacity(capacity, File::create(&shp_file)?);
        let shx = BufWriter::with_capacity(capacity, File::create(&shx_file)?);
        debug!(shp = %shp_file.display(), shx = %shx_file.display(), "creating shapefile");
        let mut writer = ShapefileWriter::from_writers(shp, shx);
        writer.verbose = configs.verbose_mode;
        Ok(writer)
    }
}

impl<W: Write> ShapefileWriter<W> {
    pub fn from_writers(shp: W, shx: W) -> ShapefileWriter<W> {
        ShapefileWriter {
            shp: Some(ByteOrderWriter::new(shp, Endianness::BigEndian)),
            shx: Some(ByteOrderWriter::new(shx, Endianness::BigEndian)),
            shape_buffer: ByteBuffer::with_capacity(4 * 1024),
            handler: None,
            offset: 50,
            record_count: 0,
            verbose: false,
        }
    }

    /// Writes both file headers. `file_length` is the final size of the
    /// main file in bytes; the index length follows from `num_records`.
    pub fn write_headers(
        &mut self,
        bbox: &BoundingBox,
        z_range: [f64; 2],
        shape_type: ShapeType,
        num_records: usize,
        file_length: usize,
    ) -> Result<()> {
        let handler = ShapeHandler::for_shape_type(shape_type)?;
        let shp = self.shp.as_mut().ok_or(ShapefileError::Closed)?;
        let shx = self.shx.as_mut().ok_or(ShapefileError::Closed)?;

        let shp_words = to_words(file_length / 2, "main file length")?;
        let shx_words = num_records
            .checked_mul(4)
            .and_then(|w| w.checked_add(50))
            .ok_or(ShapefileError::LengthOverflow {
                what: "index record count",
                value: num_records,
            })
            .and_then(|w| to_words(w, "index file length"))?;
        ShapefileHeader::new(shape_type, shp_words, bbox, z_range).write(shp)?;
        ShapefileHeader::new(shape_type, shx_words, bbox, z_range).write(shx)?;

        self.handler = Some(handler);
        self.offset = 50;
        self.record_count = 0;
        debug!(%shape_type, num_records, file_length, "shapefile headers written");
        Ok(())
    }

    /// Appends one record to the main file and its entry to the index.
    pub fn write_geometry(&mut self, geometry: &Geometry) -> Result<()> {
        let shp = self.shp.as_mut().ok_or(ShapefileError::Closed)?;
        let shx = self.shx.as_mut().ok_or(ShapefileError::Closed)?;
        let handler = self.handler.as_ref().ok_or_else(|| {
            ShapefileError::Geometry("headers must be written before geometries".to_string())
        })?;

        let length = handler.length(geometry)?;
        let required = length + 8;
        self.shape_buffer.clear();
        self.shape_buffer
            .grow_to_at_least(required)
            .map_err(|source| ShapefileError::BufferGrowth {
                requested: required,
                source,
            })?;

        let number = self.record_count + 1;
        let words = to_words(length / 2, "record content length")?;
        let next_offset = self
            .offset
            .checked_add(words)
            .and_then(|o| o.checked_add(4))
            .ok_or(ShapefileError::LengthOverflow {
                what: "record offset",
                value: self.offset as usize + length / 2 + 4,
            })?;
        let mut bow = ByteOrderWriter::new(&mut self.shape_buffer, Endianness::BigEndian);
        bow.write_i32(number)?;
        bow.write_i32(words)?;
        bow.set_byte_order(Endianness::LittleEndian);
        bow.write_i32(handler.shape_type().to_int())?;
        handler.write(&mut bow, geometry)?;
        let written = bow.get_num_bytes_written() - 8;
        if written != length {
            return Err(ShapefileError::HandlerLengthMismatch {
                declared: length,
                written,
            });
        }

        shp.write_bytes(self.shape_buffer.unread())?;
        shx.set_byte_order(Endianness::BigEndian);
        shx.write_i32(self.offset)?;
        shx.write_i32(words)?;

        trace!(record = number, offset = self.offset, words, "record written");
        self.record_count = number;
        self.offset = next_offset;
        Ok(())
    }

    /// Writes a complete file: headers sized from the geometries, one record
    /// per geometry, then closes both sinks.
    pub fn write(&mut self, geometries: &[Geometry], shape_type: ShapeType) -> Result<()> {
        let handler = ShapeHandler::for_shape_type(shape_type)?;
        let mut file_length = HEADER_LENGTH;
        let mut bbox = BoundingBox::empty();
        let mut coords = vec![];
        for g in geometries {
            file_length += handler.length(g)? + 8;
            let points = g.coordinates();
            bbox.expand_to(BoundingBox::from_coordinates(&points));
            if shape_type.has_z() {
                coords.extend(points);
            }
        }
        let z_range = if shape_type.has_z() {
            written_z_range(&coords)
        } else {
            [0f64, 0f64]
        };

        self.write_headers(&bbox, z_range, shape_type, geometries.len(), file_length)?;
        for g in geometries {
            self.write_geometry(g)?;
        }
        self.close()
    }

    pub fn num_records(&self) -> usize {
        self.record_count as usize
    }

    /// Flushes and releases both sinks. Closing twice is a no-op; writing
    /// after closing fails with `ShapefileError::Closed`.
    pub fn close(&mut self) -> Result<()> {
        let shp = self.shp.take();
        let shx = self.shx.take();
        if shp.is_none() && shx.is_none() {
            return Ok(());
        }
        if let Some(mut w) = shp {
            w.get_inner_mut().flush()?;
        }
        if let Some(mut w) = shx {
            w.get_inner_mut().flush()?;
        }
        if self.verbose {
            info!(records = self.record_count, "shapefile written");
        } else {
            debug!(records = self.record_count, "shapefile writer closed");
        }
        Ok(())
    }
}

fn to_words(value: usize, what: &'static str) -> Result<i32> {
    i32::try_from(value).map_err(|_| ShapefileError::LengthOverflow { what, value })
}

impl<W: Write> Drop for ShapefileWriter<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
