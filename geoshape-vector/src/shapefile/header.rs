use crate::shapefile::error::{Result, ShapefileError};
use crate::shapefile::handlers::M_NO_DATA;
use crate::shapefile::shape_type::ShapeType;
use geoshape_common::structures::BoundingBox;
use geoshape_common::utils::{ByteOrderReader, ByteOrderWriter, Endianness};
use std::fmt;
use std::io::prelude::*;
use std::io::Cursor;
use tracing::warn;

pub const HEADER_LENGTH: usize = 100;
pub const FILE_CODE: i32 = 9994;
pub const VERSION: i32 = 1000;

/// The 100-byte header shared by the main (.shp) and index (.shx) files.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapefileHeader {
    pub file_code: i32,        // BigEndian; value is 9994
    pub file_length: i32,      // BigEndian; in 16-bit words, header included
    pub version: i32,          // LittleEndian; value is 1000
    pub shape_type: ShapeType, // LittleEndian
    pub x_min: f64,            // LittleEndian
    pub y_min: f64,            // LittleEndian
    pub x_max: f64,            // LittleEndian
    pub y_max: f64,            // LittleEndian
    pub z_min: f64,            // LittleEndian; 0f64 if shape type has no z
    pub z_max: f64,            // LittleEndian; 0f64 if shape type has no z
    pub m_min: f64,            // LittleEndian
    pub m_max: f64,            // LittleEndian
}

impl ShapefileHeader {
    /// Builds a header for a file of `file_length` 16-bit words. An empty
    /// `bbox` and NaN z bounds are stored as zeros. Measured types get the
    /// no-data measure range, matching the measures their records hold.
    pub fn new(
        shape_type: ShapeType,
        file_length: i32,
        bbox: &BoundingBox,
        z_range: [f64; 2],
    ) -> ShapefileHeader {
        let bb = bbox.or_zero();
        let finite_or_zero = |v: f64| if v.is_finite() { v } else { 0f64 };
        let m = if shape_type.has_m() { M_NO_DATA } else { 0f64 };
        ShapefileHeader {
            file_code: FILE_CODE,
            file_length,
            version: VERSION,
            shape_type,
            x_min: bb.min_x,
            y_min: bb.min_y,
            x_max: bb.max_x,
            y_max: bb.max_y,
            z_min: finite_or_zero(z_range[0]),
            z_max: finite_or_zero(z_range[1]),
            m_min: m,
            m_max: m,
        }
    }

    /// Reads exactly 100 bytes. In strict mode an unexpected file code or
    /// version is an error; otherwise it is only logged.
    pub fn read<R: Read + Seek>(bor: &mut ByteOrderReader<R>, strict: bool) -> Result<ShapefileHeader> {
        let start = bor.pos();
        if bor.remaining() < HEADER_LENGTH {
            return Err(ShapefileError::Header(format!(
                "expected {} header bytes, found {}",
                HEADER_LENGTH,
                bor.remaining()
            )));
        }

        // Note: the file code and length are big-endian, everything after
        // them is little-endian.
        bor.set_byte_order(Endianness::BigEndian);
        let file_code = bor.read_i32()?;
        bor.seek(start + 24)?;
        let file_length = bor.read_i32()?;

        bor.set_byte_order(Endianness::LittleEndian);
        let version = bor.read_i32()?;
        let shape_type = ShapeType::from_int(bor.read_i32()?);

        let header = ShapefileHeader {
            file_code,
            file_length,
            version,
            shape_type,
            x_min: bor.read_f64()?,
            y_min: bor.read_f64()?,
            x_max: bor.read_f64()?,
            y_max: bor.read_f64()?,
            z_min: bor.read_f64()?,
            z_max: bor.read_f64()?,
            m_min: bor.read_f64()?,
            m_max: bor.read_f64()?,
        };

        if file_code != FILE_CODE {
            if strict {
                return Err(ShapefileError::Header(format!(
                    "wrong file code {}, expected {}",
                    file_code, FILE_CODE
                )));
            }
            warn!(file_code, "ignoring unexpected shapefile file code");
        }
        if version != VERSION {
            if strict {
                return Err(ShapefileError::Header(format!(
                    "unsupported version {}, expected {}",
                    version, VERSION
                )));
            }
            warn!(version, "ignoring unexpected shapefile version");
        }

        Ok(header)
    }

    pub fn from_bytes(bytes: &[u8], strict: bool) -> Result<ShapefileHeader> {
        let mut bor = ByteOrderReader::new(Cursor::new(bytes), Endianness::BigEndian)?;
        ShapefileHeader::read(&mut bor, strict)
    }

    /// Writes exactly 100 bytes.
    pub fn write<W: Write>(&self, bow: &mut ByteOrderWriter<W>) -> Result<()> {
        bow.set_byte_order(Endianness::BigEndian);
        bow.write_i32(self.file_code)?;
        // unused header bytes
        for _ in 0..5 {
            bow.write_i32(0i32)?;
        }
        bow.write_i32(self.file_length)?;

        bow.set_byte_order(Endianness::LittleEndian);
        bow.write_i32(self.version)?;
        bow.write_i32(self.shape_type.to_int())?;
        bow.write_f64(self.x_min)?;
        bow.write_f64(self.y_min)?;
        bow.write_f64(self.x_max)?;
        bow.write_f64(self.y_max)?;
        bow.write_f64(self.z_min)?;
        bow.write_f64(self.z_max)?;
        bow.write_f64(self.m_min)?;
        bow.write_f64(self.m_max)?;
        Ok(())
    }

    /// Declared file size in bytes.
    pub fn file_length_bytes(&self) -> u64 {
        self.file_length.max(0) as u64 * 2
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox {
            min_x: self.x_min,
            min_y: self.y_min,
            max_x: self.x_max,
            max_y: self.y_max,
        }
    }
}

impl fmt::Display for ShapefileHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "file_code: {}
file_length: {}
version: {}
shape_type: {}
x_min: {}
x_max: {}
y_min: {}
y_max: {}
z_min: {}
z_max: {}
m_min: {}
m_max: {}",
            self.file_code,
            self.file_length,
            self.version,
            self.shape_type,
            self.x_min,
            self.x_max,
            self.y_min,
            self.y_max,
            self.z_min,
            self.z_max,
            self.m_min,
            self.m_max
        )
    }
}

#[cfg(test)]
mod test {
    use super::{ShapefileHeader, HEADER_LENGTH};
    use crate::shapefile::error::ShapefileError;
    use crate::shapefile::handlers::M_NO_DATA;
    use crate::shapefile::shape_type::ShapeType;
    use geoshape_common::structures::BoundingBox;
    use geoshape_common::utils::{ByteOrderWriter, Endianness};

    fn header_bytes(header: &ShapefileHeader) -> Vec<u8> {
        let mut bow = ByteOrderWriter::new(vec![], Endianness::BigEndian);
        header.write(&mut bow).unwrap();
        bow.into_inner()
    }

    #[test]
    fn test_layout_is_mixed_endian() {
        let bb = BoundingBox::new(1.0, 3.0, 2.0, 4.0);
        let header = ShapefileHeader::new(ShapeType::Polygon, 64, &bb, [f64::NAN, f64::NAN]);
        let bytes = header_bytes(&header);
        assert_eq!(bytes.len(), HEADER_LENGTH);
        assert_eq!(&bytes[0..4], &[0, 0, 0x27, 0x0a]);
        assert!(bytes[4..24].iter().all(|b| *b == 0));
        assert_eq!(&bytes[24..28], &[0, 0, 0, 64]);
        assert_eq!(&bytes[28..32], &[0xe8, 0x03, 0, 0]);
        assert_eq!(&bytes[32..36], &[5, 0, 0, 0]);
        assert_eq!(&bytes[36..44], &1.0f64.to_le_bytes());

        let parsed = ShapefileHeader::from_bytes(&bytes, true).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.z_min, 0.0);
        assert_eq!(parsed.file_length_bytes(), 128);
    }

    #[test]
    fn test_strict_mode_rejects_bad_file_code() {
        let header = ShapefileHeader::new(ShapeType::Point, 50, &BoundingBox::empty(), [0.0, 0.0]);
        let mut bytes = header_bytes(&header);
        bytes[3] = 0x0b;
        match ShapefileHeader::from_bytes(&bytes, true) {
            Err(ShapefileError::Header(_)) => {}
            other => panic!("expected a header error, got {:?}", other),
        }
        let lenient = ShapefileHeader::from_bytes(&bytes, false).unwrap();
        assert_eq!(lenient.file_code, 9995);
        assert_eq!(lenient.shape_type, ShapeType::Point);
    }

    #[test]
    fn test_strict_mode_rejects_bad_version() {
        let mut header =
            ShapefileHeader::new(ShapeType::Point, 50, &BoundingBox::empty(), [0.0, 0.0]);
        header.version = 999;
        let bytes = header_bytes(&header);
        assert!(ShapefileHeader::from_bytes(&bytes, true).is_err());
        assert_eq!(ShapefileHeader::from_bytes(&bytes, false).unwrap().version, 999);
    }

    #[test]
    fn test_short_header() {
        assert!(ShapefileHeader::from_bytes(&[0u8; 60], false).is_err());
    }

    #[test]
    fn test_measure_range_matches_record_measures() {
        let bb = BoundingBox::new(0.0, 1.0, 0.0, 1.0);
        for st in [ShapeType::PolyLineM, ShapeType::PolyLineZ] {
            let bytes = header_bytes(&ShapefileHeader::new(st, 50, &bb, [0.0, 0.0]));
            assert_eq!(&bytes[84..92], &M_NO_DATA.to_le_bytes());
            assert_eq!(&bytes[92..100], &M_NO_DATA.to_le_bytes());
        }
        let plain = ShapefileHeader::new(ShapeType::PolyLine, 50, &bb, [0.0, 0.0]);
        assert_eq!((plain.m_min, plain.m_max), (0.0, 0.0));
    }
}
