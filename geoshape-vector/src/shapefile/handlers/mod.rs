/*
This code is part of the GeoShape geospatial library.
Authors: Dr. John Lindsay
Created: 04/03/2026
Last Modified: 15/10/2026
License: MIT

Notes: One codec per geometry family. Each handler is bound to a single
ShapeType variant and knows that variant's record layout. Handlers start
reading immediately after the record's type code and write everything that
follows it; the reader and writer own the type code itself.
*/

mod arc;
mod multipoint;
mod point;
mod polygon;

pub use self::arc::ArcHandler;
pub use self::multipoint::MultiPointHandler;
pub use self::point::PointHandler;
pub use self::polygon::PolygonHandler;

use crate::shapefile::error::{Result, ShapefileError};
use crate::shapefile::geometry::Geometry;
use crate::shapefile::shape_type::{ShapeType, ShapeTypeFamily};
use crate::shapefile::shape_utils::z_min_max;
use geoshape_common::structures::{BoundingBox, Coordinate};
use geoshape_common::utils::{ByteOrderReader, ByteOrderWriter};
use std::io::prelude::*;

/// The value written for every measure, since geometries carry none.
pub const M_NO_DATA: f64 = -1.0e40;

pub trait Handler {
    /// The exact variant this handler serializes.
    fn shape_type(&self) -> ShapeType;

    /// Encoded length in bytes, including the 4-byte type code and
    /// excluding the 8-byte record header.
    fn length(&self, geometry: &Geometry) -> Result<usize>;

    /// Decodes one geometry. For the Null code the handler's canonical empty
    /// geometry is returned and nothing is read.
    fn read<R: Read + Seek>(
        &self,
        bor: &mut ByteOrderReader<R>,
        shape_type: ShapeType,
    ) -> Result<Geometry>;

    /// Encodes one geometry, little-endian, without the type code.
    fn write<W: Write>(&self, bow: &mut ByteOrderWriter<W>, geometry: &Geometry) -> Result<()>;
}

/// The handler registry, keyed by type code and resolved once per file.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeHandler {
    Point(PointHandler),
    MultiPoint(MultiPointHandler),
    Arc(ArcHandler),
    Polygon(PolygonHandler),
}

impl ShapeHandler {
    pub fn for_shape_type(shape_type: ShapeType) -> Result<ShapeHandler> {
        match shape_type.family() {
            ShapeTypeFamily::Point => Ok(ShapeHandler::Point(PointHandler::new(shape_type))),
            ShapeTypeFamily::MultiPoint => {
                Ok(ShapeHandler::MultiPoint(MultiPointHandler::new(shape_type)))
            }
            ShapeTypeFamily::Line => Ok(ShapeHandler::Arc(ArcHandler::new(shape_type))),
            ShapeTypeFamily::Polygon => Ok(ShapeHandler::Polygon(PolygonHandler::new(shape_type))),
            ShapeTypeFamily::Null | ShapeTypeFamily::Undefined => {
                Err(ShapefileError::UnsupportedShapeType(shape_type.to_int()))
            }
        }
    }
}

impl Handler for ShapeHandler {
    fn shape_type(&self) -> ShapeType {
        match self {
            ShapeHandler::Point(h) => h.shape_type(),
            ShapeHandler::MultiPoint(h) => h.shape_type(),
            ShapeHandler::Arc(h) => h.shape_type(),
            ShapeHandler::Polygon(h) => h.shape_type(),
        }
    }

    fn length(&self, geometry: &Geometry) -> Result<usize> {
        match self {
            ShapeHandler::Point(h) => h.length(geometry),
            ShapeHandler::MultiPoint(h) => h.length(geometry),
            ShapeHandler::Arc(h) => h.length(geometry),
            ShapeHandler::Polygon(h) => h.length(geometry),
        }
    }

    fn read<R: Read + Seek>(
        &self,
        bor: &mut ByteOrderReader<R>,
        shape_type: ShapeType,
    ) -> Result<Geometry> {
        match self {
            ShapeHandler::Point(h) => h.read(bor, shape_type),
            ShapeHandler::MultiPoint(h) => h.read(bor, shape_type),
            ShapeHandler::Arc(h) => h.read(bor, shape_type),
            ShapeHandler::Polygon(h) => h.read(bor, shape_type),
        }
    }

    fn write<W: Write>(&self, bow: &mut ByteOrderWriter<W>, geometry: &Geometry) -> Result<()> {
        match self {
            ShapeHandler::Point(h) => h.write(bow, geometry),
            ShapeHandler::MultiPoint(h) => h.write(bow, geometry),
            ShapeHandler::Arc(h) => h.write(bow, geometry),
            ShapeHandler::Polygon(h) => h.write(bow, geometry),
        }
    }
}

/// Bytes taken by the optional z and m blocks of a multipart record with
/// `num_points` vertices.
fn zm_block_length(shape_type: ShapeType, num_points: usize) -> usize {
    let block = 16 + 8 * num_points;
    let mut len = 0;
    if shape_type.has_z() {
        len += block;
    }
    if shape_type.has_m() {
        len += block;
    }
    len
}

fn wrong_geometry(shape_type: ShapeType, geometry: &Geometry) -> ShapefileError {
    ShapefileError::Geometry(format!(
        "cannot encode {} as {}",
        geometry_name(geometry),
        shape_type
    ))
}

fn geometry_name(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::LineString(_) => "LineString",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
    }
}

fn read_count<R: Read + Seek>(bor: &mut ByteOrderReader<R>, what: &str) -> Result<usize> {
    let n = bor.read_i32()?;
    if n < 0 {
        return Err(ShapefileError::CorruptRecord(format!("negative {} count {}", what, n)));
    }
    Ok(n as usize)
}

/// Checks that `needed` more bytes exist in the record before allocating
/// storage sized by counts read from it.
fn require<R: Read + Seek>(bor: &ByteOrderReader<R>, needed: usize) -> Result<()> {
    if bor.remaining() < needed {
        return Err(ShapefileError::CorruptRecord(format!(
            "record declares {} more bytes but only {} remain",
            needed,
            bor.remaining()
        )));
    }
    Ok(())
}

fn read_bbox<R: Read + Seek>(bor: &mut ByteOrderReader<R>) -> Result<BoundingBox> {
    Ok(BoundingBox {
        min_x: bor.read_f64()?,
        min_y: bor.read_f64()?,
        max_x: bor.read_f64()?,
        max_y: bor.read_f64()?,
    })
}

fn write_bbox<W: Write>(bow: &mut ByteOrderWriter<W>, bb: &BoundingBox) -> Result<()> {
    let bb = bb.or_zero();
    bow.write_f64(bb.min_x)?;
    bow.write_f64(bb.min_y)?;
    bow.write_f64(bb.max_x)?;
    bow.write_f64(bb.max_y)?;
    Ok(())
}

fn read_xy<R: Read + Seek>(
    bor: &mut ByteOrderReader<R>,
    num_points: usize,
) -> Result<Vec<Coordinate>> {
    require(bor, 16 * num_points)?;
    let mut points = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let x = bor.read_f64()?;
        let y = bor.read_f64()?;
        points.push(Coordinate::new(x, y));
    }
    Ok(points)
}

/// Reads the z range and z array into `points`, then skips the measures if
/// the record carries them.
fn read_zm<R: Read + Seek>(
    bor: &mut ByteOrderReader<R>,
    shape_type: ShapeType,
    points: &mut [Coordinate],
) -> Result<()> {
    let block = 16 + 8 * points.len();
    if shape_type.has_z() {
        require(bor, block)?;
        bor.inc_pos(16)?; // z range
        for p in points.iter_mut() {
            p.z = bor.read_f64()?;
        }
    }
    if shape_type.has_m() && bor.remaining() >= block {
        bor.inc_pos(block)?;
    }
    Ok(())
}

fn write_xy<W: Write>(bow: &mut ByteOrderWriter<W>, points: &[Coordinate]) -> Result<()> {
    for p in points {
        bow.write_f64(p.x)?;
        bow.write_f64(p.y)?;
    }
    Ok(())
}

/// Writes the z block (NaN written as 0.0) and the m block (all no-data)
/// required by `shape_type`.
fn write_zm<W: Write>(
    bow: &mut ByteOrderWriter<W>,
    shape_type: ShapeType,
    points: &[Coordinate],
) -> Result<()> {
    if shape_type.has_z() {
        let [z_min, z_max] = written_z_range(points);
        bow.write_f64(z_min)?;
        bow.write_f64(z_max)?;
        for p in points {
            bow.write_f64(nan_to_zero(p.z))?;
        }
    }
    if shape_type.has_m() {
        bow.write_f64(M_NO_DATA)?;
        bow.write_f64(M_NO_DATA)?;
        for _ in points {
            bow.write_f64(M_NO_DATA)?;
        }
    }
    Ok(())
}

/// The z range of `points` as stored on disk, where an undefined z is 0.0.
/// `[0.0, 0.0]` when there are no points.
pub(crate) fn written_z_range(points: &[Coordinate]) -> [f64; 2] {
    let stored: Vec<Coordinate> = points
        .iter()
        .map(|p| Coordinate::new_3d(p.x, p.y, nan_to_zero(p.z)))
        .collect();
    let [z_min, z_max] = z_min_max(&stored);
    [nan_to_zero(z_min), nan_to_zero(z_max)]
}

fn nan_to_zero(v: f64) -> f64 {
    if v.is_nan() {
        0f64
    } else {
        v
    }
}

/// Reads the part index array and splits `points` into parts.
fn split_parts(starts: &[i32], points: Vec<Coordinate>) -> Result<Vec<Vec<Coordinate>>> {
    let n = points.len();
    let mut parts = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = if i + 1 < starts.len() {
            starts[i + 1]
        } else {
            n as i32
        };
        if start < 0 || end < start || end as usize > n {
            return Err(ShapefileError::CorruptRecord(format!(
                "part {} spans {}..{} of {} points",
                i, start, end, n
            )));
        }
        parts.push(points[start as usize..end as usize].to_vec());
    }
    Ok(parts)
}

/// Shared reader for the polyline and polygon layouts, which differ only in
/// how the parts are assembled.
fn read_parts<R: Read + Seek>(
    bor: &mut ByteOrderReader<R>,
    shape_type: ShapeType,
) -> Result<Vec<Vec<Coordinate>>> {
    read_bbox(bor)?;
    let num_parts = read_count(bor, "part")?;
    let num_points = read_count(bor, "point")?;
    require(bor, 4 * num_parts)?;
    let mut starts = Vec::with_capacity(num_parts);
    for _ in 0..num_parts {
        starts.push(bor.read_i32()?);
    }
    let mut points = read_xy(bor, num_points)?;
    read_zm(bor, shape_type, &mut points)?;
    split_parts(&starts, points)
}

fn parts_length(shape_type: ShapeType, parts: &[Vec<Coordinate>]) -> usize {
    let num_points: usize = parts.iter().map(|p| p.len()).sum();
    44 + 4 * parts.len() + 16 * num_points + zm_block_length(shape_type, num_points)
}

fn write_parts<W: Write>(
    bow: &mut ByteOrderWriter<W>,
    shape_type: ShapeType,
    parts: &[Vec<Coordinate>],
) -> Result<()> {
    let points: Vec<Coordinate> = parts.iter().flatten().copied().collect();
    write_bbox(bow, &BoundingBox::from_coordinates(&points))?;
    bow.write_i32(parts.len() as i32)?;
    bow.write_i32(points.len() as i32)?;
    let mut start = 0i32;
    for p in parts {
        bow.write_i32(start)?;
        start += p.len() as i32;
    }
    write_xy(bow, &points)?;
    write_zm(bow, shape_type, &points)
}

#[cfg(test)]
mod test {
    use super::{written_z_range, Handler, ShapeHandler};
    use crate::shapefile::error::ShapefileError;
    use crate::shapefile::shape_type::ShapeType;
    use geoshape_common::structures::Coordinate;

    #[test]
    fn test_registry_resolves_every_variant() {
        for code in [1, 3, 5, 8, 11, 13, 15, 18, 21, 23, 25, 28] {
            let st = ShapeType::from_int(code);
            let handler = ShapeHandler::for_shape_type(st).unwrap();
            assert_eq!(handler.shape_type(), st);
        }
    }

    #[test]
    fn test_registry_rejects_null_and_undefined() {
        for st in [ShapeType::Null, ShapeType::from_int(31)] {
            match ShapeHandler::for_shape_type(st) {
                Err(ShapefileError::UnsupportedShapeType(_)) => {}
                other => panic!("expected UnsupportedShapeType, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_written_z_range_counts_undefined_z_as_zero() {
        let points = [Coordinate::new_3d(0.0, 0.0, 5.0), Coordinate::new(1.0, 1.0)];
        assert_eq!(written_z_range(&points), [0.0, 5.0]);
        let points = [Coordinate::new_3d(0.0, 0.0, -2.0), Coordinate::new(1.0, 1.0)];
        assert_eq!(written_z_range(&points), [-2.0, 0.0]);
        assert_eq!(written_z_range(&[]), [0.0, 0.0]);
    }
}
