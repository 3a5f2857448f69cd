use super::{parts_length, read_parts, wrong_geometry, write_parts, Handler};
use crate::shapefile::error::Result;
use crate::shapefile::geometry::Geometry;
use crate::shapefile::shape_type::ShapeType;
use geoshape_common::structures::Coordinate;
use geoshape_common::utils::{ByteOrderReader, ByteOrderWriter};
use std::io::prelude::*;

/// PolyLine records. Every part is an independent line; a single
/// LineString is written as a one-part record and all records decode to a
/// MultiLineString.
#[derive(Clone, Debug, PartialEq)]
pub struct ArcHandler {
    shape_type: ShapeType,
}

impl ArcHandler {
    pub fn new(shape_type: ShapeType) -> ArcHandler {
        ArcHandler { shape_type }
    }

    fn parts(&self, geometry: &Geometry) -> Result<Vec<Vec<Coordinate>>> {
        match geometry {
            Geometry::LineString(line) => Ok(vec![line.clone()]),
            Geometry::MultiLineString(lines) => {
                Ok(lines.iter().filter(|l| !l.is_empty()).cloned().collect())
            }
            _ => Err(wrong_geometry(self.shape_type, geometry)),
        }
    }
}

impl Handler for ArcHandler {
    fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    fn length(&self, geometry: &Geometry) -> Result<usize> {
        Ok(parts_length(self.shape_type, &self.parts(geometry)?))
    }

    fn read<R: Read + Seek>(
        &self,
        bor: &mut ByteOrderReader<R>,
        shape_type: ShapeType,
    ) -> Result<Geometry> {
        if shape_type == ShapeType::Null {
            return Ok(Geometry::MultiLineString(vec![]));
        }
        let parts = read_parts(bor, self.shape_type)?;
        Ok(Geometry::MultiLineString(parts))
    }

    fn write<W: Write>(&self, bow: &mut ByteOrderWriter<W>, geometry: &Geometry) -> Result<()> {
        write_parts(bow, self.shape_type, &self.parts(geometry)?)
    }
}
