use super::{nan_to_zero, wrong_geometry, Handler, M_NO_DATA};
use crate::shapefile::error::Result;
use crate::shapefile::geometry::Geometry;
use crate::shapefile::shape_type::ShapeType;
use geoshape_common::structures::Coordinate;
use geoshape_common::utils::{ByteOrderReader, ByteOrderWriter};
use std::io::prelude::*;

/// Point, PointM and PointZ records: x, y, then z (PointZ only) and m.
#[derive(Clone, Debug, PartialEq)]
pub struct PointHandler {
    shape_type: ShapeType,
}

impl PointHandler {
    pub fn new(shape_type: ShapeType) -> PointHandler {
        PointHandler { shape_type }
    }
}

impl Handler for PointHandler {
    fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    fn length(&self, geometry: &Geometry) -> Result<usize> {
        if !matches!(geometry, Geometry::Point(_)) {
            return Err(wrong_geometry(self.shape_type, geometry));
        }
        let len = match self.shape_type {
            ShapeType::PointZ => 36,
            ShapeType::PointM => 28,
            _ => 20,
        };
        Ok(len)
    }

    fn read<R: Read + Seek>(
        &self,
        bor: &mut ByteOrderReader<R>,
        shape_type: ShapeType,
    ) -> Result<Geometry> {
        if shape_type == ShapeType::Null {
            return Ok(Geometry::empty_point());
        }
        let x = bor.read_f64()?;
        let y = bor.read_f64()?;
        let mut c = Coordinate::new(x, y);
        if self.shape_type == ShapeType::PointZ {
            c.z = bor.read_f64()?;
        }
        // The measure, when present, is discarded.
        if self.shape_type.has_m() && bor.remaining() >= 8 {
            bor.inc_pos(8)?;
        }
        Ok(Geometry::Point(c))
    }

    fn write<W: Write>(&self, bow: &mut ByteOrderWriter<W>, geometry: &Geometry) -> Result<()> {
        let c = match geometry {
            Geometry::Point(c) => c,
            _ => return Err(wrong_geometry(self.shape_type, geometry)),
        };
        bow.write_f64(c.x)?;
        bow.write_f64(c.y)?;
        if self.shape_type == ShapeType::PointZ {
            bow.write_f64(nan_to_zero(c.z))?;
        }
        if self.shape_type.has_m() {
            bow.write_f64(M_NO_DATA)?;
        }
        Ok(())
    }
}
