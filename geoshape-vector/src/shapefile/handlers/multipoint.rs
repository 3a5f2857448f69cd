use super::{
    read_bbox, read_count, read_xy, read_zm, wrong_geometry, write_bbox, write_xy, write_zm,
    zm_block_length, Handler,
};
use crate::shapefile::error::Result;
use crate::shapefile::geometry::Geometry;
use crate::shapefile::shape_type::ShapeType;
use geoshape_common::structures::{BoundingBox, Coordinate};
use geoshape_common::utils::{ByteOrderReader, ByteOrderWriter};
use std::io::prelude::*;

/// MultiPoint records: bounding box, point count, points, then the optional
/// z and m blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct MultiPointHandler {
    shape_type: ShapeType,
}

impl MultiPointHandler {
    pub fn new(shape_type: ShapeType) -> MultiPointHandler {
        MultiPointHandler { shape_type }
    }

    fn points<'a>(&self, geometry: &'a Geometry) -> Result<&'a [Coordinate]> {
        match geometry {
            Geometry::MultiPoint(pts) => Ok(pts),
            Geometry::Point(c) => Ok(std::slice::from_ref(c)),
            _ => Err(wrong_geometry(self.shape_type, geometry)),
        }
    }
}

impl Handler for MultiPointHandler {
    fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    fn length(&self, geometry: &Geometry) -> Result<usize> {
        let n = self.points(geometry)?.len();
        Ok(40 + 16 * n + zm_block_length(self.shape_type, n))
    }

    fn read<R: Read + Seek>(
        &self,
        bor: &mut ByteOrderReader<R>,
        shape_type: ShapeType,
    ) -> Result<Geometry> {
        if shape_type == ShapeType::Null {
            return Ok(Geometry::MultiPoint(vec![]));
        }
        read_bbox(bor)?;
        let num_points = read_count(bor, "point")?;
        let mut points = read_xy(bor, num_points)?;
        read_zm(bor, self.shape_type, &mut points)?;
        Ok(Geometry::MultiPoint(points))
    }

    fn write<W: Write>(&self, bow: &mut ByteOrderWriter<W>, geometry: &Geometry) -> Result<()> {
        let points = self.points(geometry)?;
        write_bbox(bow, &BoundingBox::from_coordinates(points))?;
        bow.write_i32(points.len() as i32)?;
        write_xy(bow, points)?;
        write_zm(bow, self.shape_type, points)
    }
}

#[cfg(test)]
mod test {
    use super::MultiPointHandler;
    use crate::shapefile::geometry::Geometry;
    use crate::shapefile::handlers::Handler;
    use crate::shapefile::shape_type::ShapeType;
    use geoshape_common::structures::Coordinate;
    use geoshape_common::utils::{ByteOrderReader, ByteOrderWriter, Endianness};
    use std::io::Cursor;

    fn round_trip(st: ShapeType, g: &Geometry) -> (usize, Geometry) {
        let h = MultiPointHandler::new(st);
        let mut bow = ByteOrderWriter::new(vec![], Endianness::LittleEndian);
        h.write(&mut bow, g).unwrap();
        let bytes = bow.into_inner();
        assert_eq!(h.length(g).unwrap(), bytes.len() + 4);
        let len = bytes.len();
        let mut bor = ByteOrderReader::new(Cursor::new(bytes), Endianness::LittleEndian).unwrap();
        let decoded = h.read(&mut bor, st).unwrap();
        assert_eq!(bor.remaining(), 0);
        (len, decoded)
    }

    #[test]
    fn test_multipoint_lengths() {
        let g = Geometry::MultiPoint(vec![
            Coordinate::new(1.0, 1.0),
            Coordinate::new(2.0, 3.0),
            Coordinate::new(-1.0, 0.5),
        ]);
        // 40 + 16n, less the type code
        assert_eq!(round_trip(ShapeType::MultiPoint, &g).0, 84);
        // plus 16 + 8n for measures
        assert_eq!(round_trip(ShapeType::MultiPointM, &g).0, 124);
        // plus z and m blocks
        assert_eq!(round_trip(ShapeType::MultiPointZ, &g).0, 164);
    }

    #[test]
    fn test_multipoint_z_round_trip() {
        let g = Geometry::MultiPoint(vec![
            Coordinate::new_3d(1.0, 1.0, 10.0),
            Coordinate::new(2.0, 3.0),
        ]);
        let (_, decoded) = round_trip(ShapeType::MultiPointZ, &g);
        assert_eq!(
            decoded,
            Geometry::MultiPoint(vec![
                Coordinate::new_3d(1.0, 1.0, 10.0),
                Coordinate::new_3d(2.0, 3.0, 0.0),
            ])
        );
    }

    #[test]
    fn test_single_point_is_accepted() {
        let g = Geometry::Point(Coordinate::new(4.0, 5.0));
        let (_, decoded) = round_trip(ShapeType::MultiPoint, &g);
        assert_eq!(decoded, Geometry::MultiPoint(vec![Coordinate::new(4.0, 5.0)]));
    }

    #[test]
    fn test_truncated_point_array_is_corrupt() {
        let h = MultiPointHandler::new(ShapeType::MultiPoint);
        let mut bytes = vec![0u8; 32];
        bytes.extend_from_slice(&1000i32.to_le_bytes());
        let mut bor = ByteOrderReader::new(Cursor::new(bytes), Endianness::LittleEndian).unwrap();
        assert!(h.read(&mut bor, ShapeType::MultiPoint).is_err());
    }
}
