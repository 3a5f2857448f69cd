use super::{parts_length, read_parts, wrong_geometry, write_parts, Handler};
use crate::shapefile::error::{Result, ShapefileError};
use crate::shapefile::geometry::{Geometry, Polygon};
use crate::shapefile::shape_type::ShapeType;
use crate::shapefile::shape_utils::make_good_shape_polygon;
use geoshape_common::algorithms::{is_clockwise_order, point_in_poly, polygon_area};
use geoshape_common::structures::{BoundingBox, Coordinate};
use geoshape_common::utils::{ByteOrderReader, ByteOrderWriter};
use std::io::prelude::*;

/// Polygon records. Rings are written closed, shells clockwise and holes
/// counter-clockwise. On reading, ring orientation decides which rings are
/// shells, and each hole is attached to the smallest shell containing it.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonHandler {
    shape_type: ShapeType,
}

impl PolygonHandler {
    pub fn new(shape_type: ShapeType) -> PolygonHandler {
        PolygonHandler { shape_type }
    }

    fn rings(&self, geometry: &Geometry) -> Result<Vec<Vec<Coordinate>>> {
        let polygons: Vec<&Polygon> = match geometry {
            Geometry::Polygon(p) => vec![p],
            Geometry::MultiPolygon(ps) => ps.iter().collect(),
            _ => return Err(wrong_geometry(self.shape_type, geometry)),
        };
        let mut rings = vec![];
        for p in polygons {
            if p.is_empty() {
                if p.interiors.iter().any(|r| !r.is_empty()) {
                    return Err(ShapefileError::Geometry(
                        "polygon has holes but no exterior ring".to_string(),
                    ));
                }
                continue;
            }
            let good = make_good_shape_polygon(p);
            rings.push(good.exterior);
            rings.extend(good.interiors);
        }
        Ok(rings)
    }
}

impl Handler for PolygonHandler {
    fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    fn length(&self, geometry: &Geometry) -> Result<usize> {
        Ok(parts_length(self.shape_type, &self.rings(geometry)?))
    }

    fn read<R: Read + Seek>(
        &self,
        bor: &mut ByteOrderReader<R>,
        shape_type: ShapeType,
    ) -> Result<Geometry> {
        if shape_type == ShapeType::Null {
            return Ok(Geometry::MultiPolygon(vec![]));
        }
        let rings = read_parts(bor, self.shape_type)?;
        Ok(Geometry::MultiPolygon(assemble_polygons(rings)))
    }

    fn write<W: Write>(&self, bow: &mut ByteOrderWriter<W>, geometry: &Geometry) -> Result<()> {
        write_parts(bow, self.shape_type, &self.rings(geometry)?)
    }
}

/// Groups rings into polygons. Clockwise rings are shells; a hole goes to
/// the smallest shell that contains one of its vertices. A hole that no
/// shell contains becomes a shell of its own.
fn assemble_polygons(rings: Vec<Vec<Coordinate>>) -> Vec<Polygon> {
    let mut shells: Vec<Polygon> = vec![];
    let mut holes: Vec<Vec<Coordinate>> = vec![];
    for ring in rings {
        if ring.is_empty() {
            continue;
        }
        if is_clockwise_order(&ring) {
            shells.push(Polygon::new(ring, vec![]));
        } else {
            holes.push(ring);
        }
    }

    let shell_bounds: Vec<BoundingBox> = shells
        .iter()
        .map(|s| BoundingBox::from_coordinates(&s.exterior))
        .collect();
    let shell_areas: Vec<f64> = shells.iter().map(|s| polygon_area(&s.exterior)).collect();

    let mut orphans = vec![];
    for hole in holes {
        let hole_bounds = BoundingBox::from_coordinates(&hole);
        let mut best: Option<usize> = None;
        for (i, shell) in shells.iter().enumerate() {
            if !shell_bounds[i].contains(hole_bounds) {
                continue;
            }
            let inside = hole.iter().any(|p| point_in_poly(p, &shell.exterior));
            if inside && best.map_or(true, |b| shell_areas[i] < shell_areas[b]) {
                best = Some(i);
            }
        }
        match best {
            Some(i) => shells[i].interiors.push(hole),
            None => orphans.push(hole),
        }
    }

    for ring in orphans {
        shells.push(Polygon::new(ring, vec![]));
    }
    shells
}

#[cfg(test)]
mod test {
    use super::PolygonHandler;
    use crate::shapefile::error::ShapefileError;
    use crate::shapefile::geometry::{Geometry, Polygon};
    use crate::shapefile::handlers::Handler;
    use crate::shapefile::shape_type::ShapeType;
    use geoshape_common::algorithms::is_clockwise_order;
    use geoshape_common::structures::Coordinate;
    use geoshape_common::utils::{ByteOrderReader, ByteOrderWriter, Endianness};
    use std::io::Cursor;

    fn square(x: f64, y: f64, size: f64) -> Vec<Coordinate> {
        // counter-clockwise and open
        vec![
            Coordinate::new(x, y),
            Coordinate::new(x + size, y),
            Coordinate::new(x + size, y + size),
            Coordinate::new(x, y + size),
        ]
    }

    fn round_trip(h: &PolygonHandler, g: &Geometry) -> Geometry {
        let mut bow = ByteOrderWriter::new(vec![], Endianness::LittleEndian);
        h.write(&mut bow, g).unwrap();
        let bytes = bow.into_inner();
        assert_eq!(h.length(g).unwrap(), bytes.len() + 4);
        let mut bor = ByteOrderReader::new(Cursor::new(bytes), Endianness::LittleEndian).unwrap();
        h.read(&mut bor, h.shape_type()).unwrap()
    }

    #[test]
    fn test_polygon_with_hole() {
        let h = PolygonHandler::new(ShapeType::Polygon);
        let g = Geometry::Polygon(Polygon::new(square(0.0, 0.0, 10.0), vec![square(2.0, 2.0, 2.0)]));
        let decoded = round_trip(&h, &g);
        let polys = match decoded {
            Geometry::MultiPolygon(p) => p,
            other => panic!("expected a MultiPolygon, got {:?}", other),
        };
        assert_eq!(polys.len(), 1);
        assert_eq!(polys[0].interiors.len(), 1);
        // rings come back closed, shell clockwise, hole counter-clockwise
        assert_eq!(polys[0].exterior.len(), 5);
        assert_eq!(polys[0].exterior[0], polys[0].exterior[4]);
        assert!(is_clockwise_order(&polys[0].exterior));
        assert!(!is_clockwise_order(&polys[0].interiors[0]));
    }

    #[test]
    fn test_holes_go_to_the_smallest_containing_shell() {
        let h = PolygonHandler::new(ShapeType::PolygonM);
        let g = Geometry::MultiPolygon(vec![
            Polygon::new(square(0.0, 0.0, 100.0), vec![square(10.0, 10.0, 50.0)]),
            Polygon::new(square(20.0, 20.0, 20.0), vec![square(25.0, 25.0, 5.0)]),
        ]);
        let polys = match round_trip(&h, &g) {
            Geometry::MultiPolygon(p) => p,
            other => panic!("expected a MultiPolygon, got {:?}", other),
        };
        assert_eq!(polys.len(), 2);
        assert_eq!(polys[0].interiors.len(), 1);
        assert_eq!(polys[0].interiors[0][0], Coordinate::new(10.0, 10.0));
        assert_eq!(polys[1].interiors.len(), 1);
        assert_eq!(polys[1].interiors[0][0], Coordinate::new(25.0, 25.0));
    }

    #[test]
    fn test_orphan_hole_becomes_a_shell() {
        let rings = vec![square(0.0, 0.0, 1.0)];
        let polys = super::assemble_polygons(rings);
        assert_eq!(polys.len(), 1);
        assert!(polys[0].interiors.is_empty());
    }

    #[test]
    fn test_length() {
        let h = PolygonHandler::new(ShapeType::Polygon);
        let g = Geometry::Polygon(Polygon::new(square(0.0, 0.0, 1.0), vec![]));
        // one closed ring of five points
        assert_eq!(h.length(&g).unwrap(), 44 + 4 + 16 * 5);
    }

    #[test]
    fn test_holes_without_a_shell_are_rejected() {
        let h = PolygonHandler::new(ShapeType::Polygon);
        let g = Geometry::Polygon(Polygon::new(vec![], vec![square(2.0, 2.0, 2.0)]));
        assert!(matches!(h.length(&g), Err(ShapefileError::Geometry(_))));
        let mut bow = ByteOrderWriter::new(vec![], Endianness::LittleEndian);
        assert!(h.write(&mut bow, &g).is_err());

        // a polygon that is empty throughout is skipped
        let empty = Geometry::MultiPolygon(vec![Polygon::new(vec![], vec![vec![]])]);
        assert_eq!(h.length(&empty).unwrap(), 44);
    }
}
