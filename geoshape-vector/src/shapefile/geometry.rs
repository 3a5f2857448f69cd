/*
This code is part of the GeoShape geospatial library.
Authors: Dr. John Lindsay
Created: 02/03/2026
Last Modified: 11/10/2026
License: MIT

Notes: The minimal geometry model the codec exchanges with its callers.
Only coordinate counts and per-coordinate x, y and z are relied upon.
*/
use geoshape_common::structures::{BoundingBox, Coordinate};

/// A polygon with one exterior ring and any number of holes. Rings are
/// stored as written by the caller; the codec closes and orients them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub exterior: Vec<Coordinate>,
    pub interiors: Vec<Vec<Coordinate>>,
}

impl Polygon {
    pub fn new(exterior: Vec<Coordinate>, interiors: Vec<Vec<Coordinate>>) -> Polygon {
        Polygon {
            exterior,
            interiors,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exterior.is_empty()
    }

    pub fn rings(&self) -> impl Iterator<Item = &Vec<Coordinate>> {
        std::iter::once(&self.exterior)
            .filter(|r| !r.is_empty())
            .chain(self.interiors.iter())
    }

    pub fn num_points(&self) -> usize {
        self.rings().map(|r| r.len()).sum()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Coordinate),
    MultiPoint(Vec<Coordinate>),
    LineString(Vec<Coordinate>),
    MultiLineString(Vec<Vec<Coordinate>>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// A point with every ordinate undefined; the decoded form of a null
    /// record in a point file.
    pub fn empty_point() -> Geometry {
        Geometry::Point(Coordinate::nan())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(c) => c.x.is_nan() && c.y.is_nan(),
            Geometry::MultiPoint(pts) | Geometry::LineString(pts) => pts.is_empty(),
            Geometry::MultiLineString(lines) => lines.iter().all(|l| l.is_empty()),
            Geometry::Polygon(p) => p.is_empty(),
            Geometry::MultiPolygon(polys) => polys.iter().all(|p| p.is_empty()),
            Geometry::GeometryCollection(geoms) => geoms.iter().all(|g| g.is_empty()),
        }
    }

    /// All coordinates in storage order (exterior before holes).
    pub fn coordinates(&self) -> Vec<Coordinate> {
        let mut ret = vec![];
        self.collect_coordinates(&mut ret);
        ret
    }

    fn collect_coordinates(&self, out: &mut Vec<Coordinate>) {
        match self {
            Geometry::Point(c) => {
                if !self.is_empty() {
                    out.push(*c);
                }
            }
            Geometry::MultiPoint(pts) | Geometry::LineString(pts) => out.extend_from_slice(pts),
            Geometry::MultiLineString(lines) => {
                for l in lines {
                    out.extend_from_slice(l);
                }
            }
            Geometry::Polygon(p) => {
                for r in p.rings() {
                    out.extend_from_slice(r);
                }
            }
            Geometry::MultiPolygon(polys) => {
                for p in polys {
                    for r in p.rings() {
                        out.extend_from_slice(r);
                    }
                }
            }
            Geometry::GeometryCollection(geoms) => {
                for g in geoms {
                    g.collect_coordinates(out);
                }
            }
        }
    }

    pub fn num_points(&self) -> usize {
        self.coordinates().len()
    }

    /// The planar extent; empty for an empty geometry.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_coordinates(&self.coordinates())
    }
}
