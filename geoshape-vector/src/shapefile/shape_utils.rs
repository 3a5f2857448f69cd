/*
This code is part of the GeoShape geospatial library.
Authors: Dr. John Lindsay
Created: 05/03/2026
Last Modified: 12/10/2026
License: MIT

Notes: Helpers deciding how a geometry maps onto a shapefile shape type, and
normalizing polygon rings to the winding order the format expects.
*/
use crate::shapefile::error::{Result, ShapefileError};
use crate::shapefile::geometry::{Geometry, Polygon};
use crate::shapefile::shape_type::{ShapeType, ShapeTypeDimension, ShapeTypeFamily};
use geoshape_common::algorithms::signed_ring_area;
use geoshape_common::structures::Coordinate;
use std::f64;

fn family_of(geometry: &Geometry) -> ShapeTypeFamily {
    match geometry {
        Geometry::Point(_) => ShapeTypeFamily::Point,
        Geometry::MultiPoint(_) => ShapeTypeFamily::MultiPoint,
        Geometry::LineString(_) | Geometry::MultiLineString(_) => ShapeTypeFamily::Line,
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => ShapeTypeFamily::Polygon,
        Geometry::GeometryCollection(_) => ShapeTypeFamily::Undefined,
    }
}

/// The 2D shape type for a geometry's family, or `Undefined`.
pub fn find_best_geometry_type(geometry: &Geometry) -> ShapeType {
    ShapeType::from_family(family_of(geometry), ShapeTypeDimension::XY)
}

/// The shape type for a geometry at an explicit dimensionality: 2 (x, y),
/// 3 (x, y, m) or 4 (x, y, z, m).
pub fn get_shape_type(geometry: &Geometry, dims: u32) -> Result<ShapeType> {
    let dimension = match dims {
        2 => ShapeTypeDimension::XY,
        3 => ShapeTypeDimension::Measure,
        4 => ShapeTypeDimension::Z,
        _ => {
            return Err(ShapefileError::Geometry(format!(
                "too many or too few dimensions for shapefile: {}",
                dims
            )))
        }
    };
    match family_of(geometry) {
        ShapeTypeFamily::Undefined => Err(ShapefileError::Geometry(
            "cannot handle geometry collections in a shapefile".to_string(),
        )),
        family => Ok(ShapeType::from_family(family, dimension)),
    }
}

/// Returns 4 if any coordinate has a defined z, otherwise 2.
pub fn guess_coordinate_dims(coords: &[Coordinate]) -> u32 {
    if coords.iter().any(|c| c.has_z()) {
        4
    } else {
        2
    }
}

/// `[min, max]` over the defined z values, or `[NaN, NaN]` if none is defined.
pub fn z_min_max(coords: &[Coordinate]) -> [f64; 2] {
    let mut z_min = f64::NAN;
    let mut z_max = f64::NAN;
    for z in coords.iter().map(|c| c.z).filter(|z| !z.is_nan()) {
        if z_min.is_nan() || z < z_min {
            z_min = z;
        }
        if z_max.is_nan() || z > z_max {
            z_max = z;
        }
    }
    [z_min, z_max]
}

/// Repeats the first vertex at the end of a ring if it is missing.
pub fn close_ring(ring: &[Coordinate]) -> Vec<Coordinate> {
    let mut ret = ring.to_vec();
    if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
        if !first.equals_2d(last) {
            ret.push(*first);
        }
    }
    ret
}

pub fn reverse_ring(ring: &[Coordinate]) -> Vec<Coordinate> {
    ring.iter().rev().copied().collect()
}

/// A closed copy of `ring` in the requested orientation. Rings with no area
/// have no orientation and are left as they are.
fn oriented_ring(ring: &[Coordinate], clockwise: bool) -> Vec<Coordinate> {
    let closed = close_ring(ring);
    let area = signed_ring_area(&closed);
    if area == 0f64 || (area < 0f64) == clockwise {
        closed
    } else {
        reverse_ring(&closed)
    }
}

/// Closes every ring and orients the shell clockwise and the holes
/// counter-clockwise. Applying it to its own output changes nothing.
pub fn make_good_shape_polygon(polygon: &Polygon) -> Polygon {
    Polygon {
        exterior: oriented_ring(&polygon.exterior, true),
        interiors: polygon
            .interiors
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| oriented_ring(r, false))
            .collect(),
    }
}

pub fn make_good_shape_multi_polygon(polygons: &[Polygon]) -> Vec<Polygon> {
    polygons.iter().map(make_good_shape_polygon).collect()
}
