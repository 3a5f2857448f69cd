/*
This code is part of the GeoShape geospatial library.
Authors: Dr. John Lindsay
Created: 02/03/2026
Last Modified: 16/10/2026
License: MIT
*/

// private sub-module defined in other files
pub mod shapefile;

// exports identifiers from private sub-modules in the current module namespace
pub use crate::shapefile::error::{Result, ShapefileError};
pub use crate::shapefile::geometry::*;
pub use crate::shapefile::handlers::ShapeHandler;
pub use crate::shapefile::header::ShapefileHeader;
pub use crate::shapefile::index::IndexFile;
pub use crate::shapefile::reader::{Record, ShapefileReader};
pub use crate::shapefile::shape_type::{ShapeType, ShapeTypeDimension, ShapeTypeFamily};
pub use crate::shapefile::shape_utils;
pub use crate::shapefile::writer::ShapefileWriter;
pub use geoshape_common::configs::Configs;
pub use geoshape_common::structures::{BoundingBox, Coordinate};
