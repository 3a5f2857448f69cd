/*
This code is part of the GeoShape geospatial library.
Authors: Dr. John Lindsay
Created: 02/03/2026
Last Modified: 16/10/2026
License: MIT

Notes: Reading and writing the geometry half of an ESRI Shapefile, i.e. the
main (.shp) and index (.shx) files. Attribute tables (.dbf) and projection
files (.prj) are not handled here.
*/

pub mod error;
pub mod geometry;
pub mod handlers;
pub mod header;
pub mod index;
pub mod reader;
pub mod shape_type;
pub mod shape_utils;
pub mod source;
pub mod writer;
