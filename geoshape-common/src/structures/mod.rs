// private sub-module defined in other files
mod bounding_box;
mod coordinate;

// exports identifiers from private sub-modules in the current module namespace
pub use self::bounding_box::BoundingBox;
pub use self::coordinate::Coordinate;
