use std::f64;
use std::fmt;

/// A vertex with x, y and an optional z. An undefined z is stored as NaN.
#[derive(Copy, Clone, Debug)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    /// Creates a planar Coordinate (z undefined).
    pub fn new(x: f64, y: f64) -> Coordinate {
        Coordinate { x, y, z: f64::NAN }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Coordinate {
        Coordinate { x, y, z }
    }

    /// A coordinate with every ordinate undefined.
    pub fn nan() -> Coordinate {
        Coordinate::new_3d(f64::NAN, f64::NAN, f64::NAN)
    }

    pub fn has_z(&self) -> bool {
        !self.z.is_nan()
    }

    /// Compares x and y only.
    pub fn equals_2d(&self, other: &Coordinate) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Default for Coordinate {
    fn default() -> Coordinate {
        Coordinate::new(0f64, 0f64)
    }
}

/// Two coordinates are equal when x and y match and their z values are
/// either equal or both undefined.
impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.equals_2d(other) && (self.z == other.z || (self.z.is_nan() && other.z.is_nan()))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.has_z() {
            write!(f, "(x: {}, y: {}, z: {})", self.x, self.y, self.z)
        } else {
            write!(f, "(x: {}, y: {})", self.x, self.y)
        }
    }
}
