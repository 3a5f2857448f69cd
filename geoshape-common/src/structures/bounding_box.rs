use super::Coordinate;
use std::f64;

/// A planar extent. An empty box has inverted infinite bounds so that the
/// first `expand_to_include` call snaps it to that coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> BoundingBox {
        let (x1, x2) = if min_x < max_x {
            (min_x, max_x)
        } else {
            (max_x, min_x)
        };
        let (y1, y2) = if min_y < max_y {
            (min_y, max_y)
        } else {
            (max_y, min_y)
        };
        BoundingBox {
            min_x: x1,
            min_y: y1,
            max_x: x2,
            max_y: y2,
        }
    }

    pub fn empty() -> BoundingBox {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn from_coordinates(coords: &[Coordinate]) -> BoundingBox {
        let mut bb = BoundingBox::empty();
        for c in coords {
            bb.expand_to_include(c.x, c.y);
        }
        bb
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn contains(&self, other: BoundingBox) -> bool {
        other.max_y <= self.max_y
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.min_x >= self.min_x
    }

    pub fn expand_to(&mut self, other: BoundingBox) {
        self.max_y = self.max_y.max(other.max_y);
        self.max_x = self.max_x.max(other.max_x);
        self.min_y = self.min_y.min(other.min_y);
        self.min_x = self.min_x.min(other.min_x);
    }

    pub fn expand_to_include(&mut self, x: f64, y: f64) {
        if x < self.min_x {
            self.min_x = x;
        }
        if x > self.max_x {
            self.max_x = x;
        }
        if y < self.min_y {
            self.min_y = y;
        }
        if y > self.max_y {
            self.max_y = y;
        }
    }

    /// Returns the box, or an all-zero box if nothing was ever added to it.
    /// Shapefile headers store zeros for an empty extent.
    pub fn or_zero(&self) -> BoundingBox {
        if self.is_empty() {
            return BoundingBox {
                min_x: 0f64,
                min_y: 0f64,
                max_x: 0f64,
                max_y: 0f64,
            };
        }
        *self
    }
}

impl Default for BoundingBox {
    fn default() -> BoundingBox {
        BoundingBox::empty()
    }
}

#[cfg(test)]
mod test {
    use super::BoundingBox;
    use crate::structures::Coordinate;

    #[test]
    fn test_from_coordinates() {
        let coords = [
            Coordinate::new(3.0, -1.0),
            Coordinate::new(-2.0, 4.0),
            Coordinate::new(0.5, 0.5),
        ];
        let bb = BoundingBox::from_coordinates(&coords);
        assert_eq!(bb, BoundingBox::new(-2.0, 3.0, -1.0, 4.0));
        assert!(bb.contains(BoundingBox::new(0.0, 1.0, 0.0, 1.0)));
        assert!(!bb.contains(BoundingBox::new(0.0, 4.0, 0.0, 1.0)));
    }

    #[test]
    fn test_empty_box() {
        let bb = BoundingBox::from_coordinates(&[]);
        assert!(bb.is_empty());
        assert_eq!(bb.or_zero(), BoundingBox::new(0.0, 0.0, 0.0, 0.0));
    }
}
