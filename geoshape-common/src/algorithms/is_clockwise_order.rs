use super::signed_ring_area;
use crate::structures::Coordinate;

/// Checks whether a ring of Coordinates is in clockwise order. Degenerate
/// rings (fewer than three distinct vertices or zero area) are reported as
/// counter-clockwise.
pub fn is_clockwise_order(points: &[Coordinate]) -> bool {
    // A negative signed area indicates clockwise order.
    signed_ring_area(points) < 0f64
}

#[cfg(test)]
mod test {
    use super::is_clockwise_order;
    use crate::structures::Coordinate;
    #[test]
    fn test_is_clockwise_order() {
        let mut points: Vec<Coordinate> = Vec::new();
        points.push(Coordinate::new(0f64, 0f64));
        points.push(Coordinate::new(1f64, 0f64));
        points.push(Coordinate::new(1f64, 1f64));
        points.push(Coordinate::new(0f64, 1f64));
        points.push(Coordinate::new(0f64, 0f64));

        assert_eq!(is_clockwise_order(&points), false);

        points.reverse();
        assert_eq!(is_clockwise_order(&points), true);
    }

    #[test]
    fn test_concave_ring() {
        // an L-shaped ring traced clockwise
        let points = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 2.0),
            Coordinate::new(1.0, 2.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(2.0, 1.0),
            Coordinate::new(2.0, 0.0),
            Coordinate::new(0.0, 0.0),
        ];
        assert!(is_clockwise_order(&points));
    }
}
