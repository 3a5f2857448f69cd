use crate::structures::Coordinate;

/// Tests if a point is Left|On|Right of an infinite line,
/// based on http://geomalgorithms.com/a03-_inclusion.html.
///
/// Return: >0 for p2 left of the line through p0 and p1
///         =0 for p2  on the line
///         <0 for p2  right of the line
fn is_left(p0: &Coordinate, p1: &Coordinate, p2: &Coordinate) -> f64 {
    (p1.x - p0.x) * (p2.y - p0.y) - (p2.x - p0.x) * (p1.y - p0.y)
}

/// Winding number test for a point in a ring. The ring is treated as closed
/// whether or not its last vertex repeats the first.
pub fn point_in_poly(p: &Coordinate, v: &[Coordinate]) -> bool {
    let n = v.len();
    if n < 3 {
        return false;
    }
    let mut wn = 0i32;
    for i in 0..n {
        let a = &v[i];
        let b = &v[(i + 1) % n];
        if a.y <= p.y {
            // an upward crossing with p left of the edge
            if b.y > p.y && is_left(a, b, p) > 0f64 {
                wn += 1i32;
            }
        } else if b.y <= p.y && is_left(a, b, p) < 0f64 {
            // a downward crossing with p right of the edge
            wn -= 1i32;
        }
    }
    wn != 0i32
}

#[cfg(test)]
mod test {
    use super::point_in_poly;
    use crate::structures::Coordinate;

    #[test]
    fn test_point_in_poly() {
        let poly = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(5.0, 0.0),
            Coordinate::new(5.0, 5.0),
            Coordinate::new(0.0, 5.0),
            Coordinate::new(0.0, 0.0),
        ];
        assert!(point_in_poly(&Coordinate::new(1.0, 1.0), &poly));
        assert!(!point_in_poly(&Coordinate::new(6.0, 1.0), &poly));
    }

    #[test]
    fn test_open_ring_is_treated_as_closed() {
        let ring = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 10.0),
            Coordinate::new(10.0, 10.0),
            Coordinate::new(10.0, 0.0),
        ];
        assert!(point_in_poly(&Coordinate::new(9.0, 1.0), &ring));
        assert!(!point_in_poly(&Coordinate::new(11.0, 1.0), &ring));
        assert!(!point_in_poly(&Coordinate::new(1.0, 1.0), &ring[..2]));
    }
}
