use std::fmt;

/// The shape type codes defined by the ESRI Shapefile Technical Description.
/// Codes ten above a base type carry Z and M values; codes twenty above
/// carry M values only.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Null = 0,
    Point = 1,
    PolyLine = 3,
    Polygon = 5,
    MultiPoint = 8,
    PointZ = 11,
    PolyLineZ = 13,
    PolygonZ = 15,
    MultiPointZ = 18,
    PointM = 21,
    PolyLineM = 23,
    PolygonM = 25,
    MultiPointM = 28,
    Undefined = -1,
}

impl ShapeType {
    /// Maps a wire code to its ShapeType. Codes the format does not define,
    /// or that this codec cannot handle, map to `Undefined`.
    pub fn from_int(value: i32) -> ShapeType {
        match value {
            0 => ShapeType::Null,
            1 => ShapeType::Point,
            3 => ShapeType::PolyLine,
            5 => ShapeType::Polygon,
            8 => ShapeType::MultiPoint,
            11 => ShapeType::PointZ,
            13 => ShapeType::PolyLineZ,
            15 => ShapeType::PolygonZ,
            18 => ShapeType::MultiPointZ,
            21 => ShapeType::PointM,
            23 => ShapeType::PolyLineM,
            25 => ShapeType::PolygonM,
            28 => ShapeType::MultiPointM,
            _ => ShapeType::Undefined,
        }
    }

    pub fn to_int(&self) -> i32 {
        *self as i32
    }

    pub fn family(&self) -> ShapeTypeFamily {
        match self {
            ShapeType::Null => ShapeTypeFamily::Null,
            ShapeType::Point | ShapeType::PointZ | ShapeType::PointM => ShapeTypeFamily::Point,
            ShapeType::MultiPoint | ShapeType::MultiPointZ | ShapeType::MultiPointM => {
                ShapeTypeFamily::MultiPoint
            }
            ShapeType::PolyLine | ShapeType::PolyLineZ | ShapeType::PolyLineM => {
                ShapeTypeFamily::Line
            }
            ShapeType::Polygon | ShapeType::PolygonZ | ShapeType::PolygonM => {
                ShapeTypeFamily::Polygon
            }
            ShapeType::Undefined => ShapeTypeFamily::Undefined,
        }
    }

    /// The 2D type of the same family, e.g. `PolygonZ` → `Polygon`.
    pub fn base_shape_type(&self) -> ShapeType {
        match self.family() {
            ShapeTypeFamily::Null => ShapeType::Null,
            ShapeTypeFamily::Point => ShapeType::Point,
            ShapeTypeFamily::MultiPoint => ShapeType::MultiPoint,
            ShapeTypeFamily::Line => ShapeType::PolyLine,
            ShapeTypeFamily::Polygon => ShapeType::Polygon,
            ShapeTypeFamily::Undefined => ShapeType::Undefined,
        }
    }

    /// Selects the member of `family` with the given dimensionality.
    pub fn from_family(family: ShapeTypeFamily, dimension: ShapeTypeDimension) -> ShapeType {
        let base = match family {
            ShapeTypeFamily::Null => return ShapeType::Null,
            ShapeTypeFamily::Undefined => return ShapeType::Undefined,
            ShapeTypeFamily::Point => 1,
            ShapeTypeFamily::MultiPoint => 8,
            ShapeTypeFamily::Line => 3,
            ShapeTypeFamily::Polygon => 5,
        };
        let offset = match dimension {
            ShapeTypeDimension::XY => 0,
            ShapeTypeDimension::Z => 10,
            ShapeTypeDimension::Measure => 20,
        };
        ShapeType::from_int(base + offset)
    }

    pub fn dimension(&self) -> ShapeTypeDimension {
        match self {
            ShapeType::PointZ
            | ShapeType::PolyLineZ
            | ShapeType::PolygonZ
            | ShapeType::MultiPointZ => ShapeTypeDimension::Z,
            ShapeType::PointM
            | ShapeType::PolyLineM
            | ShapeType::PolygonM
            | ShapeType::MultiPointM => ShapeTypeDimension::Measure,
            _ => ShapeTypeDimension::XY,
        }
    }

    pub fn is_point_type(&self) -> bool {
        self.family() == ShapeTypeFamily::Point
    }

    pub fn is_multipoint_type(&self) -> bool {
        self.family() == ShapeTypeFamily::MultiPoint
    }

    pub fn is_line_type(&self) -> bool {
        self.family() == ShapeTypeFamily::Line
    }

    pub fn is_polygon_type(&self) -> bool {
        self.family() == ShapeTypeFamily::Polygon
    }

    /// Multipart families carry a per-record bounding box.
    pub fn has_record_bounds(&self) -> bool {
        matches!(
            self.family(),
            ShapeTypeFamily::MultiPoint | ShapeTypeFamily::Line | ShapeTypeFamily::Polygon
        )
    }

    pub fn has_z(&self) -> bool {
        self.dimension() == ShapeTypeDimension::Z
    }

    /// True for both the M-only and the Z variants; Z records always
    /// reserve room for measures.
    pub fn has_m(&self) -> bool {
        self.dimension() != ShapeTypeDimension::XY
    }
}

/// The geometry family a ShapeType belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeTypeFamily {
    Null,
    Point,
    MultiPoint,
    Line,
    Polygon,
    Undefined,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShapeTypeDimension {
    /// x and y only
    XY,
    /// x, y and a measure
    Measure,
    /// x, y, z and a measure
    Z,
}

impl Default for ShapeType {
    fn default() -> ShapeType {
        ShapeType::Null
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let printable = match *self {
            ShapeType::Null => "Null",
            ShapeType::Point => "Point",
            ShapeType::PolyLine => "PolyLine",
            ShapeType::Polygon => "Polygon",
            ShapeType::MultiPoint => "MultiPoint",
            ShapeType::PointZ => "PointZ",
            ShapeType::PolyLineZ => "PolyLineZ",
            ShapeType::PolygonZ => "PolygonZ",
            ShapeType::MultiPointZ => "MultiPointZ",
            ShapeType::PointM => "PointM",
            ShapeType::PolyLineM => "PolyLineM",
            ShapeType::PolygonM => "PolygonM",
            ShapeType::MultiPointM => "MultiPointM",
            ShapeType::Undefined => "Undefined",
        };
        write!(f, "{}", printable)
    }
}

#[cfg(test)]
mod test {
    use super::{ShapeType, ShapeTypeDimension, ShapeTypeFamily};

    #[test]
    fn test_wire_codes() {
        for code in [0, 1, 3, 5, 8, 11, 13, 15, 18, 21, 23, 25, 28] {
            assert_eq!(ShapeType::from_int(code).to_int(), code);
        }
        assert_eq!(ShapeType::from_int(31), ShapeType::Undefined);
        assert_eq!(ShapeType::from_int(2), ShapeType::Undefined);
    }

    #[test]
    fn test_families_and_dimensions() {
        assert_eq!(ShapeType::PolygonZ.base_shape_type(), ShapeType::Polygon);
        assert_eq!(ShapeType::MultiPointM.family(), ShapeTypeFamily::MultiPoint);
        assert_eq!(ShapeType::PointM.dimension(), ShapeTypeDimension::Measure);
        assert!(ShapeType::PolyLineZ.has_m());
        assert!(!ShapeType::PolyLineM.has_z());
        assert!(!ShapeType::PointZ.has_record_bounds());
        assert_eq!(
            ShapeType::from_family(ShapeTypeFamily::Line, ShapeTypeDimension::Z),
            ShapeType::PolyLineZ
        );
        assert_eq!(
            ShapeType::from_family(ShapeTypeFamily::Point, ShapeTypeDimension::Measure),
            ShapeType::PointM
        );
    }
}
