use std::slice;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(from: Point) -> Self {
        [from.x, from.y]
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("A list of coordinates must not be empty")]
pub struct EmptyPoints;

/// A non-empty, ordered list of points.
#[derive(Debug, Clone, PartialEq)]
pub struct Points(Vec<Point>);

impl Points {
    pub fn first(&self) -> Point {
        self.0[0]
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    // Never true, only provided for consistency with `len()`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Point> {
        self.0
    }
}

impl TryFrom<Vec<Point>> for Points {
    type Error = EmptyPoints;
    fn try_from(from: Vec<Point>) -> Result<Self, Self::Error> {
        if from.is_empty() {
            return Err(EmptyPoints);
        }
        Ok(Self(from))
    }
}

impl From<Point> for Points {
    fn from(from: Point) -> Self {
        Self(vec![from])
    }
}

/// Position of a location on the map.
///
/// The variant only reflects how the coordinates were given:
/// a list with a single point is still a `Multi`.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    Single(Point),
    Multi(Points),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("There is no point #{} (1..={len})", .index + 1)]
pub struct PointOutOfRange {
    pub index: usize,
    pub len: usize,
}

impl Coordinates {
    pub fn points(&self) -> &[Point] {
        match self {
            Self::Single(p) => slice::from_ref(p),
            Self::Multi(points) => points.as_slice(),
        }
    }

    pub fn into_points(self) -> Vec<Point> {
        match self {
            Self::Single(p) => vec![p],
            Self::Multi(points) => points.into_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.points().len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// A location is multi-point if it holds more than one point.
    pub fn is_multi_point(&self) -> bool {
        self.len() > 1
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.points().get(index).copied()
    }

    pub fn with_point_replaced(
        &self,
        index: usize,
        point: Point,
    ) -> Result<Coordinates, PointOutOfRange> {
        self.check_index(index)?;
        Ok(match self {
            Self::Single(_) => Self::Single(point),
            Self::Multi(points) => {
                let mut points = points.as_slice().to_vec();
                points[index] = point;
                Self::Multi(Points(points))
            }
        })
    }

    /// Returns `None` if the last remaining point has been removed.
    pub fn without_point(&self, index: usize) -> Result<Option<Coordinates>, PointOutOfRange> {
        self.check_index(index)?;
        let mut points = self.points().to_vec();
        points.remove(index);
        Ok(Points::try_from(points).ok().map(Self::Multi))
    }

    fn check_index(&self, index: usize) -> Result<(), PointOutOfRange> {
        let len = self.len();
        if index >= len {
            return Err(PointOutOfRange { index, len });
        }
        Ok(())
    }
}

impl From<Point> for Coordinates {
    fn from(from: Point) -> Self {
        Self::Single(from)
    }
}

/// Appends all incoming points after the existing ones.
///
/// Identical points are kept, i.e. the result may contain duplicates.
/// The result is always a list.
pub fn merge_coordinates(existing: &Coordinates, incoming: &Coordinates) -> Coordinates {
    let mut points = Vec::with_capacity(existing.len() + incoming.len());
    points.extend_from_slice(existing.points());
    points.extend_from_slice(incoming.points());
    Coordinates::Multi(Points(points))
}

/// Addresses the points of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PointSelection {
    /// The location as a whole, no particular point.
    Entity,
    /// A single point (0-based).
    Point(usize),
    /// Wildcard: all points of a multi-point location.
    AllPoints,
}

impl PointSelection {
    /// Creates a selection from an external 1-based index.
    pub const fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal == 0 {
            return None;
        }
        Some(Self::Point(ordinal - 1))
    }

    /// The external 1-based index of a single point.
    pub const fn ordinal(self) -> Option<usize> {
        match self {
            Self::Point(index) => Some(index + 1),
            Self::Entity | Self::AllPoints => None,
        }
    }
}
