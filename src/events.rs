use std::cmp::Ordering;

use geo::Coordinate;

use crate::beach_line::ArcKey;

/// A sweep event of Fortune's algorithm.
#[derive(Debug, Clone)]
pub(crate) struct Event {
    pub point: SweepPoint,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum EventKind {
    /// The sweep reaches the input site with this index.
    Site(usize),
    /// The sweep reaches the bottom of the circle centred at
    /// `convergence`, where `arc` vanishes from the beach line.
    Circle {
        arc: ArcKey,
        convergence: Coordinate<f64>,
    },
}

impl Event {
    pub fn site(index: usize, point: Coordinate<f64>) -> Self {
        Event {
            point: point.into(),
            kind: EventKind::Site(index),
        }
    }

    pub fn circle(arc: ArcKey, convergence: Coordinate<f64>, y: f64) -> Self {
        Event {
            point: Coordinate {
                x: convergence.x,
                y,
            }
            .into(),
            kind: EventKind::Circle { arc, convergence },
        }
    }
}

// Events at the same position are interchangeable: the queue only
// needs them in sweep order.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.point == other.point
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.point.cmp(&other.point)
    }
}

/// A position of the sweep line, with its place in the event order.
///
/// The sweep line moves from `+y` towards `-y`: a point comes first if
/// it is higher, or at the same height and further left. Points are
/// built with `From<Coordinate>`, which rejects non-finite coordinates,
/// so this order is total.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SweepPoint(Coordinate<f64>);

impl SweepPoint {
    pub fn coord(&self) -> Coordinate<f64> {
        self.0
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }
}

impl PartialOrd for SweepPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SweepPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        // Finite coordinates always compare.
        let higher = other.0.y.partial_cmp(&self.0.y).unwrap_or(Ordering::Equal);
        higher.then_with(|| self.0.x.partial_cmp(&other.0.x).unwrap_or(Ordering::Equal))
    }
}

impl Eq for SweepPoint {}

/// # Panics
///
/// If a coordinate is NaN or infinite.
impl From<Coordinate<f64>> for SweepPoint {
    fn from(pt: Coordinate<f64>) -> Self {
        assert!(
            pt.x.is_finite(),
            "sweep point requires a finite x-coordinate"
        );
        assert!(
            pt.y.is_finite(),
            "sweep point requires a finite y-coordinate"
        );
        SweepPoint(pt)
    }
}
