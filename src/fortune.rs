//! Fortune's algorithm, from sites to a bounded diagram.
//!
//! [`generate`] runs the whole pipeline as set up by a [`Config`]:
//! the sweep, the closing of unbounded cells against a box, and the
//! optional clipping to that box. Use [`Sweep`] directly to step
//! through the events one at a time.
use geo::Coordinate;
use log::info;

use crate::{diagram::Diagram, geometry::BoundingBox};

mod bound;
mod sweep;
pub use sweep::{Sweep, SweepStats};

/// How the unbounded cells are closed after the sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bounding {
    /// Leave the edges of the outer cells open.
    Unbounded,
    /// Close the cells against a box around all sites and vertices.
    Auto,
    /// Close the cells against the given box, enlarged if it misses
    /// a site or a vertex.
    Box(BoundingBox),
}

impl Default for Bounding {
    fn default() -> Self {
        Bounding::Unbounded
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Config {
    pub bounding: Bounding,
    /// Clip the diagram to the box after bounding. Only applies to
    /// [`Bounding::Box`].
    pub clip: bool,
}

impl Config {
    pub fn auto() -> Self {
        Config {
            bounding: Bounding::Auto,
            clip: false,
        }
    }

    pub fn bounded(bbox: BoundingBox) -> Self {
        Config {
            bounding: Bounding::Box(bbox),
            clip: false,
        }
    }

    #[must_use]
    pub fn with_clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }
}

/// Output of [`generate`].
#[derive(Debug, Clone)]
pub struct Voronoi {
    pub diagram: Diagram,
    pub stats: SweepStats,
    /// Result of bounding, if requested.
    pub bounded: Option<bool>,
    /// The box the cells were closed against. It is larger than a
    /// requested box which missed a site or a vertex.
    pub bbox: Option<BoundingBox>,
    /// Result of clipping, if requested.
    pub clipped: Option<bool>,
}

/// Compute the Voronoi diagram of `sites`.
///
/// Site `i` of the input owns face `diagram.face_of(i)`.
///
/// # Panics
///
/// If `sites` is empty or has a non-finite coordinate.
pub fn generate<I, P>(sites: I, config: &Config) -> Voronoi
where
    I: IntoIterator<Item = P>,
    P: Into<Coordinate<f64>>,
{
    let mut sweep = Sweep::new(sites);
    sweep.run();

    let bounded = match config.bounding {
        Bounding::Unbounded => None,
        Bounding::Auto => Some(sweep.bound(None)),
        Bounding::Box(bbox) => Some(sweep.bound(Some(bbox))),
    };
    let stats = sweep.stats();
    let bbox = sweep.bounding_box();
    let mut diagram = sweep.finish();

    let clipped = match config.bounding {
        Bounding::Box(bbox) if config.clip => Some(diagram.clip(&bbox)),
        _ => None,
    };
    info!(
        "voronoi diagram of {} sites: {} vertices, {} half-edges",
        diagram.sites().len(),
        diagram.vertices().len(),
        diagram.half_edges().len()
    );

    Voronoi {
        diagram,
        stats,
        bounded,
        bbox,
        clipped,
    }
}
