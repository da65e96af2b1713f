//! Voronoi diagrams of point sites with [Fortune's algorithm].
//!
//! 1. [Sweep](#sweep)
//! 1. [Bounding and Clipping](#bounding-and-clipping)
//! 1. [Queries](#queries)
//!
//! # Sweep
//!
//! A horizontal line sweeps the plane from `+y` towards `-y`. Above
//! it, the beach line of parabolic arcs separates the part of the
//! diagram that is final from the part that is not. Site events add
//! arcs, circle events remove them and create the vertices of the
//! diagram. The simplest usage is [`generate`], which runs the sweep
//! and the passes after it as set up by a [`Config`]. For stepping
//! through the events, use [`Sweep`].
//!
//! ## Usage
//!
//! Sites are any type convertible to a [`Coordinate`]. Site `i` of
//! the input owns face [`Diagram::face_of`]`(i)`.
//!
//! ```rust
//! use fortune_voronoi::{generate, BoundingBox, Config};
//! let sites = vec![(2.5, 2.5), (7.5, 2.5), (2.5, 7.5), (7.5, 7.5)];
//! let config = Config::bounded(BoundingBox::new(0., 0., 10., 10.));
//! let voronoi = generate(sites, &config);
//! assert_eq!(voronoi.bounded, Some(true));
//!
//! let diagram = &voronoi.diagram;
//! for face in diagram.face_keys() {
//!     let area = diagram.face_area(face).unwrap();
//!     assert!((area - 25.).abs() < 1e-9);
//! }
//! ```
//!
//! # Bounding and Clipping
//!
//! After the sweep, the cells of the sites on the convex hull are
//! unbounded. [`Sweep::bound`] ends their edges on a box and closes
//! the cells along it. [`Diagram::clip`] then restricts a bounded
//! diagram to a box, which may be smaller than the sites' extent.
//!
//! # Queries
//!
//! The output is a doubly-connected edge list: a [`Diagram`] of
//! faces, vertices and half-edges referring to each other by keys.
//! Beyond traversal, it offers face areas, centroids and containment,
//! the [Delaunay dual](Diagram::delaunay), the
//! [convex hull](Diagram::convex_hull) of the sites, and one step of
//! [Lloyd relaxation](Diagram::relaxed_sites).
//!
//! [Fortune's algorithm]: //en.wikipedia.org/wiki/Fortune%27s_algorithm
//! [`Coordinate`]: geo::Coordinate
mod events;
pub use events::SweepPoint;

mod beach_line;

pub mod diagram;
pub use diagram::{
    Diagram, Face, FaceHalfEdges, FaceKey, HalfEdge, HalfEdgeKey, Site, Triangulation, Vertex,
    VertexKey,
};

pub mod fortune;
pub use fortune::{generate, Bounding, Config, Sweep, SweepStats, Voronoi};

pub mod geometry;
pub use geometry::{BoundingBox, BoxHit, Point, Side, Vector2};

pub mod queue;
pub use queue::{EventHandle, EventQueue};

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;

pub(crate) mod utils;
