//! Doubly-connected edge list of a Voronoi diagram.
//!
//! Elements live in growable vectors and refer to each other through
//! typed keys, so references stay valid while the sweep appends to
//! the arenas. Each face is the cell of one site, and its boundary is
//! a cycle of half-edges oriented counter-clockwise: the face lies to
//! the left of each of its half-edges.
use std::{fmt, ops::Index};

use crate::geometry::{BoundingBox, Point};

mod clip;
mod compact;
mod delaunay;
mod queries;

pub use delaunay::Triangulation;
pub use queries::FaceHalfEdges;

macro_rules! key_type {
    ($name:ident) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Position in the corresponding arena of the [`Diagram`].
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

key_type!(FaceKey);
key_type!(VertexKey);
key_type!(HalfEdgeKey);

/// An input point.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Position in the input.
    pub index: usize,
    pub point: Point,
    pub face: FaceKey,
}

/// The cell of a site.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub site: usize,
    /// Any half-edge of the boundary; `None` for a face without
    /// boundary (single or duplicate sites, or emptied by clipping).
    pub half_edge: Option<HalfEdgeKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub point: Point,
}

/// A directed edge of the boundary of `face`.
///
/// End-points are `None` while the edge is unbounded. Edges created
/// along a bounding box have no twin.
#[derive(Debug, Clone, PartialEq)]
pub struct HalfEdge {
    pub orig: Option<VertexKey>,
    pub dest: Option<VertexKey>,
    pub twin: Option<HalfEdgeKey>,
    pub face: FaceKey,
    pub prev: Option<HalfEdgeKey>,
    pub next: Option<HalfEdgeKey>,
}

impl HalfEdge {
    fn new(face: FaceKey) -> Self {
        HalfEdge {
            orig: None,
            dest: None,
            twin: None,
            face,
            prev: None,
            next: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagram {
    sites: Vec<Site>,
    faces: Vec<Face>,
    vertices: Vec<Vertex>,
    half_edges: Vec<HalfEdge>,
}

impl Diagram {
    /// Empty diagram with room for the output of `num_sites` sites.
    pub(crate) fn with_capacity(num_sites: usize) -> Self {
        Diagram {
            sites: Vec::with_capacity(num_sites),
            faces: Vec::with_capacity(num_sites),
            vertices: Vec::with_capacity(2 * num_sites + 10),
            half_edges: Vec::with_capacity(6 * num_sites),
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    pub fn face_keys(&self) -> impl Iterator<Item = FaceKey> {
        (0..self.faces.len()).map(FaceKey)
    }

    pub fn vertex_keys(&self) -> impl Iterator<Item = VertexKey> {
        (0..self.vertices.len()).map(VertexKey)
    }

    pub fn half_edge_keys(&self) -> impl Iterator<Item = HalfEdgeKey> {
        (0..self.half_edges.len()).map(HalfEdgeKey)
    }

    /// The face of the site at `index` in the input.
    pub fn face_of(&self, index: usize) -> FaceKey {
        self.sites[index].face
    }

    /// End-points of the half-edge, if both are known.
    pub fn segment(&self, key: HalfEdgeKey) -> Option<(Point, Point)> {
        let half_edge = &self[key];
        Some((
            self[half_edge.orig?].point,
            self[half_edge.dest?].point,
        ))
    }

    /// Bounded edges, one segment per twin pair.
    ///
    /// Edges along the bounding box, which have no twin, are
    /// included.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.half_edge_keys()
            .filter(move |&key| self[key].twin.map_or(true, |twin| key < twin))
            .filter_map(move |key| self.segment(key))
    }

    pub(crate) fn add_site(&mut self, point: Point) -> FaceKey {
        let index = self.sites.len();
        let face = FaceKey(self.faces.len());
        self.sites.push(Site { index, point, face });
        self.faces.push(Face {
            site: index,
            half_edge: None,
        });
        face
    }

    pub(crate) fn create_vertex(&mut self, point: Point) -> VertexKey {
        self.vertices.push(Vertex { point });
        VertexKey(self.vertices.len() - 1)
    }

    /// New half-edge of `face`; becomes the face's entry point if it
    /// has none yet.
    pub(crate) fn create_half_edge(&mut self, face: FaceKey) -> HalfEdgeKey {
        let key = HalfEdgeKey(self.half_edges.len());
        self.half_edges.push(HalfEdge::new(face));
        let face = &mut self.faces[face.0];
        if face.half_edge.is_none() {
            face.half_edge = Some(key);
        }
        key
    }

    /// A pair of twin half-edges bounding `left` and `right`.
    pub(crate) fn create_twins(&mut self, left: FaceKey, right: FaceKey) -> (HalfEdgeKey, HalfEdgeKey) {
        let first = self.create_half_edge(left);
        let second = self.create_half_edge(right);
        self.half_edges[first.0].twin = Some(second);
        self.half_edges[second.0].twin = Some(first);
        (first, second)
    }

    pub(crate) fn link(&mut self, prev: HalfEdgeKey, next: HalfEdgeKey) {
        self.half_edges[prev.0].next = Some(next);
        self.half_edges[next.0].prev = Some(prev);
    }

    /// Splice `key` out of its face cycle.
    ///
    /// The half-edge itself is left dangling; the caller is
    /// responsible for discarding it.
    pub(crate) fn unlink(&mut self, key: HalfEdgeKey) {
        let &HalfEdge {
            prev, next, face, ..
        } = &self.half_edges[key.0];
        match (prev, next) {
            (Some(prev), Some(next)) => self.link(prev, next),
            (Some(prev), None) => self.half_edges[prev.0].next = None,
            (None, Some(next)) => self.half_edges[next.0].prev = None,
            (None, None) => {}
        }
        let face = &mut self.faces[face.0];
        if face.half_edge == Some(key) {
            face.half_edge = next.or(prev).filter(|&k| k != key);
        }
        let half_edge = &mut self.half_edges[key.0];
        half_edge.prev = None;
        half_edge.next = None;
    }

    /// Connect `from`, which ends on the boundary of `bbox`, to `to`,
    /// which starts on it, with new half-edges of `face` running
    /// counter-clockwise along the boundary.
    ///
    /// Returns `false` if either end-point is unknown.
    pub(crate) fn join_along_box(
        &mut self,
        face: FaceKey,
        from: HalfEdgeKey,
        to: HalfEdgeKey,
        bbox: &BoundingBox,
    ) -> bool {
        let (start, end) = match (self[from].dest, self[to].orig) {
            (Some(start), Some(end)) => (start, end),
            _ => return false,
        };
        if start == end {
            self.link(from, to);
            return true;
        }

        let (p, q) = (self[start].point, self[end].point);
        let corners = if bbox.tolerance().approx_eq(p, q) {
            Default::default()
        } else {
            bbox.corners_between(bbox.perimeter_param(p), bbox.perimeter_param(q))
        };

        let mut last = from;
        let mut orig = start;
        for corner in corners {
            let vertex = self.create_vertex(corner);
            last = self.push_boundary_edge(face, last, orig, vertex);
            orig = vertex;
        }
        last = self.push_boundary_edge(face, last, orig, end);
        self.link(last, to);
        true
    }

    fn push_boundary_edge(
        &mut self,
        face: FaceKey,
        prev: HalfEdgeKey,
        orig: VertexKey,
        dest: VertexKey,
    ) -> HalfEdgeKey {
        let key = self.create_half_edge(face);
        let half_edge = &mut self.half_edges[key.0];
        half_edge.orig = Some(orig);
        half_edge.dest = Some(dest);
        self.link(prev, key);
        key
    }

    pub(crate) fn half_edge_mut(&mut self, key: HalfEdgeKey) -> &mut HalfEdge {
        &mut self.half_edges[key.0]
    }

    pub(crate) fn face_mut(&mut self, key: FaceKey) -> &mut Face {
        &mut self.faces[key.0]
    }
}

impl Index<FaceKey> for Diagram {
    type Output = Face;

    fn index(&self, key: FaceKey) -> &Face {
        &self.faces[key.0]
    }
}

impl Index<VertexKey> for Diagram {
    type Output = Vertex;

    fn index(&self, key: VertexKey) -> &Vertex {
        &self.vertices[key.0]
    }
}

impl Index<HalfEdgeKey> for Diagram {
    type Output = HalfEdge;

    fn index(&self, key: HalfEdgeKey) -> &HalfEdge {
        &self.half_edges[key.0]
    }
}

#[cfg(test)]
mod tests {
    use geo::Coordinate;

    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Coordinate { x, y }
    }

    #[test]
    fn test_twins_and_links() {
        let mut diagram = Diagram::with_capacity(2);
        let f0 = diagram.add_site(pt(0., 0.));
        let f1 = diagram.add_site(pt(10., 0.));
        assert_eq!(diagram.face_of(1), f1);

        let (a, b) = diagram.create_twins(f0, f1);
        assert_eq!(diagram[a].twin, Some(b));
        assert_eq!(diagram[b].twin, Some(a));
        assert_eq!(diagram[f0].half_edge, Some(a));
        assert_eq!(diagram[f1].half_edge, Some(b));

        let c = diagram.create_half_edge(f0);
        diagram.link(a, c);
        diagram.link(c, a);
        diagram.unlink(a);
        assert_eq!(diagram[c].next, Some(c));
        assert_eq!(diagram[f0].half_edge, Some(c));
        assert_eq!(diagram[a].next, None);
        assert_eq!(format!("{}", c), "HalfEdgeKey(2)");
    }

    #[test]
    fn test_join_along_box() {
        let bbox = BoundingBox::new(0., 0., 10., 10.);
        let mut diagram = Diagram::with_capacity(1);
        let face = diagram.add_site(pt(1., 1.));

        // An edge cutting off the lower-left corner; the face lies to
        // its left.
        let edge = diagram.create_half_edge(face);
        let u = diagram.create_vertex(pt(4., 0.));
        let v = diagram.create_vertex(pt(0., 4.));
        diagram.half_edge_mut(edge).orig = Some(u);
        diagram.half_edge_mut(edge).dest = Some(v);
        assert!(diagram.join_along_box(face, edge, edge, &bbox));

        let points = diagram.face_points(face).unwrap();
        assert_eq!(points, vec![pt(4., 0.), pt(0., 4.), pt(0., 0.)]);
        assert_eq!(diagram.half_edges().len(), 3);
        assert_eq!(diagram.edges().count(), 3);
    }
}
