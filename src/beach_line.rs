//! The beach line of Fortune's algorithm.
//!
//! A red-black tree of parabolic arcs, ordered left to right, whose
//! nodes are additionally doubly linked in beach order. Nodes live in a
//! [`Slab`] and refer to each other by key; key [`NIL`] is the shared
//! black sentinel.
use std::{
    iter::successors,
    ops::{Index, IndexMut},
};

use geo::Coordinate;
use log::trace;
use slab::Slab;

use crate::{diagram::HalfEdgeKey, queue::EventHandle};

mod tree;

pub(crate) type ArcKey = usize;

/// Key of the sentinel node.
pub(crate) const NIL: ArcKey = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Which copy of a split arc a node is.
///
/// Only consulted to place breakpoints between arcs whose foci are
/// at the same height but in reversed order; see [`breakpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ArcSide {
    Left,
    Right,
}

/// A parabolic arc of the beach line.
#[derive(Debug, Clone)]
pub(crate) struct Arc {
    pub parent: ArcKey,
    pub left: ArcKey,
    pub right: ArcKey,

    pub prev: ArcKey,
    pub next: ArcKey,

    pub site: usize,
    pub focus: Coordinate<f64>,

    /// Pending half-edges traced by the left and right breakpoints.
    pub left_half_edge: Option<HalfEdgeKey>,
    pub right_half_edge: Option<HalfEdgeKey>,

    /// The circle event at which this arc disappears, if scheduled.
    pub event: Option<EventHandle>,

    pub color: Color,
    pub side: ArcSide,
}

impl Arc {
    fn new(site: usize, focus: Coordinate<f64>, side: ArcSide) -> Self {
        Arc {
            parent: NIL,
            left: NIL,
            right: NIL,
            prev: NIL,
            next: NIL,
            site,
            focus,
            left_half_edge: None,
            right_half_edge: None,
            event: None,
            color: Color::Red,
            side,
        }
    }
}

pub(crate) struct BeachLine {
    arcs: Slab<Arc>,
    root: ArcKey,
}

impl BeachLine {
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arcs = Slab::with_capacity(capacity + 1);
        let mut sentinel = Arc::new(usize::MAX, Coordinate { x: 0., y: 0. }, ArcSide::Left);
        sentinel.color = Color::Black;
        let nil = arcs.insert(sentinel);
        debug_assert_eq!(nil, NIL);
        BeachLine { arcs, root: NIL }
    }

    pub fn is_empty(&self) -> bool {
        self.root == NIL
    }

    /// Number of arcs, excluding the sentinel.
    pub fn len(&self) -> usize {
        self.arcs.len() - 1
    }

    /// Initialize the beach line with a single arc.
    pub fn set_root(&mut self, site: usize, focus: Coordinate<f64>) -> ArcKey {
        assert!(self.is_empty(), "beach line already has a root");
        let arc = self.create_arc(site, focus, ArcSide::Left);
        self.arcs[arc].color = Color::Black;
        self.root = arc;
        arc
    }

    pub fn leftmost_arc(&self) -> ArcKey {
        if self.is_empty() {
            NIL
        } else {
            self.minimum(self.root)
        }
    }

    /// Arcs in beach order, left to right.
    pub fn iter(&self) -> impl Iterator<Item = ArcKey> + '_ {
        let first = Some(self.leftmost_arc()).filter(|&arc| arc != NIL);
        successors(first, move |&arc| Some(self.arcs[arc].next).filter(|&n| n != NIL))
    }

    /// The arc vertically above `point` when the sweep is at `sweep_y`.
    pub fn arc_above(&self, point: Coordinate<f64>, sweep_y: f64) -> ArcKey {
        assert!(!self.is_empty(), "arc search on an empty beach line");
        let mut node = self.root;
        loop {
            let arc = &self.arcs[node];
            let left_bp = if arc.prev == NIL {
                f64::NEG_INFINITY
            } else {
                breakpoint(self.arcs[arc.prev].focus, arc.focus, sweep_y, arc.side)
            };
            let right_bp = if arc.next == NIL {
                f64::INFINITY
            } else {
                let next = &self.arcs[arc.next];
                breakpoint(arc.focus, next.focus, sweep_y, next.side)
            };

            let child = if point.x < left_bp {
                arc.left
            } else if point.x > right_bp {
                arc.right
            } else {
                return node;
            };
            if child == NIL {
                trace!(
                    "arc search for {:?} stopped at arc {} ({} .. {})",
                    point,
                    node,
                    left_bp,
                    right_bp
                );
                return node;
            }
            node = child;
        }
    }

    /// Split `arc` by the arc of a new site.
    ///
    /// `arc` is replaced by three arcs: a left copy keeping its left
    /// half-edge, the new arc, and a right copy keeping its right
    /// half-edge. Returns the new (middle) arc. The caller must have
    /// cancelled the circle event of `arc`.
    pub fn break_arc(&mut self, arc: ArcKey, site: usize, focus: Coordinate<f64>) -> ArcKey {
        debug_assert!(self.arcs[arc].event.is_none(), "split arc has a pending event");
        let middle = self.create_arc(site, focus, ArcSide::Left);

        let (old_site, old_focus) = (self.arcs[arc].site, self.arcs[arc].focus);
        let left = self.create_arc(old_site, old_focus, ArcSide::Left);
        self.arcs[left].left_half_edge = self.arcs[arc].left_half_edge;
        let right = self.create_arc(old_site, old_focus, ArcSide::Right);
        self.arcs[right].right_half_edge = self.arcs[arc].right_half_edge;

        self.replace(arc, middle);
        self.insert_before(middle, left);
        self.insert_after(middle, right);
        self.arcs.remove(arc);
        middle
    }

    /// Remove `arc` from the beach line and return it.
    ///
    /// Its neighbours become adjacent; the returned arc keeps its
    /// stale links.
    pub fn remove(&mut self, arc: ArcKey) -> Arc {
        assert_ne!(arc, NIL, "cannot remove the sentinel");
        self.remove_node(arc);
        self.arcs.remove(arc)
    }

    fn create_arc(&mut self, site: usize, focus: Coordinate<f64>, side: ArcSide) -> ArcKey {
        self.arcs.insert(Arc::new(site, focus, side))
    }
}

impl Index<ArcKey> for BeachLine {
    type Output = Arc;

    fn index(&self, key: ArcKey) -> &Arc {
        &self.arcs[key]
    }
}

impl IndexMut<ArcKey> for BeachLine {
    fn index_mut(&mut self, key: ArcKey) -> &mut Arc {
        &mut self.arcs[key]
    }
}

/// The x-coordinate where the arcs with foci `p1` (left) and `p2`
/// (right) meet, for the directrix `y = sweep_y`.
///
/// Foci at exactly the same height meet halfway between them. If they
/// are in reversed order, the right arc is a copy squeezed out to
/// infinity: `side` is the side of that right arc, and decides which
/// infinity. Using the right arc's side for both neighbours of a pair
/// keeps the breakpoint a function of the pair alone.
///
/// Otherwise the intersection is solved relative to `p1`, from the
/// heights of the foci above the directrix, so that translating the
/// sites translates the result.
pub(crate) fn breakpoint(p1: Coordinate<f64>, p2: Coordinate<f64>, sweep_y: f64, side: ArcSide) -> f64 {
    let (x1, y1, x2, y2) = (p1.x, p1.y, p2.x, p2.y);
    if y1 == y2 {
        return if x1 < x2 {
            x1 + (x2 - x1) / 2.
        } else if side == ArcSide::Left {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let (h1, h2) = (y1 - sweep_y, y2 - sweep_y);
    // A focus on the directrix is a vertical ray.
    if h1 <= 0. {
        return x1;
    }
    if h2 <= 0. {
        return x2;
    }

    // With u = x - x1, the arcs meet where
    // (h2 - h1) u^2 + 2 h1 dx u - h1 (dx^2 + h2 (h2 - h1)) = 0,
    // at the root where the right arc starts to be the lower one.
    let dx = x2 - x1;
    let a = h2 - h1;
    let root = (h1 * h2).sqrt() * dx.hypot(a);
    let u = if dx >= 0. {
        h1 * (dx * dx + h2 * a) / (h1 * dx + root)
    } else {
        (root - h1 * dx) / a
    };
    x1 + u
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn pt(x: f64, y: f64) -> Coordinate<f64> {
        Coordinate { x, y }
    }

    #[test]
    fn test_breakpoint() {
        // Parabolas x^2/40 and ((x-10)^2 - 100)/20 meet at 0 and 40;
        // the left arc (higher focus) gives way at 0.
        assert_relative_eq!(breakpoint(pt(0., 10.), pt(10., 0.), -10., ArcSide::Left), 0.);
        assert_relative_eq!(breakpoint(pt(10., 0.), pt(0., 10.), -10., ArcSide::Left), 40.);

        assert_relative_eq!(breakpoint(pt(0., 0.), pt(10., 0.), -3., ArcSide::Left), 5.);
        assert_eq!(breakpoint(pt(10., 0.), pt(0., 0.), -3., ArcSide::Left), f64::NEG_INFINITY);
        assert_eq!(breakpoint(pt(10., 0.), pt(0., 0.), -3., ArcSide::Right), f64::INFINITY);

        assert_relative_eq!(breakpoint(pt(3., 0.), pt(0., 10.), 0., ArcSide::Left), 3.);
        assert_relative_eq!(breakpoint(pt(0., 10.), pt(3., 0.), 0., ArcSide::Left), 3.);
    }

    #[test]
    fn test_breakpoint_is_equidistant() {
        let (p1, p2, sweep_y) = (pt(-2., 7.), pt(5., 3.), -1.5);
        let x = breakpoint(p1, p2, sweep_y, ArcSide::Left);
        // Height of the parabola with focus `p` at `x`.
        let height = |p: Coordinate<f64>| {
            ((x - p.x).powi(2) + p.y * p.y - sweep_y * sweep_y) / (2. * (p.y - sweep_y))
        };
        assert_relative_eq!(height(p1), height(p2), epsilon = 1e-9);
    }

    #[test]
    fn test_breakpoint_follows_translation() {
        let cases = [
            (pt(0., 1.), pt(0.5, 1. - 1e-4), 0.2),
            (pt(0.5, 1. - 1e-4), pt(0., 1.), 0.2),
            (pt(0.3, 0.9), pt(0.3, 0.4), 0.1),
            (pt(0., 1.), pt(1., 1. + 1e-12), 0.),
            (pt(0.25, 0.5), pt(0.75, 0.2), 0.2),
        ];
        let offset = pt(1e6, -1e6);
        for &(p1, p2, sweep_y) in &cases {
            let near = breakpoint(p1, p2, sweep_y, ArcSide::Left);
            let far = breakpoint(p1 + offset, p2 + offset, sweep_y + offset.y, ArcSide::Left);
            assert!(near.is_finite());
            assert_relative_eq!(far - offset.x, near, epsilon = 1e-6, max_relative = 1e-5);
        }
        // Nearly level foci meet nearly halfway.
        let x = breakpoint(pt(0., 1.), pt(1., 1. + 1e-12), 0., ArcSide::Left);
        assert_relative_eq!(x, 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_arc_above_and_split() {
        let mut beach_line = BeachLine::with_capacity(8);
        let root = beach_line.set_root(0, pt(0., 10.));
        assert_eq!(beach_line.arc_above(pt(100., 0.), 0.), root);

        let middle = beach_line.break_arc(root, 1, pt(4., 0.));
        let sites: Vec<_> = beach_line.iter().map(|a| beach_line[a].site).collect();
        assert_eq!(sites, vec![0, 1, 0]);
        assert_eq!(beach_line.len(), 3);

        // Just below the new site, its arc is a narrow parabola
        // around x = 4.
        assert_eq!(beach_line.arc_above(pt(4., -0.01), -0.01), middle);
        let left = beach_line[middle].prev;
        let right = beach_line[middle].next;
        assert_eq!(beach_line.arc_above(pt(-20., -0.01), -0.01), left);
        assert_eq!(beach_line.arc_above(pt(20., -0.01), -0.01), right);
        assert_eq!(beach_line[right].side, ArcSide::Right);
        assert_eq!(beach_line.leftmost_arc(), left);
    }

    #[test]
    fn test_equal_height_sites() {
        let mut beach_line = BeachLine::with_capacity(8);
        let root = beach_line.set_root(0, pt(0., 0.));
        let middle = beach_line.break_arc(root, 1, pt(5., 0.));
        // The new arc covers everything right of x = 2.5.
        assert_eq!(beach_line.arc_above(pt(10., 0.), 0.), middle);
        let newest = beach_line.break_arc(middle, 2, pt(10., 0.));
        let sites: Vec<_> = beach_line.iter().map(|a| beach_line[a].site).collect();
        assert_eq!(sites, vec![0, 1, 2, 1, 0]);
        assert_eq!(beach_line.arc_above(pt(6., -1.), -1.), beach_line[newest].prev);
        assert_eq!(beach_line.arc_above(pt(1e6, -1.), -1.), newest);
    }
}
