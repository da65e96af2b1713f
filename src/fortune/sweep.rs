use std::iter::FromIterator;

use geo::{
    kernels::{HasKernel, Kernel, Orientation},
    Coordinate,
};
use log::{debug, trace, warn};

use crate::{
    beach_line::{ArcKey, BeachLine, NIL},
    diagram::{Diagram, HalfEdgeKey, VertexKey},
    events::{Event, EventKind, SweepPoint},
    geometry::{convergence_point, BoundingBox, Point, Vector2},
    queue::EventQueue,
    utils::Tolerance,
};

/// Counters collected while sweeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub site_events: usize,
    pub circle_events: usize,
    /// Voronoi vertices created by circle events.
    pub vertices: usize,
    /// Circle events that converged onto an existing vertex.
    pub merged_vertices: usize,
    /// Sites skipped for coinciding with an earlier site.
    pub duplicate_sites: usize,
    /// Scheduled circle events cancelled before being reached.
    pub invalidated_events: usize,
}

/// State of Fortune's sweep over a set of sites.
///
/// The sweep line moves from `+y` towards `-y`. Events are handled
/// one at a time with [`next_event`](Self::next_event), or all at
/// once with [`run`](Self::run). Once done, the remaining beach line
/// describes the unbounded edges, which [`bound`](Self::bound) can
/// close against a box.
pub struct Sweep {
    pub(super) diagram: Diagram,
    events: EventQueue<Event>,
    pub(super) beach_line: BeachLine,
    /// Half-edges spliced out of their faces, to be dropped.
    spliced: Vec<HalfEdgeKey>,
    stats: SweepStats,
    /// The box the diagram was bounded by, once bounded.
    pub(super) bbox: Option<BoundingBox>,
    pub(super) bounded: bool,
    last_site: Option<Point>,
    /// Tolerance for coordinates, from the extent of the sites.
    tolerance: Tolerance,
}

impl<P: Into<Coordinate<f64>>> FromIterator<P> for Sweep {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Sweep::new(iter)
    }
}

impl Sweep {
    /// Set up the sweep over `sites`, indexed in iteration order.
    ///
    /// # Panics
    ///
    /// If there are no sites, or a site has a non-finite coordinate.
    pub fn new<I, P>(sites: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Coordinate<f64>>,
    {
        let iter = sites.into_iter();
        let size = {
            let (min_size, max_size) = iter.size_hint();
            max_size.unwrap_or(min_size)
        };
        let mut sweep = Sweep {
            diagram: Diagram::with_capacity(size),
            events: EventQueue::with_capacity(2 * size),
            beach_line: BeachLine::with_capacity(2 * size),
            spliced: vec![],
            stats: Default::default(),
            bbox: None,
            bounded: false,
            last_site: None,
            tolerance: Tolerance::for_extent(0.),
        };
        for point in iter {
            let point = point.into();
            let face = sweep.diagram.add_site(point);
            sweep.events.emplace(Event::site(face.index(), point));
        }
        let extent = BoundingBox::from_points(sweep.diagram.sites().iter().map(|site| site.point))
            .map(|bbox| bbox.width().max(bbox.height()));
        let extent = match extent {
            Some(extent) => extent,
            None => panic!("cannot build a Voronoi diagram from an empty input"),
        };
        sweep.tolerance = Tolerance::for_extent(extent);
        sweep
    }

    /// Handle the next event, returning its position.
    pub fn next_event(&mut self) -> Option<SweepPoint> {
        let event = self.events.pop()?;
        match event.kind {
            EventKind::Site(index) => self.handle_site_event(index),
            EventKind::Circle { arc, convergence } => {
                self.handle_circle_event(arc, convergence, event.point.y())
            }
        }
        Some(event.point)
    }

    /// Position of the next event, if any.
    pub fn peek_point(&self) -> Option<SweepPoint> {
        self.events.peek().map(|event| event.point)
    }

    /// Handle all the remaining events.
    pub fn run(&mut self) {
        while self.next_event().is_some() {}
    }

    pub fn is_done(&self) -> bool {
        self.events.is_empty()
    }

    pub fn stats(&self) -> SweepStats {
        self.stats
    }

    /// The diagram built so far.
    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    /// The box the cells were closed against by [`bound`](Self::bound),
    /// if any.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.bbox
    }

    pub fn beach_line_len(&self) -> usize {
        self.beach_line.len()
    }

    /// Run the sweep to completion and return the diagram.
    pub fn finish(mut self) -> Diagram {
        self.run();
        if !self.spliced.is_empty() {
            let mut live_half_edges = vec![true; self.diagram.half_edges().len()];
            for key in self.spliced.drain(..) {
                live_half_edges[key.index()] = false;
            }
            let live_vertices = vec![true; self.diagram.vertices().len()];
            self.diagram.compact(&live_vertices, &live_half_edges);
        }
        debug!("sweep finished: {:?}", self.stats);
        self.diagram
    }

    fn handle_site_event(&mut self, index: usize) {
        let point = self.diagram.sites()[index].point;
        self.stats.site_events += 1;
        trace!("site event {} at {:?}", index, point);

        if self.beach_line.is_empty() {
            self.beach_line.set_root(index, point);
            self.last_site = Some(point);
            return;
        }

        let arc = self.beach_line.arc_above(point, point.y);
        let tolerance = self.tolerance;
        let duplicate_of_last = self
            .last_site
            .map_or(false, |last| tolerance.approx_eq(last, point));
        if duplicate_of_last || tolerance.approx_eq(self.beach_line[arc].focus, point) {
            warn!("skipping site {} at {:?}: duplicate of an earlier site", index, point);
            self.stats.duplicate_sites += 1;
            return;
        }
        self.last_site = Some(point);

        self.invalidate_circle_event(arc);
        let middle = self.beach_line.break_arc(arc, index, point);
        let left = self.beach_line[middle].prev;
        let right = self.beach_line[middle].next;

        self.add_edge(left, middle);
        self.beach_line[middle].right_half_edge = self.beach_line[middle].left_half_edge;
        self.beach_line[right].left_half_edge = self.beach_line[left].right_half_edge;

        let (far_left, far_right) = (self.beach_line[left].prev, self.beach_line[right].next);
        if far_left != NIL {
            self.maybe_add_circle_event(far_left, left, middle, point.y);
        }
        if far_right != NIL {
            self.maybe_add_circle_event(middle, right, far_right, point.y);
        }
    }

    fn handle_circle_event(&mut self, arc: ArcKey, convergence: Point, sweep_y: f64) {
        self.stats.circle_events += 1;
        trace!("circle event of arc {} at {:?}", arc, convergence);
        self.beach_line[arc].event = None;

        let left_edge = self.beach_line[arc].left_half_edge;
        let right_edge = self.beach_line[arc].right_half_edge;

        // Cocircular sites produce several events at the same point;
        // they share one vertex.
        let at_convergence =
            |vertex: &VertexKey| self.tolerance.approx_eq(self.diagram[*vertex].point, convergence);
        let merged = left_edge
            .and_then(|edge| self.diagram[edge].orig)
            .filter(at_convergence)
            .or_else(|| {
                right_edge
                    .and_then(|edge| self.diagram[edge].dest)
                    .filter(at_convergence)
            });
        let vertex = match merged {
            Some(vertex) => {
                debug!("circle event at {:?} merged into {}", convergence, vertex);
                self.stats.merged_vertices += 1;
                vertex
            }
            None => {
                self.stats.vertices += 1;
                self.diagram.create_vertex(convergence)
            }
        };

        let (left, right) = (self.beach_line[arc].prev, self.beach_line[arc].next);
        self.invalidate_circle_event(left);
        self.invalidate_circle_event(right);
        self.remove_arc(arc, vertex);

        if merged.is_some() {
            for edge in left_edge.into_iter().chain(right_edge) {
                let half_edge = &self.diagram[edge];
                if half_edge.orig == Some(vertex) && half_edge.dest == Some(vertex) {
                    self.splice_out(edge);
                }
            }
        }

        let (far_left, far_right) = (self.beach_line[left].prev, self.beach_line[right].next);
        if far_left != NIL {
            self.maybe_add_circle_event(far_left, left, right, sweep_y);
        }
        if far_right != NIL {
            self.maybe_add_circle_event(left, right, far_right, sweep_y);
        }
    }

    /// Remove `arc`, whose breakpoints meet at `vertex`, and start the
    /// edge traced by its neighbours.
    fn remove_arc(&mut self, arc: ArcKey, vertex: VertexKey) {
        let (left, right) = (self.beach_line[arc].prev, self.beach_line[arc].next);
        self.set_dest(left, arc, vertex);
        self.set_dest(arc, right, vertex);
        if let (Some(left_edge), Some(right_edge)) = (
            self.beach_line[arc].left_half_edge,
            self.beach_line[arc].right_half_edge,
        ) {
            self.diagram.link(left_edge, right_edge);
        }
        self.beach_line.remove(arc);

        let prev_half_edge = self.beach_line[left].right_half_edge;
        let next_half_edge = self.beach_line[right].left_half_edge;
        self.add_edge(left, right);
        self.set_orig(left, right, vertex);
        if let (Some(new), Some(prev)) = (self.beach_line[left].right_half_edge, prev_half_edge) {
            self.diagram.link(new, prev);
        }
        if let (Some(next), Some(new)) = (next_half_edge, self.beach_line[right].left_half_edge) {
            self.diagram.link(next, new);
        }
    }

    /// New twin half-edges traced by the breakpoint between `left` and
    /// `right`.
    fn add_edge(&mut self, left: ArcKey, right: ArcKey) {
        let left_face = self.diagram.face_of(self.beach_line[left].site);
        let right_face = self.diagram.face_of(self.beach_line[right].site);
        let (left_edge, right_edge) = self.diagram.create_twins(left_face, right_face);
        self.beach_line[left].right_half_edge = Some(left_edge);
        self.beach_line[right].left_half_edge = Some(right_edge);
    }

    /// End the edge traced by the breakpoint between `left` and `right`
    /// at `vertex`.
    pub(super) fn set_dest(&mut self, left: ArcKey, right: ArcKey, vertex: VertexKey) {
        if let Some(edge) = self.beach_line[left].right_half_edge {
            self.diagram.half_edge_mut(edge).orig = Some(vertex);
        }
        if let Some(edge) = self.beach_line[right].left_half_edge {
            self.diagram.half_edge_mut(edge).dest = Some(vertex);
        }
    }

    /// Start the edge traced by the breakpoint between `left` and
    /// `right` at `vertex`.
    fn set_orig(&mut self, left: ArcKey, right: ArcKey, vertex: VertexKey) {
        if let Some(edge) = self.beach_line[left].right_half_edge {
            self.diagram.half_edge_mut(edge).dest = Some(vertex);
        }
        if let Some(edge) = self.beach_line[right].left_half_edge {
            self.diagram.half_edge_mut(edge).orig = Some(vertex);
        }
    }

    /// Drop a zero-length edge from both faces.
    fn splice_out(&mut self, edge: HalfEdgeKey) {
        trace!("splicing out zero-length {}", edge);
        let twin = self.diagram[edge].twin;
        for key in std::iter::once(edge).chain(twin) {
            self.diagram.unlink(key);
            self.spliced.push(key);
        }
    }

    /// Schedule the circle event of `middle`, if its breakpoints with
    /// `left` and `right` converge.
    ///
    /// They converge exactly when the foci turn clockwise. This holds
    /// also for a site landing right below a breakpoint, whose event
    /// lies on the sweep line itself.
    fn maybe_add_circle_event(&mut self, left: ArcKey, middle: ArcKey, right: ArcKey, sweep_y: f64) {
        let p1 = self.beach_line[left].focus;
        let p2 = self.beach_line[middle].focus;
        let p3 = self.beach_line[right].focus;
        if <f64 as HasKernel>::Ker::orient2d(p1, p2, p3) != Orientation::Clockwise {
            return;
        }
        let convergence = match convergence_point(p1, p2, p3) {
            Some(point) => point,
            None => return,
        };
        let event_y = convergence.y - convergence.dist(p1);
        if event_y > sweep_y {
            trace!("circle event of arc {} moved down to the sweep line", middle);
        }

        debug_assert!(self.beach_line[middle].event.is_none());
        let handle = self
            .events
            .emplace(Event::circle(middle, convergence, event_y.min(sweep_y)));
        self.beach_line[middle].event = Some(handle);
        debug!("circle event for arc {} at {:?}", middle, convergence);
    }

    fn invalidate_circle_event(&mut self, arc: ArcKey) {
        if let Some(handle) = self.beach_line[arc].event.take() {
            self.events.remove(handle);
            self.stats.invalidated_events += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Coordinate { x, y }
    }

    #[test]
    fn test_events_in_sweep_order() {
        let mut sweep: Sweep = vec![pt(0., 0.), pt(1., 5.), pt(-1., 5.), pt(3., 2.)]
            .into_iter()
            .collect();
        let mut last: Option<SweepPoint> = None;
        let mut sites = 0;
        while let Some(point) = sweep.next_event() {
            if let Some(last) = last {
                assert!(last <= point);
            }
            last = Some(point);
            sites += 1;
        }
        assert!(sweep.is_done());
        assert_eq!(sweep.stats().site_events, 4);
        assert_eq!(sites, 4 + sweep.stats().circle_events);
    }

    #[test]
    fn test_triangle() {
        let mut sweep = Sweep::new(vec![pt(0., 0.), pt(10., 0.), pt(5., 10.)]);
        sweep.run();
        let stats = sweep.stats();
        assert_eq!(stats.circle_events, 1);
        assert_eq!(stats.vertices, 1);
        assert_eq!(sweep.beach_line_len(), 4);

        let diagram = sweep.finish();
        assert_eq!(diagram.vertices().len(), 1);
        assert_eq!(diagram.half_edges().len(), 6);
        let center = diagram.vertices()[0].point;
        for site in diagram.sites() {
            assert_relative_eq!(site.point.dist(center), pt(0., 0.).dist(center), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_duplicate_sites_are_skipped() {
        let mut sweep = Sweep::new(vec![pt(0., 0.), pt(4., 3.), pt(0., 0.), pt(5., -2.)]);
        sweep.run();
        assert_eq!(sweep.stats().duplicate_sites, 1);
        let diagram = sweep.finish();
        assert_eq!(diagram.sites().len(), 4);
        // Either copy of the repeated site may come first.
        let empty = [0, 2]
            .iter()
            .filter(|&&index| diagram[diagram.face_of(index)].half_edge.is_none())
            .count();
        assert_eq!(empty, 1);
        assert!(diagram[diagram.face_of(1)].half_edge.is_some());
    }

    #[test]
    #[should_panic(expected = "empty input")]
    fn test_empty_input() {
        Sweep::new(Vec::<Point>::new());
    }

    #[test]
    #[should_panic(expected = "finite")]
    fn test_non_finite_site() {
        Sweep::new(vec![pt(0., 0.), pt(f64::NAN, 1.)]);
    }
}
