//! Closing the unbounded cells against a box.
use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, warn};

use super::Sweep;
use crate::{
    beach_line::ArcKey,
    diagram::{FaceKey, HalfEdgeKey},
    geometry::{BoundingBox, Vector2},
};

/// How the boundary of a face meets the box. Arrivals sort first at
/// the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CrossingKind {
    /// A half-edge ending on the box.
    Arrival,
    /// A half-edge starting on the box.
    Departure,
}

#[derive(Debug, Clone, Copy)]
struct BoxCrossing {
    param: f64,
    kind: CrossingKind,
    half_edge: HalfEdgeKey,
}

impl Sweep {
    /// Bound the diagram by a box.
    ///
    /// Every edge still traced by the beach line is ended where it
    /// leaves the box, and the cells are closed along the boundary of
    /// the box. The box is `bbox` enlarged, if needed, to contain all
    /// sites and vertices, or computed from them if `None`. The box
    /// actually used is then available from
    /// [`bounding_box`](Self::bounding_box); enlarging a given box is
    /// logged as a warning.
    ///
    /// Returns `false` if some cell could not be closed; the diagram
    /// remains usable.
    ///
    /// # Panics
    ///
    /// If the sweep is not done, or the diagram is already bounded.
    #[must_use]
    pub fn bound(&mut self, bbox: Option<BoundingBox>) -> bool {
        assert!(self.is_done(), "cannot bound before the sweep is done");
        assert!(!self.bounded, "diagram is already bounded");
        self.bounded = true;

        if self.beach_line.len() < 2 {
            warn!("cannot bound a diagram with a single cell");
            return false;
        }
        let bbox = self.target_box(bbox);
        self.bbox = Some(bbox);

        let arcs: Vec<ArcKey> = self.beach_line.iter().collect();
        let mut crossings: BTreeMap<FaceKey, Vec<BoxCrossing>> = BTreeMap::new();
        let mut success = true;
        for (left, right) in arcs.into_iter().tuple_windows() {
            success &= self.bound_edge(&bbox, left, right, &mut crossings);
        }
        let faces = crossings.len();
        for (face, face_crossings) in crossings {
            success &= self.close_face(face, face_crossings, &bbox);
        }

        debug!(
            "bounded {} faces by {:?}: {}",
            faces,
            bbox,
            if success { "ok" } else { "failed" }
        );
        success
    }

    fn target_box(&self, requested: Option<BoundingBox>) -> BoundingBox {
        let points = self
            .diagram
            .vertices()
            .iter()
            .map(|vertex| vertex.point)
            .chain(self.diagram.sites().iter().map(|site| site.point));
        match requested {
            Some(mut bbox) => {
                let mut grew = false;
                for point in points {
                    grew |= bbox.expand_to(point);
                }
                if grew {
                    let padded = bbox.padded(margin(&bbox));
                    warn!(
                        "bounding box {:?} misses sites or vertices, enlarged to {:?}",
                        requested, padded
                    );
                    padded
                } else {
                    bbox
                }
            }
            None => {
                let bbox = BoundingBox::from_points(points).expect("diagram has at least one site");
                bbox.padded(margin(&bbox))
            }
        }
    }

    /// End the edge between `left` and `right` on the box, recording
    /// where it crosses for both cells.
    fn bound_edge(
        &mut self,
        bbox: &BoundingBox,
        left: ArcKey,
        right: ArcKey,
        crossings: &mut BTreeMap<FaceKey, Vec<BoxCrossing>>,
    ) -> bool {
        let (p1, p2) = (self.beach_line[left].focus, self.beach_line[right].focus);
        let direction = (p1 - p2).ortho();
        let origin = (p1 + p2) * 0.5;
        let hit = match bbox.ray_exit(origin, direction) {
            Some(hit) => hit,
            None => {
                warn!("edge from {:?} along {:?} misses {:?}", origin, direction, bbox);
                return false;
            }
        };

        let vertex = self.diagram.create_vertex(hit.point);
        self.set_dest(left, right, vertex);
        let param = bbox.perimeter_param(hit.point);
        let mut record = |half_edge: Option<HalfEdgeKey>, kind| {
            if let Some(half_edge) = half_edge {
                let face = self.diagram[half_edge].face;
                crossings.entry(face).or_default().push(BoxCrossing {
                    param,
                    kind,
                    half_edge,
                });
            }
        };
        record(self.beach_line[left].right_half_edge, CrossingKind::Departure);
        record(self.beach_line[right].left_half_edge, CrossingKind::Arrival);
        true
    }

    /// Join each arrival of `face` on the box to the next departure,
    /// counter-clockwise.
    fn close_face(&mut self, face: FaceKey, mut crossings: Vec<BoxCrossing>, bbox: &BoundingBox) -> bool {
        crossings.sort_by(|a, b| a.param.total_cmp(&b.param).then(a.kind.cmp(&b.kind)));
        match crossings.iter().position(|c| c.kind == CrossingKind::Arrival) {
            Some(first) => crossings.rotate_left(first),
            None => {
                warn!("{} leaves the box but never enters it", face);
                return false;
            }
        }
        let alternating = crossings.len() % 2 == 0
            && crossings.iter().tuples().all(|(a, d): (&BoxCrossing, &BoxCrossing)| {
                a.kind == CrossingKind::Arrival && d.kind == CrossingKind::Departure
            });
        if !alternating {
            warn!("{} crosses the box inconsistently: {:?}", face, crossings);
            return false;
        }

        let mut success = true;
        for (arrival, departure) in crossings.iter().tuples::<(_, _)>() {
            success &= self
                .diagram
                .join_along_box(face, arrival.half_edge, departure.half_edge, bbox);
        }
        success
    }
}

fn margin(bbox: &BoundingBox) -> f64 {
    let extent = bbox.width().max(bbox.height());
    if extent > 0. {
        0.1 * extent
    } else {
        1.
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use geo::Coordinate;

    use super::*;
    use crate::geometry::Point;

    fn pt(x: f64, y: f64) -> Point {
        Coordinate { x, y }
    }

    #[test]
    fn test_bound_two_sites() {
        let mut sweep = Sweep::new(vec![pt(0., 0.), pt(10., 0.)]);
        sweep.run();
        assert!(sweep.bound(Some(BoundingBox::new(-5., -5., 15., 5.))));
        let diagram = sweep.finish();
        for face in diagram.face_keys() {
            assert!(diagram.is_face_closed(face));
            assert_relative_eq!(diagram.face_area(face).unwrap(), 100.);
        }
        let bisectors: Vec<_> = diagram
            .half_edges()
            .iter()
            .filter(|half_edge| half_edge.twin.is_some())
            .collect();
        assert_eq!(bisectors.len(), 2);
    }

    #[test]
    fn test_auto_box_contains_everything() {
        let mut sweep = Sweep::new(vec![pt(0., 0.), pt(4., 1.), pt(1., 5.), pt(-3., 2.)]);
        sweep.run();
        assert!(sweep.bound(None));
        let diagram = sweep.finish();
        let bbox = BoundingBox::from_points(diagram.vertices().iter().map(|v| v.point)).unwrap();
        for site in diagram.sites() {
            assert!(bbox.contains(site.point));
            assert!(diagram.face_contains(site.face, site.point));
        }
    }

    #[test]
    fn test_small_box_is_enlarged() {
        let mut sweep = Sweep::new(vec![pt(0., 0.), pt(10., 0.), pt(5., 8.)]);
        sweep.run();
        let requested = BoundingBox::new(0., 0., 1., 1.);
        assert!(sweep.bound(Some(requested)));
        let used = sweep.bounding_box().unwrap();
        assert_ne!(used, requested);
        let diagram = sweep.finish();
        for site in diagram.sites() {
            assert!(used.contains(site.point));
        }
        for face in diagram.face_keys() {
            assert!(diagram.is_face_closed(face));
        }
    }

    #[test]
    fn test_large_enough_box_is_kept() {
        let mut sweep = Sweep::new(vec![pt(0., 0.), pt(10., 0.), pt(5., 8.)]);
        sweep.run();
        assert_eq!(sweep.bounding_box(), None);
        let requested = BoundingBox::new(-20., -20., 30., 30.);
        assert!(sweep.bound(Some(requested)));
        assert_eq!(sweep.bounding_box(), Some(requested));
    }

    #[test]
    fn test_single_site_cannot_be_bounded() {
        let mut sweep = Sweep::new(vec![pt(1., 1.)]);
        sweep.run();
        assert!(!sweep.bound(None));
    }

    #[test]
    #[should_panic(expected = "sweep is done")]
    fn test_bound_requires_finished_sweep() {
        let mut sweep = Sweep::new(vec![pt(0., 0.), pt(1., 1.)]);
        let _ = sweep.bound(None);
    }

    #[test]
    fn test_margin() {
        assert_relative_eq!(margin(&BoundingBox::new(0., 0., 10., 4.)), 1.);
        assert_relative_eq!(margin(&BoundingBox::new(2., 2., 2., 2.)), 1.);
    }
}
