//! Read-only queries on faces.
use geo::{LineString, Polygon};
use itertools::Itertools;

use super::{Diagram, FaceKey, HalfEdgeKey};
use crate::{
    geometry::{Point, Vector2},
    utils,
};

/// Iterator over the boundary of a face, following `next` links.
///
/// If the boundary is an open chain, iteration starts from its first
/// half-edge. Created by [`Diagram::face_half_edges`].
pub struct FaceHalfEdges<'a> {
    diagram: &'a Diagram,
    first: Option<HalfEdgeKey>,
    current: Option<HalfEdgeKey>,
    budget: usize,
}

impl<'a> Iterator for FaceHalfEdges<'a> {
    type Item = HalfEdgeKey;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        if self.budget == 0 {
            return None;
        }
        self.budget -= 1;
        self.current = self.diagram[current].next.filter(|&n| Some(n) != self.first);
        Some(current)
    }
}

impl Diagram {
    pub fn face_half_edges(&self, face: FaceKey) -> FaceHalfEdges<'_> {
        let budget = self.half_edges.len();
        let first = self[face].half_edge.map(|start| {
            let mut first = start;
            let mut steps = budget;
            loop {
                match self[first].prev {
                    Some(prev) if prev == start => break start,
                    Some(prev) if steps > 0 => {
                        first = prev;
                        steps -= 1;
                    }
                    _ => break first,
                }
            }
        });
        FaceHalfEdges {
            diagram: self,
            first,
            current: first,
            budget,
        }
    }

    /// Whether the boundary of `face` is a cycle of bounded
    /// half-edges.
    pub fn is_face_closed(&self, face: FaceKey) -> bool {
        let start = match self[face].half_edge {
            Some(start) => start,
            None => return false,
        };
        let mut current = start;
        for _ in 0..self.half_edges.len() {
            let half_edge = &self[current];
            if half_edge.orig.is_none() || half_edge.dest.is_none() {
                return false;
            }
            match half_edge.next {
                Some(next) if next == start => return true,
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }

    /// Vertices of a closed face, counter-clockwise.
    pub fn face_points(&self, face: FaceKey) -> Option<Vec<Point>> {
        if !self.is_face_closed(face) {
            return None;
        }
        self.face_half_edges(face)
            .map(|key| self[key].orig.map(|v| self[v].point))
            .collect()
    }

    pub fn face_polygon(&self, face: FaceKey) -> Option<Polygon<f64>> {
        let points = self.face_points(face)?;
        Some(Polygon::new(LineString::from(points), vec![]))
    }

    /// Whether `point` lies inside or on the boundary of `face`.
    ///
    /// Always `false` for a face that is not closed.
    pub fn face_contains(&self, face: FaceKey, point: Point) -> bool {
        self.face_points(face)
            .map_or(false, |points| polygon_contains(&points, point))
    }

    /// Signed area (positive for counter-clockwise boundaries).
    pub fn face_area(&self, face: FaceKey) -> Option<f64> {
        self.face_points(face).map(|points| signed_area(&points))
    }

    pub fn face_centroid(&self, face: FaceKey) -> Option<Point> {
        let points = self.face_points(face)?;
        let area = signed_area(&points);
        if area == 0. || !area.is_finite() {
            return None;
        }
        let origin = points[0];
        let (cx, cy) = points
            .iter()
            .map(|&p| p - origin)
            .circular_tuple_windows()
            .fold((0., 0.), |(cx, cy), (a, b)| {
                let cross = a.det(b);
                (cx + (a.x + b.x) * cross, cy + (a.y + b.y) * cross)
            });
        Some(Point {
            x: origin.x + cx / (6. * area),
            y: origin.y + cy / (6. * area),
        })
    }

    /// First boundary half-edge of `face` hit by the ray from `origin`
    /// along `direction`, with the hit point.
    ///
    /// Half-edges with an unknown end-point, or parallel to the ray,
    /// are ignored.
    pub fn nearest_boundary_intersection(
        &self,
        face: FaceKey,
        origin: Point,
        direction: Point,
    ) -> Option<(HalfEdgeKey, Point)> {
        let mut best: Option<(f64, HalfEdgeKey)> = None;
        for key in self.face_half_edges(face) {
            let (a, b) = match self.segment(key) {
                Some(segment) => segment,
                None => continue,
            };
            let e = b - a;
            let denom = direction.det(e);
            let scale = direction.norm() * e.norm();
            if !(scale > 0.) || utils::is_zero(denom / scale) {
                continue;
            }
            let w = a - origin;
            let t = w.det(e) / denom;
            let s = w.det(direction) / denom;
            if utils::gt_eq(t, 0.) && utils::between_eq(s, 0., 1.) {
                if best.map_or(true, |(best_t, _)| t < best_t) {
                    best = Some((t, key));
                }
            }
        }
        best.map(|(t, key)| (key, origin + direction * t.max(0.)))
    }

    /// One step of Lloyd relaxation: the centroid of each closed face,
    /// or the site itself if its face is not closed.
    pub fn relaxed_sites(&self) -> Vec<Point> {
        self.sites
            .iter()
            .map(|site| self.face_centroid(site.face).unwrap_or(site.point))
            .collect()
    }
}

/// Shoelace sum, taken relative to the first point.
fn signed_area(points: &[Point]) -> f64 {
    let origin = match points.first() {
        Some(&origin) => origin,
        None => return 0.,
    };
    points
        .iter()
        .map(|&p| p - origin)
        .circular_tuple_windows()
        .map(|(a, b)| a.det(b))
        .sum::<f64>()
        / 2.
}

/// Ray-crossing parity test; points on the boundary count as inside.
pub(crate) fn polygon_contains(points: &[Point], p: Point) -> bool {
    let mut inside = false;
    for (a, b) in points.iter().copied().circular_tuple_windows() {
        if utils::eq(a.dist(p) + p.dist(b), a.dist(b)) {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}
