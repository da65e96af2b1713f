use log::{debug, warn};

use super::{queries::polygon_contains, Diagram, FaceKey, HalfEdgeKey, VertexKey};
use crate::{
    geometry::{BoundingBox, Point, Side},
    utils::Tolerance,
};

/// Outcome of clipping one half-edge.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Clipped {
    Pending,
    Kept { orig: VertexKey, dest: VertexKey },
    Removed,
}

impl Diagram {
    /// Restrict the diagram to `bbox`.
    ///
    /// Requires a bounded diagram: returns `false`, leaving the diagram
    /// untouched, if a face with a boundary is not closed. Parts of
    /// edges outside the box are removed, and each face is closed
    /// again along the box. A face without any edge inside the box
    /// becomes the whole box if it contains the box, and is emptied
    /// otherwise.
    #[must_use]
    pub fn clip(&mut self, bbox: &BoundingBox) -> bool {
        if let Some(face) = self
            .face_keys()
            .find(|&face| self[face].half_edge.is_some() && !self.is_face_closed(face))
        {
            warn!("cannot clip: {} is not closed", face);
            return false;
        }

        let num_half_edges = self.half_edges.len();
        let mut state = vec![Clipped::Pending; num_half_edges];
        let (mut emptied, mut filled) = (0, 0);
        for face in self.face_keys() {
            let cycle: Vec<_> = self.face_half_edges(face).collect();
            if cycle.is_empty() {
                continue;
            }

            let mut kept = vec![];
            for &key in &cycle {
                let clipped = self.clip_half_edge(key, bbox, &state);
                state[key.0] = clipped;
                if let Clipped::Kept { .. } = clipped {
                    kept.push(key);
                }
            }

            if kept.is_empty() {
                let points: Vec<Point> = cycle
                    .iter()
                    .filter_map(|&key| self[key].orig.map(|v| self[v].point))
                    .collect();
                if polygon_contains(&points, bbox.center()) {
                    self.fill_with_box(face, bbox);
                    filled += 1;
                } else {
                    self.face_mut(face).half_edge = None;
                    emptied += 1;
                }
                continue;
            }

            for &key in &kept {
                if let Clipped::Kept { orig, dest } = state[key.0] {
                    let half_edge = self.half_edge_mut(key);
                    half_edge.orig = Some(orig);
                    half_edge.dest = Some(dest);
                }
            }
            for (index, &from) in kept.iter().enumerate() {
                let to = kept[(index + 1) % kept.len()];
                let joined = self.join_along_box(face, from, to, bbox);
                debug_assert!(joined, "kept half-edges have both end-points");
            }
            self.face_mut(face).half_edge = Some(kept[0]);
        }

        let live_half_edges: Vec<bool> = (0..self.half_edges.len())
            .map(|index| index >= num_half_edges || matches!(state[index], Clipped::Kept { .. }))
            .collect();
        let mut live_vertices = vec![false; self.vertices.len()];
        for (half_edge, &live) in self.half_edges.iter().zip(&live_half_edges) {
            if live {
                for vertex in half_edge.orig.iter().chain(half_edge.dest.iter()) {
                    live_vertices[vertex.0] = true;
                }
            }
        }
        self.compact(&live_vertices, &live_half_edges);
        debug!(
            "clipped diagram to {:?}: {} faces filled, {} emptied",
            bbox, filled, emptied
        );
        true
    }

    fn clip_half_edge(&mut self, key: HalfEdgeKey, bbox: &BoundingBox, state: &[Clipped]) -> Clipped {
        let half_edge = &self[key];
        if let Some(twin) = half_edge.twin {
            match state[twin.0] {
                Clipped::Kept { orig, dest } => {
                    return Clipped::Kept {
                        orig: dest,
                        dest: orig,
                    }
                }
                Clipped::Removed => return Clipped::Removed,
                Clipped::Pending => {}
            }
        }

        let (orig, dest) = match (half_edge.orig, half_edge.dest) {
            (Some(orig), Some(dest)) => (orig, dest),
            _ => return Clipped::Removed,
        };
        let (a, b) = (self[orig].point, self[dest].point);
        let tolerance = bbox.tolerance();
        match bbox.clip_segment(a, b) {
            Some((p, q)) if !tolerance.approx_eq(p, q) => Clipped::Kept {
                orig: self.clipped_vertex(orig, p, tolerance),
                dest: self.clipped_vertex(dest, q, tolerance),
            },
            _ => Clipped::Removed,
        }
    }

    /// `vertex` if it is at `point`, or a new vertex there.
    fn clipped_vertex(&mut self, vertex: VertexKey, point: Point, tolerance: Tolerance) -> VertexKey {
        if tolerance.approx_eq(self[vertex].point, point) {
            vertex
        } else {
            self.create_vertex(point)
        }
    }

    fn fill_with_box(&mut self, face: FaceKey, bbox: &BoundingBox) {
        let corners: Vec<_> = Side::ALL
            .iter()
            .map(|&side| self.create_vertex(bbox.corner(side)))
            .collect();
        let edges: Vec<_> = (0..4)
            .map(|index| {
                let key = self.create_half_edge(face);
                let half_edge = self.half_edge_mut(key);
                half_edge.orig = Some(corners[index]);
                half_edge.dest = Some(corners[(index + 1) % 4]);
                key
            })
            .collect();
        for index in 0..4 {
            self.link(edges[index], edges[(index + 1) % 4]);
        }
        self.face_mut(face).half_edge = Some(edges[0]);
    }
}
