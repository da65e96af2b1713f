//! Reclaiming the slots of removed vertices and half-edges.
use log::debug;

use super::{Diagram, HalfEdgeKey, VertexKey};

/// Compact `items` in place, keeping those flagged in `live`.
///
/// Dead slots near the front are filled with live items taken from
/// the back, then the vector is truncated. Returns the new position
/// of every old position (`None` for dead items).
pub(crate) fn swap_compact<T>(items: &mut Vec<T>, live: &[bool]) -> Vec<Option<usize>> {
    debug_assert_eq!(items.len(), live.len());
    let mut remap: Vec<Option<usize>> = live
        .iter()
        .enumerate()
        .map(|(index, &alive)| if alive { Some(index) } else { None })
        .collect();

    let (mut front, mut back) = (0, items.len());
    loop {
        while front < back && live[front] {
            front += 1;
        }
        while back > front && !live[back - 1] {
            back -= 1;
        }
        if front >= back {
            break;
        }
        // `front` is dead and `back - 1` is live.
        items.swap(front, back - 1);
        remap[back - 1] = Some(front);
        front += 1;
        back -= 1;
    }
    items.truncate(front);
    remap
}

impl Diagram {
    /// Drop the vertices and half-edges not flagged live, rewriting
    /// every reference. References to dropped elements become `None`.
    pub(crate) fn compact(&mut self, live_vertices: &[bool], live_half_edges: &[bool]) {
        let (vertices, half_edges) = (self.vertices.len(), self.half_edges.len());
        let vertex_map = swap_compact(&mut self.vertices, live_vertices);
        let half_edge_map = swap_compact(&mut self.half_edges, live_half_edges);

        let vertex = |key: Option<VertexKey>| key.and_then(|v| vertex_map[v.0]).map(VertexKey);
        let half_edge =
            |key: Option<HalfEdgeKey>| key.and_then(|e| half_edge_map[e.0]).map(HalfEdgeKey);
        for edge in &mut self.half_edges {
            edge.orig = vertex(edge.orig);
            edge.dest = vertex(edge.dest);
            edge.twin = half_edge(edge.twin);
            edge.prev = half_edge(edge.prev);
            edge.next = half_edge(edge.next);
        }
        for face in &mut self.faces {
            face.half_edge = half_edge(face.half_edge);
        }
        debug!(
            "compacted diagram: {} -> {} vertices, {} -> {} half-edges",
            vertices,
            self.vertices.len(),
            half_edges,
            self.half_edges.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use geo::Coordinate;

    use super::*;

    #[test]
    fn test_swap_compact() {
        let mut items = vec!['a', 'b', 'c', 'd', 'e', 'f'];
        let live = [false, true, false, true, true, false];
        let remap = swap_compact(&mut items, &live);
        assert_eq!(items, vec!['e', 'b', 'd']);
        assert_eq!(remap, vec![None, Some(1), None, Some(2), Some(0), None]);

        let mut empty: Vec<u8> = vec![1, 2];
        assert_eq!(swap_compact(&mut empty, &[false, false]), vec![None, None]);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_compact_rewrites_references() {
        let mut diagram = Diagram::with_capacity(2);
        let f0 = diagram.add_site(Coordinate { x: 0., y: 0. });
        let f1 = diagram.add_site(Coordinate { x: 1., y: 0. });
        let (dead, _) = diagram.create_twins(f0, f1);
        let (a, b) = diagram.create_twins(f0, f1);
        let v = diagram.create_vertex(Coordinate { x: 0.5, y: 1. });
        let w = diagram.create_vertex(Coordinate { x: 0.5, y: -1. });
        diagram.half_edge_mut(a).dest = Some(v);
        diagram.half_edge_mut(b).orig = Some(v);
        diagram.half_edge_mut(b).dest = Some(w);
        diagram.link(a, dead);

        diagram.compact(&[true, false], &[false, false, true, true]);
        assert_eq!(diagram.half_edges().len(), 2);
        assert_eq!(diagram.vertices().len(), 1);

        // Filled from the back: `b` moves first.
        let (a, b) = (HalfEdgeKey(1), HalfEdgeKey(0));
        assert_eq!(diagram[a].face, f0);
        assert_eq!(diagram[a].twin, Some(b));
        assert_eq!(diagram[b].twin, Some(a));
        assert_eq!(diagram[a].dest, Some(VertexKey(0)));
        assert_eq!(diagram[b].dest, None);
        assert_eq!(diagram[a].next, None);
        assert_eq!(diagram[f0].half_edge, None);
    }
}
