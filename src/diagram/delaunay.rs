//! The Delaunay dual and the convex hull of the sites.
use geo::kernels::{HasKernel, Kernel, Orientation};
use smallvec::SmallVec;

use super::{Diagram, VertexKey};
use crate::geometry::Point;

type Ker = <f64 as HasKernel>::Ker;

/// Delaunay triangulation, by site index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    /// Sorted indices of the sites sharing an edge with each site.
    pub neighbors: Vec<Vec<usize>>,
    /// Counter-clockwise triangles.
    pub triangles: Vec<[usize; 3]>,
}

impl Diagram {
    /// Dual of the diagram.
    ///
    /// Neighbours come from twin half-edges. Each vertex with at least
    /// three incident faces yields the triangles of the polygon of
    /// their sites: one for a vertex in general position, a fan for
    /// cocircular sites. Vertices on a bounding box have fewer faces
    /// and are skipped.
    pub fn delaunay(&self) -> Triangulation {
        let mut neighbors = vec![vec![]; self.sites.len()];
        for half_edge in &self.half_edges {
            if let Some(twin) = half_edge.twin {
                let site = self[half_edge.face].site;
                neighbors[site].push(self[self[twin].face].site);
            }
        }
        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        let mut incident: Vec<SmallVec<[usize; 3]>> = vec![SmallVec::new(); self.vertices.len()];
        for half_edge in &self.half_edges {
            if let Some(dest) = half_edge.dest {
                let site = self[half_edge.face].site;
                if !incident[dest.0].contains(&site) {
                    incident[dest.0].push(site);
                }
            }
        }

        let mut triangles = vec![];
        for (vertex, sites) in incident.iter_mut().enumerate() {
            if sites.len() < 3 {
                continue;
            }
            let center = self[VertexKey(vertex)].point;
            sites.sort_by(|&a, &b| {
                let angle = |site: usize| {
                    let p = self.sites[site].point;
                    (p.y - center.y).atan2(p.x - center.x)
                };
                angle(a).total_cmp(&angle(b))
            });
            for pair in sites[1..].windows(2) {
                let triangle = [sites[0], pair[0], pair[1]];
                let [a, b, c] = triangle.map(|site| self.sites[site].point);
                if Ker::orient2d(a, b, c) == Orientation::CounterClockwise {
                    triangles.push(triangle);
                }
            }
        }

        Triangulation {
            neighbors,
            triangles,
        }
    }

    /// Indices of the sites on the convex hull, counter-clockwise from
    /// the lowest of the leftmost sites. Collinear sites are dropped.
    ///
    /// # Panics
    ///
    /// If there are fewer than four sites.
    pub fn convex_hull(&self) -> Vec<usize> {
        assert!(
            self.sites.len() >= 4,
            "convex hull requires at least four sites"
        );
        let point = |index: usize| -> Point { self.sites[index].point };
        let mut order: Vec<usize> = (0..self.sites.len()).collect();
        order.sort_by(|&a, &b| {
            let (p, q) = (point(a), point(b));
            p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y))
        });

        let mut hull: Vec<usize> = Vec::with_capacity(order.len() + 1);
        let push = |hull: &mut Vec<usize>, lower_len: usize, index: usize| {
            while hull.len() > lower_len + 1 {
                let (a, b) = (hull[hull.len() - 2], hull[hull.len() - 1]);
                if Ker::orient2d(point(a), point(b), point(index)) == Orientation::CounterClockwise {
                    break;
                }
                hull.pop();
            }
            hull.push(index);
        };
        for &index in &order {
            push(&mut hull, 0, index);
        }
        let lower_len = hull.len() - 1;
        for &index in order.iter().rev().skip(1) {
            push(&mut hull, lower_len, index);
        }
        // The last point repeats the first.
        hull.pop();
        hull
    }
}
