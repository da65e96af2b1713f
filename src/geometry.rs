//! Vector helpers on [`Coordinate`] and the axis-aligned [`BoundingBox`]
//! used to bound and clip diagrams.
use geo::{Coordinate, Rect};
use smallvec::SmallVec;

use crate::utils::{self, Tolerance};

/// Points and vectors of the plane.
pub type Point = Coordinate<f64>;

/// Vector operations missing from [`Coordinate`].
///
/// Addition, subtraction and scaling are provided by `geo` itself.
pub trait Vector2: Copy {
    fn dot(self, other: Self) -> f64;

    /// The 2d cross product `self.x * other.y - self.y * other.x`.
    fn det(self, other: Self) -> f64;

    fn norm(self) -> f64;

    fn dist(self, other: Self) -> f64;

    /// Rotation by a quarter turn counter-clockwise.
    fn ortho(self) -> Self;

    /// Component-wise equality up to a tolerance relative to the
    /// magnitude of the coordinates.
    ///
    /// Far from the origin this merges points a figure of small extent
    /// would tell apart.
    fn approx_eq(self, other: Self) -> bool;
}

impl Vector2 for Coordinate<f64> {
    #[inline]
    fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    fn det(self, other: Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    fn dist(self, other: Self) -> f64 {
        (self - other).norm()
    }

    #[inline]
    fn ortho(self) -> Self {
        Coordinate {
            x: -self.y,
            y: self.x,
        }
    }

    #[inline]
    fn approx_eq(self, other: Self) -> bool {
        utils::eq(self.x, other.x) && utils::eq(self.y, other.y)
    }
}

/// Center of the circle through three points.
///
/// Intersects the perpendicular bisectors of `(p1, p2)` and `(p2,
/// p3)`. Returns `None` when they are parallel, which includes
/// collinear and coincident inputs.
pub(crate) fn convergence_point(p1: Point, p2: Point, p3: Point) -> Option<Point> {
    let v1 = (p1 - p2).ortho();
    let v2 = (p2 - p3).ortho();
    let scale = v1.norm() * v2.norm();
    if !(scale > 0.) {
        return None;
    }
    let denom = v1.det(v2);
    if utils::is_zero(denom / scale) {
        return None;
    }
    let delta = (p3 - p1) * 0.5;
    let t = delta.det(v2) / denom;
    Some((p1 + p2) * 0.5 + v1 * t)
}

/// Sides of a [`BoundingBox`] in counter-clockwise order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left = 0,
    Bottom = 1,
    Right = 2,
    Top = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Bottom, Side::Right, Side::Top];

    /// The side following this one counter-clockwise.
    pub fn next(self) -> Side {
        Side::ALL[(self as usize + 1) % 4]
    }
}

/// Intersection of a ray with the boundary of a [`BoundingBox`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxHit {
    pub side: Side,
    pub point: Point,
}

/// An axis-aligned rectangle.
///
/// The boundary is parametrized counter-clockwise over `[0, 4)`:
/// side `k` covers `[k, k + 1)` and starts at [`corner`](Self::corner)
/// `k`. So the left side runs from the top-left corner down, the
/// bottom side from the bottom-left corner to the right, and so on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
}

impl BoundingBox {
    pub fn new(left: f64, bottom: f64, right: f64, top: f64) -> Self {
        assert!(
            left <= right && bottom <= top,
            "bounding box requires left <= right and bottom <= top"
        );
        BoundingBox {
            left,
            bottom,
            right,
            top,
        }
    }

    /// Smallest box containing all the finite points of `iter`.
    pub fn from_points<I: IntoIterator<Item = Point>>(iter: I) -> Option<Self> {
        let mut iter = iter
            .into_iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite());
        let first = iter.next()?;
        let mut bbox = BoundingBox::new(first.x, first.y, first.x, first.y);
        for p in iter {
            bbox.expand_to(p);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    pub fn center(&self) -> Point {
        Coordinate {
            x: (self.left + self.right) / 2.,
            y: (self.bottom + self.top) / 2.,
        }
    }

    /// Grow the box to include `p`; returns `true` if it grew.
    pub fn expand_to(&mut self, p: Point) -> bool {
        let before = *self;
        self.left = self.left.min(p.x);
        self.bottom = self.bottom.min(p.y);
        self.right = self.right.max(p.x);
        self.top = self.top.max(p.y);
        before != *self
    }

    #[must_use]
    pub fn padded(&self, margin: f64) -> Self {
        BoundingBox::new(
            self.left - margin,
            self.bottom - margin,
            self.right + margin,
            self.top + margin,
        )
    }

    /// Tolerance for points on or near this box.
    pub(crate) fn tolerance(&self) -> Tolerance {
        Tolerance::for_extent(self.width().max(self.height()))
    }

    /// Inclusive containment, up to the box's tolerance.
    pub fn contains(&self, p: Point) -> bool {
        let eps = self.tolerance().value();
        p.x >= self.left - eps
            && p.x <= self.right + eps
            && p.y >= self.bottom - eps
            && p.y <= self.top + eps
    }

    pub fn clamp(&self, p: Point) -> Point {
        Coordinate {
            x: p.x.max(self.left).min(self.right),
            y: p.y.max(self.bottom).min(self.top),
        }
    }

    /// Counter-clockwise start of `side`.
    pub fn corner(&self, side: Side) -> Point {
        let (x, y) = match side {
            Side::Left => (self.left, self.top),
            Side::Bottom => (self.left, self.bottom),
            Side::Right => (self.right, self.bottom),
            Side::Top => (self.right, self.top),
        };
        Coordinate { x, y }
    }

    /// First point where the ray from `origin` along `direction`
    /// leaves the box.
    ///
    /// The vertical side facing `direction` is tried first, then the
    /// horizontal one, and the nearer wins. The returned point is
    /// clamped onto the box. Returns `None` for a null direction, or
    /// if the box lies behind `origin`.
    pub fn ray_exit(&self, origin: Point, direction: Point) -> Option<BoxHit> {
        let mut best: Option<(f64, Side)> = None;
        if direction.x > 0. {
            best = Some(((self.right - origin.x) / direction.x, Side::Right));
        } else if direction.x < 0. {
            best = Some(((self.left - origin.x) / direction.x, Side::Left));
        }
        let vertical = if direction.y > 0. {
            Some(((self.top - origin.y) / direction.y, Side::Top))
        } else if direction.y < 0. {
            Some(((self.bottom - origin.y) / direction.y, Side::Bottom))
        } else {
            None
        };
        if let Some((u, side)) = vertical {
            match best {
                Some((t, _)) if t <= u => {}
                _ => best = Some((u, side)),
            }
        }

        let (t, side) = best?;
        if utils::lt(t, 0.) {
            return None;
        }
        Some(BoxHit {
            side,
            point: self.clamp(origin + direction * t.max(0.)),
        })
    }

    /// Clip the segment `a -> b` to the box (Liang-Barsky).
    ///
    /// Returns the clamped end-points of the part inside, if any.
    pub fn clip_segment(&self, a: Point, b: Point) -> Option<(Point, Point)> {
        let d = b - a;
        let mut t0 = 0.;
        let mut t1 = 1.;
        let checks = [
            (-d.x, a.x - self.left),
            (d.x, self.right - a.x),
            (-d.y, a.y - self.bottom),
            (d.y, self.top - a.y),
        ];
        for (p, q) in checks {
            if p == 0. {
                if utils::lt(q, 0.) {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0. {
                if r > t1 {
                    return None;
                }
                if r > t0 {
                    t0 = r;
                }
            } else {
                if r < t0 {
                    return None;
                }
                if r < t1 {
                    t1 = r;
                }
            }
        }
        Some((self.clamp(a + d * t0), self.clamp(a + d * t1)))
    }

    /// The side nearest to `p`; earlier sides win ties.
    pub fn side_of(&self, p: Point) -> Side {
        let distances = [
            (p.x - self.left).abs(),
            (p.y - self.bottom).abs(),
            (self.right - p.x).abs(),
            (self.top - p.y).abs(),
        ];
        let mut side = Side::Left;
        for (candidate, &dist) in Side::ALL.iter().zip(distances.iter()) {
            if dist < distances[side as usize] {
                side = *candidate;
            }
        }
        side
    }

    /// Position of `p` (projected onto the boundary) along the
    /// counter-clockwise perimeter, in `[0, 4)`.
    pub fn perimeter_param(&self, p: Point) -> f64 {
        fn ratio(num: f64, den: f64) -> f64 {
            if den > 0. {
                (num / den).max(0.).min(1.)
            } else {
                0.
            }
        }

        let p = self.clamp(p);
        let (w, h) = (self.width(), self.height());
        let param = match self.side_of(p) {
            Side::Left => ratio(self.top - p.y, h),
            Side::Bottom => 1. + ratio(p.x - self.left, w),
            Side::Right => 2. + ratio(p.y - self.bottom, h),
            Side::Top => 3. + ratio(self.right - p.x, w),
        };
        if param >= 4. {
            param - 4.
        } else {
            param
        }
    }

    /// Corners met walking counter-clockwise from perimeter parameter
    /// `from` to `to`, exclusive of both ends.
    pub fn corners_between(&self, from: f64, to: f64) -> SmallVec<[Point; 4]> {
        let end = if to < from { to + 4. } else { to };
        (1..8)
            .filter(|&k| utils::between(k as f64, from, end))
            .map(|k| self.corner(Side::ALL[k % 4]))
            .collect()
    }
}

impl From<Rect<f64>> for BoundingBox {
    fn from(rect: Rect<f64>) -> Self {
        BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }
}

impl From<BoundingBox> for Rect<f64> {
    fn from(bbox: BoundingBox) -> Self {
        Rect::new(
            Coordinate {
                x: bbox.left,
                y: bbox.bottom,
            },
            Coordinate {
                x: bbox.right,
                y: bbox.top,
            },
        )
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
    fn test_vector_ops() {
        let a = pt(3., 4.);
        assert_relative_eq!(a.norm(), 5.);
        assert_eq!(a.ortho(), pt(-4., 3.));
        assert_relative_eq!(a.det(a.ortho()), 25.);
        assert_relative_eq!(a.dot(a.ortho()), 0.);
        assert_relative_eq!(a.dist(pt(0., 0.)), 5.);
        assert!(a.approx_eq(pt(3. + 1e-12, 4.)));
    }

    #[test]
    fn test_convergence_point() {
        let c = convergence_point(pt(0., 0.), pt(10., 0.), pt(0., 10.)).unwrap();
        assert!(c.approx_eq(pt(5., 5.)));

        let c = convergence_point(pt(-1., 0.), pt(0., 1.), pt(1., 0.)).unwrap();
        assert!(c.approx_eq(pt(0., 0.)));

        assert!(convergence_point(pt(0., 0.), pt(5., 0.), pt(10., 0.)).is_none());
        assert!(convergence_point(pt(0., 0.), pt(0., 0.), pt(10., 3.)).is_none());
    }

    #[test]
    fn test_ray_exit() {
        let bbox = BoundingBox::new(-5., -5., 15., 5.);
        let hit = bbox.ray_exit(pt(5., 0.), pt(0., -10.)).unwrap();
        assert_eq!(hit.side, Side::Bottom);
        assert!(hit.point.approx_eq(pt(5., -5.)));

        let hit = bbox.ray_exit(pt(5., 0.), pt(1., 1.)).unwrap();
        assert_eq!(hit.side, Side::Top);
        assert!(hit.point.approx_eq(pt(10., 5.)));

        let hit = bbox.ray_exit(pt(5., 0.), pt(-1., 0.)).unwrap();
        assert_eq!(hit.side, Side::Left);
        assert!(hit.point.approx_eq(pt(-5., 0.)));

        assert!(bbox.ray_exit(pt(5., 0.), pt(0., 0.)).is_none());
        // Box entirely behind the origin.
        assert!(bbox.ray_exit(pt(20., 0.), pt(1., 0.)).is_none());
    }

    #[test]
    fn test_clip_segment() {
        let bbox = BoundingBox::new(0., 0., 10., 10.);

        let (a, b) = bbox.clip_segment(pt(2., 2.), pt(8., 8.)).unwrap();
        assert!(a.approx_eq(pt(2., 2.)) && b.approx_eq(pt(8., 8.)));

        let (a, b) = bbox.clip_segment(pt(-5., 5.), pt(15., 5.)).unwrap();
        assert!(a.approx_eq(pt(0., 5.)) && b.approx_eq(pt(10., 5.)));

        let (a, b) = bbox.clip_segment(pt(5., 5.), pt(5., 20.)).unwrap();
        assert!(a.approx_eq(pt(5., 5.)) && b.approx_eq(pt(5., 10.)));

        assert!(bbox.clip_segment(pt(-5., -5.), pt(-1., 20.)).is_none());
        assert!(bbox.clip_segment(pt(11., 0.), pt(11., 10.)).is_none());
    }

    #[test]
    fn test_perimeter() {
        let bbox = BoundingBox::new(0., 0., 10., 10.);
        assert_relative_eq!(bbox.perimeter_param(pt(0., 10.)), 0.);
        assert_relative_eq!(bbox.perimeter_param(pt(0., 5.)), 0.5);
        assert_relative_eq!(bbox.perimeter_param(pt(0., 0.)), 1.);
        assert_relative_eq!(bbox.perimeter_param(pt(5., 0.)), 1.5);
        assert_relative_eq!(bbox.perimeter_param(pt(10., 5.)), 2.5);
        assert_relative_eq!(bbox.perimeter_param(pt(5., 10.)), 3.5);

        for side in Side::ALL {
            assert_relative_eq!(bbox.perimeter_param(bbox.corner(side)), side as usize as f64);
            assert_eq!(side.next().next().next().next(), side);
        }

        let corners = bbox.corners_between(0.5, 2.5);
        assert_eq!(corners.as_slice(), &[pt(0., 0.), pt(10., 0.)]);

        // Wraps past the top-left corner.
        let corners = bbox.corners_between(3.5, 1.5);
        assert_eq!(corners.as_slice(), &[pt(0., 10.), pt(0., 0.)]);

        // End-points on corners are not repeated.
        assert!(bbox.corners_between(1., 2.).is_empty());
        assert!(bbox.corners_between(1.2, 1.7).is_empty());
    }

    #[test]
    fn test_box_utilities() {
        let mut bbox = BoundingBox::from_points(vec![pt(1., 2.), pt(-3., 4.), pt(0., f64::NAN)])
            .unwrap();
        assert_eq!(bbox, BoundingBox::new(-3., 2., 1., 4.));
        assert!(!bbox.expand_to(pt(0., 3.)));
        assert!(bbox.expand_to(pt(5., 3.)));
        assert_relative_eq!(bbox.width(), 8.);
        assert!(bbox.contains(pt(5., 4.)));
        assert!(!bbox.contains(pt(5.1, 4.)));
        assert_eq!(bbox.clamp(pt(9., 9.)), pt(5., 4.));
        assert_eq!(bbox.padded(1.), BoundingBox::new(-4., 1., 6., 5.));

        let rect: Rect<f64> = bbox.into();
        assert_eq!(BoundingBox::from(rect), bbox);

        // Containment slack follows the box size, not its position.
        let far = BoundingBox::new(1e6, 1e6, 1e6 + 1., 1e6 + 1.);
        assert!(far.contains(pt(1e6 + 1., 1e6 + 0.5)));
        assert!(!far.contains(pt(1e6 + 1. + 1e-4, 1e6 + 0.5)));
    }
}
