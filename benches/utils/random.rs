use geo::{Coordinate, Rect};

use rand::Rng;
use rand_distr::{Distribution, Normal, Standard};

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

pub fn uniform_sites<R: Rng>(rng: &mut R, bounds: Rect<f64>, count: usize) -> Vec<Coordinate<f64>> {
    (0..count).map(|_| uniform_point(rng, bounds)).collect()
}

/// Sites clustered around the centre of `bounds`, with a standard
/// deviation of a sixth of its size.
#[allow(dead_code)]
pub fn normal_sites<R: Rng>(rng: &mut R, bounds: Rect<f64>, count: usize) -> Vec<Coordinate<f64>> {
    let center = bounds.center();
    let normal_x = Normal::new(center.x, bounds.width() / 6.).expect("finite deviation");
    let normal_y = Normal::new(center.y, bounds.height() / 6.).expect("finite deviation");
    (0..count)
        .map(|_| Coordinate {
            x: normal_x.sample(rng),
            y: normal_y.sample(rng),
        })
        .collect()
}
