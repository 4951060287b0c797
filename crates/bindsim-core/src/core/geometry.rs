use nalgebra::{Point2, Vector2};
use rand::Rng;
use std::f64::consts::TAU;

/// The rectangular simulation area, spanning `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
}

impl Arena {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if a disc of the given radius centred at `position` lies fully inside.
    pub fn contains_disc(&self, position: &Point2<f64>, radius: f64) -> bool {
        position.x - radius >= 0.0
            && position.x + radius <= self.width
            && position.y - radius >= 0.0
            && position.y + radius <= self.height
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Samples a position whose disc of `radius` fits inside the arena.
    ///
    /// On an axis too short to hold the disc, the coordinate falls back to the centre of that axis.
    pub fn sample_position<R: Rng + ?Sized>(&self, radius: f64, rng: &mut R) -> Point2<f64> {
        Point2::new(
            sample_axis(self.width, radius, rng),
            sample_axis(self.height, radius, rng),
        )
    }
}

fn sample_axis<R: Rng + ?Sized>(extent: f64, radius: f64, rng: &mut R) -> f64 {
    let (low, high) = (radius, extent - radius);
    if low < high {
        rng.random_range(low..=high)
    } else {
        extent / 2.0
    }
}

/// Draws a direction uniformly distributed on the unit circle.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vector2<f64> {
    let angle = rng.random_range(0.0..TAU);
    Vector2::new(angle.cos(), angle.sin())
}
