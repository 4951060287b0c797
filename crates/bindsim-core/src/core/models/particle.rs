use crate::core::geometry::Arena;
use nalgebra::{Point2, Vector2};
use rand::Rng;
use std::fmt;

/// Radius of every protein, in arena units.
pub const PROTEIN_RADIUS: f64 = 15.0;
/// Radius of every ligand, normal or competitor, in arena units.
pub const LIGAND_RADIUS: f64 = 6.0;

/// Distinguishes the two ligand species competing for the same binding sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LigandVariant {
    /// The ligand of interest, binding with rate `k_on`.
    Normal,
    /// A competing ligand, binding with rate `k_on_competitor`.
    Competitor,
}

/// The kind of a particle, replacing a class hierarchy with a tagged variant.
///
/// All kinds share the kinematics of [`Particle`]; they differ only in radius and in
/// the role they play in the binding state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    Protein,
    Ligand(LigandVariant),
}

impl ParticleKind {
    pub fn radius(self) -> f64 {
        match self {
            ParticleKind::Protein => PROTEIN_RADIUS,
            ParticleKind::Ligand(_) => LIGAND_RADIUS,
        }
    }
}

impl fmt::Display for LigandVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LigandVariant::Normal => write!(f, "Normal"),
            LigandVariant::Competitor => write!(f, "Competitor"),
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticleKind::Protein => write!(f, "Protein"),
            ParticleKind::Ligand(variant) => write!(f, "{} Ligand", variant),
        }
    }
}

/// Kinematic state shared by every particle in the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Centre of the particle in arena coordinates.
    pub position: Point2<f64>,
    /// Velocity, set by unbinding kicks and reflected at walls.
    pub velocity: Vector2<f64>,
    /// Radius of the particle; always positive.
    pub radius: f64,
}

impl Particle {
    /// Creates a particle at rest.
    pub fn new(position: Point2<f64>, radius: f64) -> Self {
        debug_assert!(radius > 0.0, "particle radius must be positive");
        Self {
            position,
            velocity: Vector2::zeros(),
            radius,
        }
    }

    /// Applies one explicit random-walk step.
    ///
    /// Each coordinate is displaced by an independent uniform draw from `[-1, 1]`, scaled by
    /// `sqrt(temperature * dt)`. This is an approximation of diffusion, not Langevin dynamics;
    /// no diffusion coefficient is calibrated.
    pub fn move_brownian<R: Rng + ?Sized>(&mut self, dt: f64, temperature: f64, rng: &mut R) {
        let displacement = Vector2::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        let scale = (temperature * dt).max(0.0).sqrt();
        self.position += displacement * scale;
    }

    /// Reflects the particle off the arena walls.
    ///
    /// Each axis is checked once: if the disc crosses the lower bound it is clamped to
    /// `radius`, otherwise if it crosses the upper bound it is clamped to `extent - radius`,
    /// and the velocity component on that axis is negated. Returns `true` if any axis was
    /// corrected.
    pub fn check_wall_collision_and_bounce(&mut self, arena: &Arena) -> bool {
        let hit_x = reflect_axis(
            &mut self.position.x,
            &mut self.velocity.x,
            self.radius,
            arena.width,
        );
        let hit_y = reflect_axis(
            &mut self.position.y,
            &mut self.velocity.y,
            self.radius,
            arena.height,
        );
        hit_x || hit_y
    }

    pub fn distance_to(&self, other: &Particle) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Returns `true` if the two discs intersect.
    pub fn overlaps(&self, other: &Particle) -> bool {
        self.distance_to(other) < self.radius + other.radius
    }
}

fn reflect_axis(position: &mut f64, velocity: &mut f64, radius: f64, extent: f64) -> bool {
    if *position - radius < 0.0 {
        *position = radius;
    } else if *position + radius > extent {
        *position = extent - radius;
    } else {
        return false;
    }
    *velocity = -*velocity;
    true
}
