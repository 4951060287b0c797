use super::ids::ProteinId;
use super::particle::{LIGAND_RADIUS, Particle};
use crate::core::geometry::random_unit_vector;
use nalgebra::Point2;
use rand::Rng;

pub use super::particle::LigandVariant;

/// Extra gap left between a released ligand and its former protein.
pub const UNBIND_SEPARATION_BUFFER: f64 = 2.0;
/// Lower bound (inclusive) of the outward kick speed given on release.
pub const UNBIND_KICK_MIN: f64 = 1.0;
/// Upper bound (exclusive) of the outward kick speed given on release.
pub const UNBIND_KICK_MAX: f64 = 2.0;

/// A ligand of either species.
///
/// A ligand is free when `bound_to` is `None` and bound to exactly one protein otherwise;
/// there is no separate flag that could disagree with the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Ligand {
    pub particle: Particle,
    pub variant: LigandVariant,
    pub(crate) bound_to: Option<ProteinId>,
}

impl Ligand {
    /// Creates a free ligand at rest.
    pub fn new(variant: LigandVariant, position: Point2<f64>) -> Self {
        Self {
            particle: Particle::new(position, LIGAND_RADIUS),
            variant,
            bound_to: None,
        }
    }

    pub fn bound_to(&self) -> Option<ProteinId> {
        self.bound_to
    }

    pub fn is_bound(&self) -> bool {
        self.bound_to.is_some()
    }

    /// Moves the ligand off the protein it was attached to and clears its binding.
    ///
    /// The ligand is pushed along the protein-to-ligand direction to just outside contact
    /// distance and given an outward kick. When the two centres coincide the direction is
    /// drawn uniformly at random.
    pub(crate) fn detach_from<R: Rng + ?Sized>(&mut self, protein: &Particle, rng: &mut R) {
        let offset = self.particle.position - protein.position;
        let norm = offset.norm();
        let direction = if norm > 0.0 {
            offset / norm
        } else {
            random_unit_vector(rng)
        };

        let separation = protein.radius + self.particle.radius + UNBIND_SEPARATION_BUFFER;
        self.particle.position = protein.position + direction * separation;

        let kick = rng.random_range(UNBIND_KICK_MIN..UNBIND_KICK_MAX);
        self.particle.velocity = direction * kick;
        self.bound_to = None;
    }
}
