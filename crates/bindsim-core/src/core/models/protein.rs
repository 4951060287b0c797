use super::ids::LigandId;
use super::particle::{PROTEIN_RADIUS, Particle};
use nalgebra::Point2;

/// A protein with a single binding site.
///
/// The slot holds at most one ligand. It is only ever written through
/// [`ParticleSystem`](super::system::ParticleSystem), which keeps it consistent with the
/// ligand's back reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Protein {
    pub particle: Particle,
    pub(crate) bound_ligand: Option<LigandId>,
}

impl Protein {
    pub fn new(position: Point2<f64>) -> Self {
        Self {
            particle: Particle::new(position, PROTEIN_RADIUS),
            bound_ligand: None,
        }
    }

    pub fn bound_ligand(&self) -> Option<LigandId> {
        self.bound_ligand
    }

    pub fn is_occupied(&self) -> bool {
        self.bound_ligand.is_some()
    }
}
