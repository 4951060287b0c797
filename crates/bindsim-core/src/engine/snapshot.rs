use crate::core::geometry::Arena;
use crate::core::models::ligand::LigandVariant;
use crate::core::models::particle::ParticleKind;
use crate::core::models::system::{BoundCounts, ParticleSystem};
use nalgebra::Point2;

pub type Rgb = [u8; 3];

pub const PROTEIN_COLOR: Rgb = [255, 100, 100];
pub const NORMAL_LIGAND_COLOR: Rgb = [100, 150, 255];
pub const COMPETITOR_LIGAND_COLOR: Rgb = [255, 0, 0];
pub const BOUND_LIGAND_COLOR: Rgb = [255, 255, 0];
/// Marker drawn at the centre of every protein.
pub const DOCKING_SITE_COLOR: Rgb = [255, 255, 255];
pub const DOCKING_SITE_RADIUS: f64 = 5.0;

/// Display state of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSnapshot {
    pub kind: ParticleKind,
    pub position: Point2<f64>,
    pub radius: f64,
    /// Occupied for proteins, attached for ligands.
    pub bound: bool,
    pub color: Rgb,
}

/// Read-only copy of everything a renderer needs for one frame.
///
/// Proteins come first in insertion order, followed by normal ligands and then competitors.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSnapshot {
    pub tick: usize,
    pub paused: bool,
    pub arena: Arena,
    pub particles: Vec<ParticleSnapshot>,
    pub bound: BoundCounts,
}

impl SimulationSnapshot {
    pub fn capture(system: &ParticleSystem, arena: Arena, tick: usize, paused: bool) -> Self {
        let proteins = system.proteins_iter().map(|(_, protein)| ParticleSnapshot {
            kind: ParticleKind::Protein,
            position: protein.particle.position,
            radius: protein.particle.radius,
            bound: protein.is_occupied(),
            color: PROTEIN_COLOR,
        });
        let ligands = system.ligands_iter().map(|(_, ligand)| {
            let kind = ParticleKind::Ligand(ligand.variant);
            ParticleSnapshot {
                kind,
                position: ligand.particle.position,
                radius: ligand.particle.radius,
                bound: ligand.is_bound(),
                color: color_for(kind, ligand.is_bound()),
            }
        });

        Self {
            tick,
            paused,
            arena,
            particles: proteins.chain(ligands).collect(),
            bound: system.bound_counts(),
        }
    }

    pub fn count_of(&self, kind: ParticleKind) -> usize {
        self.particles.iter().filter(|p| p.kind == kind).count()
    }

    /// Centres of the docking-site markers, one per protein.
    pub fn docking_sites(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.particles
            .iter()
            .filter(|p| p.kind == ParticleKind::Protein)
            .map(|p| p.position)
    }
}

/// Render colour of a particle. Bound ligands share one colour regardless of species.
pub fn color_for(kind: ParticleKind, bound: bool) -> Rgb {
    match kind {
        ParticleKind::Protein => PROTEIN_COLOR,
        ParticleKind::Ligand(_) if bound => BOUND_LIGAND_COLOR,
        ParticleKind::Ligand(LigandVariant::Normal) => NORMAL_LIGAND_COLOR,
        ParticleKind::Ligand(LigandVariant::Competitor) => COMPETITOR_LIGAND_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_orders_and_colors_particles() {
        let mut system = ParticleSystem::new();
        let protein = system.add_protein(Point2::new(100.0, 100.0));
        system.add_protein(Point2::new(200.0, 100.0));
        let competitor = system.add_ligand(LigandVariant::Competitor, Point2::new(50.0, 50.0));
        system.add_ligand(LigandVariant::Normal, Point2::new(60.0, 60.0));
        system.bind(competitor, protein).unwrap();

        let snapshot = SimulationSnapshot::capture(&system, Arena::new(300.0, 300.0), 7, true);

        assert_eq!(snapshot.tick, 7);
        assert!(snapshot.paused);
        assert_eq!(snapshot.particles.len(), 4);
        assert!(snapshot.particles[0].bound);
        assert!(!snapshot.particles[1].bound);
        assert_eq!(snapshot.particles[2].color, NORMAL_LIGAND_COLOR);
        assert_eq!(snapshot.particles[3].color, BOUND_LIGAND_COLOR);
        assert_eq!(snapshot.particles[3].position, Point2::new(100.0, 100.0));
        assert_eq!(snapshot.bound.competitor, 1);
        assert_eq!(snapshot.count_of(ParticleKind::Protein), 2);
        assert_eq!(snapshot.docking_sites().count(), 2);
    }

    #[test]
    fn free_ligand_colors_depend_on_species() {
        assert_eq!(
            color_for(ParticleKind::Ligand(LigandVariant::Competitor), false),
            COMPETITOR_LIGAND_COLOR
        );
        assert_eq!(
            color_for(ParticleKind::Ligand(LigandVariant::Normal), true),
            BOUND_LIGAND_COLOR
        );
        assert_eq!(color_for(ParticleKind::Protein, true), PROTEIN_COLOR);
    }
}
