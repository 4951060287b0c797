use super::config::PopulationTargets;
use super::placement::SpawnPlacer;
use crate::core::geometry::Arena;
use crate::core::models::ligand::LigandVariant;
use crate::core::models::particle::ParticleKind;
use crate::core::models::system::{BindingError, ParticleSystem};
use rand::Rng;
use tracing::{info, instrument};

/// What a reconciliation pass changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationChange {
    pub spawned: usize,
    pub removed: usize,
    /// Bindings severed because one side of the pair was removed.
    pub released: usize,
    /// Spawns that fell back to an overlapping position.
    pub crowded: usize,
}

impl PopulationChange {
    pub fn is_empty(&self) -> bool {
        self.spawned == 0 && self.removed == 0
    }
}

/// Keeps the live particle counts equal to their targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PopulationController {
    placer: SpawnPlacer,
}

impl PopulationController {
    pub fn new(placer: SpawnPlacer) -> Self {
        Self { placer }
    }

    /// Adds or removes particles until each kind matches its target.
    ///
    /// Proteins are reconciled first, then normal ligands, then competitors. Surplus
    /// particles are removed newest first. A removed protein releases its ligand, which
    /// stays in the system as a free particle inside the walls; a removed bound ligand frees its protein.
    /// New particles are placed by the spawn placer against everything already present.
    #[instrument(skip_all, name = "population_reconcile")]
    pub fn reconcile<R: Rng + ?Sized>(
        &self,
        system: &mut ParticleSystem,
        targets: PopulationTargets,
        arena: &Arena,
        rng: &mut R,
    ) -> Result<PopulationChange, BindingError> {
        let mut change = PopulationChange::default();

        while system.protein_count() > targets.proteins {
            let Some(&newest) = system.protein_ids().last() else {
                break;
            };
            if let Some((_, released)) = system.remove_protein(newest, rng)? {
                change.removed += 1;
                if let Some(ligand) = released.and_then(|id| system.ligand_mut(id)) {
                    ligand.particle.check_wall_collision_and_bounce(arena);
                    change.released += 1;
                }
            }
        }
        while system.protein_count() < targets.proteins {
            let placement =
                self.placer
                    .place(ParticleKind::Protein, arena, system.particles(), rng);
            system.add_protein(placement.position);
            change.spawned += 1;
            change.crowded += usize::from(!placement.collision_free);
        }

        for variant in [LigandVariant::Normal, LigandVariant::Competitor] {
            let target = targets.ligands_of(variant);

            while system.ligand_count(variant) > target {
                let Some(&newest) = system.ligand_ids(variant).last() else {
                    break;
                };
                if let Some(ligand) = system.remove_ligand(newest) {
                    change.removed += 1;
                    change.released += usize::from(ligand.is_bound());
                }
            }
            while system.ligand_count(variant) < target {
                let placement = self.placer.place(
                    ParticleKind::Ligand(variant),
                    arena,
                    system.particles(),
                    rng,
                );
                system.add_ligand(variant, placement.position);
                change.spawned += 1;
                change.crowded += usize::from(!placement.collision_free);
            }
        }

        if !change.is_empty() {
            info!(
                spawned = change.spawned,
                removed = change.removed,
                released = change.released,
                crowded = change.crowded,
                "Population reconciled."
            );
        }
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ZeroRng;
    use nalgebra::Point2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn targets(proteins: usize, ligands: usize, competitors: usize) -> PopulationTargets {
        PopulationTargets {
            proteins,
            ligands,
            competitors,
        }
    }

    fn populated(rng: &mut StdRng, t: PopulationTargets) -> ParticleSystem {
        let mut system = ParticleSystem::new();
        PopulationController::default()
            .reconcile(&mut system, t, &Arena::new(900.0, 800.0), rng)
            .unwrap();
        system
    }

    #[test]
    fn reconcile_spawns_up_to_targets() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut system = ParticleSystem::new();
        let arena = Arena::new(900.0, 800.0);

        let change = PopulationController::default()
            .reconcile(&mut system, targets(4, 6, 2), &arena, &mut rng)
            .unwrap();

        assert_eq!(change.spawned, 12);
        assert_eq!(change.removed, 0);
        assert_eq!(system.protein_count(), 4);
        assert_eq!(system.ligand_count(LigandVariant::Normal), 6);
        assert_eq!(system.ligand_count(LigandVariant::Competitor), 2);
        for particle in system.particles() {
            assert!(arena.contains_disc(&particle.position, particle.radius));
        }
    }

    #[test]
    fn reconcile_is_a_no_op_when_counts_match() {
        let mut rng = StdRng::seed_from_u64(6);
        let t = targets(3, 3, 3);
        let mut system = populated(&mut rng, t);

        let change = PopulationController::default()
            .reconcile(&mut system, t, &Arena::new(900.0, 800.0), &mut rng)
            .unwrap();

        assert!(change.is_empty());
    }

    #[test]
    fn shrinking_proteins_removes_newest_and_frees_their_ligands() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut system = populated(&mut rng, targets(20, 20, 0));

        let proteins: Vec<_> = system.protein_ids().to_vec();
        let ligands: Vec<_> = system.ligand_ids(LigandVariant::Normal).to_vec();
        for (&ligand, &protein) in ligands.iter().zip(&proteins) {
            system.bind(ligand, protein).unwrap();
        }

        let change = PopulationController::default()
            .reconcile(
                &mut system,
                targets(5, 20, 0),
                &Arena::new(900.0, 800.0),
                &mut rng,
            )
            .unwrap();

        assert_eq!(change.removed, 15);
        assert_eq!(change.released, 15);
        assert_eq!(system.protein_ids(), &proteins[..5]);
        assert_eq!(system.ligand_count(LigandVariant::Normal), 20);
        assert_eq!(system.bound_counts().normal, 5);
        for &ligand in &ligands[5..] {
            assert!(!system.ligand(ligand).unwrap().is_bound());
        }
        assert!(system.check_binding_consistency().is_ok());
    }

    #[test]
    fn ligand_released_by_removal_near_wall_stays_inside() {
        let arena = Arena::new(900.0, 800.0);
        let mut system = ParticleSystem::new();
        system.add_protein(Point2::new(100.0, 100.0));
        let protein = system.add_protein(Point2::new(884.0, 400.0));
        let ligand = system.add_ligand(LigandVariant::Normal, Point2::new(884.0, 400.0));
        system.bind(ligand, protein).unwrap();

        let change = PopulationController::default()
            .reconcile(&mut system, targets(1, 1, 0), &arena, &mut ZeroRng)
            .unwrap();

        assert_eq!(change.removed, 1);
        assert_eq!(change.released, 1);
        let ligand = system.ligand(ligand).unwrap();
        assert!(!ligand.is_bound());
        assert!(arena.contains_disc(&ligand.particle.position, ligand.particle.radius));
    }

    #[test]
    fn removing_bound_ligand_frees_its_protein() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut system = populated(&mut rng, targets(1, 0, 1));
        let protein = system.protein_ids()[0];
        let competitor = system.ligand_ids(LigandVariant::Competitor)[0];
        system.bind(competitor, protein).unwrap();

        let change = PopulationController::default()
            .reconcile(
                &mut system,
                targets(1, 0, 0),
                &Arena::new(900.0, 800.0),
                &mut rng,
            )
            .unwrap();

        assert_eq!(change.released, 1);
        assert!(!system.protein(protein).unwrap().is_occupied());
        assert!(system.check_binding_consistency().is_ok());
    }

    #[test]
    fn crowded_arena_still_reaches_target() {
        let mut rng = StdRng::seed_from_u64(10);
        let mut system = ParticleSystem::new();
        let controller = PopulationController::new(SpawnPlacer::new(5));

        let change = controller
            .reconcile(
                &mut system,
                targets(30, 0, 0),
                &Arena::new(60.0, 60.0),
                &mut rng,
            )
            .unwrap();

        assert_eq!(system.protein_count(), 30);
        assert!(change.crowded > 0);
    }
}
