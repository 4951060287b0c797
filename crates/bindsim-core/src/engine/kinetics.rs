use super::config::SimulationParameters;
use crate::core::geometry::Arena;
use crate::core::kinetics::event_probability;
use crate::core::models::ids::{LigandId, ProteinId};
use crate::core::models::system::{BindingError, ParticleSystem};
use rand::Rng;

/// Binding transitions that happened during one kinetics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub bindings: usize,
    pub unbindings: usize,
}

/// Advances the particle system by one timestep.
///
/// 1. Every protein and every free ligand takes a Brownian step and is reflected off the walls.
/// 2. Ligands are visited once each, normal species first, in insertion order:
///    - a bound ligand is moved onto its protein and unbinds with probability
///      `1 - exp(-k_off * dt)`. An unbound ligand is pushed out of contact and clamped to the arena.
///    - a free ligand checks proteins in insertion order. Each free protein whose surface lies
///      within `binding_radius` gets an independent draw against `1 - exp(-k_on * dt)`, using
///      the rate of the ligand's species. The first success binds.
///
/// A ligand released during this step is not considered for binding again until the next
/// step.
pub fn step<R: Rng + ?Sized>(
    system: &mut ParticleSystem,
    params: &SimulationParameters,
    rng: &mut R,
) -> Result<StepEvents, BindingError> {
    let ligand_ids: Vec<LigandId> = system.all_ligand_ids().collect();
    move_free_particles(system, &ligand_ids, params, rng);

    let p_off = event_probability(params.k_off, params.dt);
    let mut events = StepEvents::default();

    for ligand_id in ligand_ids {
        let Some(ligand) = system.ligand(ligand_id) else {
            continue;
        };

        match ligand.bound_to() {
            Some(protein_id) => {
                if try_unbind(system, ligand_id, protein_id, p_off, &params.arena, rng)? {
                    events.unbindings += 1;
                }
            }
            None => {
                let p_on = event_probability(params.binding_rate(ligand.variant), params.dt);
                if let Some(protein_id) =
                    find_binding_partner(system, ligand_id, params.binding_radius, p_on, rng)
                {
                    system.bind(ligand_id, protein_id)?;
                    events.bindings += 1;
                }
            }
        }
    }

    Ok(events)
}

fn move_free_particles<R: Rng + ?Sized>(
    system: &mut ParticleSystem,
    ligand_ids: &[LigandId],
    params: &SimulationParameters,
    rng: &mut R,
) {
    let protein_ids = system.protein_ids().to_vec();
    for protein_id in protein_ids {
        if let Some(protein) = system.protein_mut(protein_id) {
            protein
                .particle
                .move_brownian(params.dt, params.temperature, rng);
            protein.particle.check_wall_collision_and_bounce(&params.arena);
        }
    }

    for &ligand_id in ligand_ids {
        if let Some(ligand) = system.ligand_mut(ligand_id).filter(|l| !l.is_bound()) {
            ligand
                .particle
                .move_brownian(params.dt, params.temperature, rng);
            ligand.particle.check_wall_collision_and_bounce(&params.arena);
        }
    }
}

fn try_unbind<R: Rng + ?Sized>(
    system: &mut ParticleSystem,
    ligand_id: LigandId,
    protein_id: ProteinId,
    p_off: f64,
    arena: &Arena,
    rng: &mut R,
) -> Result<bool, BindingError> {
    let anchor = system
        .protein(protein_id)
        .map(|protein| protein.particle.position)
        .ok_or(BindingError::UnknownProtein(protein_id))?;
    if let Some(ligand) = system.ligand_mut(ligand_id) {
        ligand.particle.position = anchor;
    }

    if rng.random::<f64>() >= p_off {
        return Ok(false);
    }

    system.release(ligand_id, rng)?;
    if let Some(ligand) = system.ligand_mut(ligand_id) {
        ligand.particle.check_wall_collision_and_bounce(arena);
    }
    Ok(true)
}

fn find_binding_partner<R: Rng + ?Sized>(
    system: &ParticleSystem,
    ligand_id: LigandId,
    binding_radius: f64,
    p_on: f64,
    rng: &mut R,
) -> Option<ProteinId> {
    let position = system.ligand(ligand_id)?.particle.position;

    system
        .proteins_iter()
        .filter(|(_, protein)| !protein.is_occupied())
        .find(|(_, protein)| {
            let reach = protein.particle.radius + binding_radius;
            nalgebra::distance(&position, &protein.particle.position) < reach
                && rng.random::<f64>() < p_on
        })
        .map(|(protein_id, _)| protein_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ligand::LigandVariant;
    use crate::core::models::particle::{LIGAND_RADIUS, PROTEIN_RADIUS};
    use crate::engine::testing::ZeroRng;
    use nalgebra::Point2;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn still_params() -> SimulationParameters {
        SimulationParameters {
            temperature: 0.0,
            k_on: 1.0,
            k_on_competitor: 1.0,
            k_off: 0.0,
            binding_radius: 10.0,
            dt: 10.0,
            ..SimulationParameters::default()
        }
    }

    #[test]
    fn ligand_within_capture_distance_binds_when_draw_succeeds() {
        let mut system = ParticleSystem::new();
        let protein = system.add_protein(Point2::new(100.0, 100.0));
        let ligand = system.add_ligand(LigandVariant::Normal, Point2::new(120.0, 100.0));

        let events = step(&mut system, &still_params(), &mut ZeroRng).unwrap();

        assert_eq!(events.bindings, 1);
        assert_eq!(system.ligand(ligand).unwrap().bound_to(), Some(protein));
        assert_eq!(system.bound_counts().normal, 1);
    }

    #[test]
    fn ligand_at_capture_boundary_does_not_bind() {
        let mut system = ParticleSystem::new();
        system.add_protein(Point2::new(100.0, 100.0));
        let ligand = system.add_ligand(LigandVariant::Normal, Point2::new(125.0, 100.0));

        let events = step(&mut system, &still_params(), &mut ZeroRng).unwrap();

        assert_eq!(events.bindings, 0);
        assert!(!system.ligand(ligand).unwrap().is_bound());
    }

    #[test]
    fn zero_binding_rate_never_binds() {
        let mut system = ParticleSystem::new();
        system.add_protein(Point2::new(100.0, 100.0));
        system.add_ligand(LigandVariant::Competitor, Point2::new(105.0, 100.0));
        let params = SimulationParameters {
            k_on_competitor: 0.0,
            ..still_params()
        };

        for _ in 0..20 {
            let events = step(&mut system, &params, &mut ZeroRng).unwrap();
            assert_eq!(events.bindings, 0);
        }
        assert_eq!(system.bound_counts().total(), 0);
    }

    #[test]
    fn only_one_ligand_can_occupy_a_protein() {
        let mut system = ParticleSystem::new();
        let protein = system.add_protein(Point2::new(100.0, 100.0));
        let first = system.add_ligand(LigandVariant::Normal, Point2::new(115.0, 100.0));
        system.add_ligand(LigandVariant::Competitor, Point2::new(85.0, 100.0));

        let events = step(&mut system, &still_params(), &mut ZeroRng).unwrap();

        assert_eq!(events.bindings, 1);
        assert_eq!(system.protein(protein).unwrap().bound_ligand(), Some(first));
        assert_eq!(system.bound_counts().competitor, 0);
    }

    #[test]
    fn ligand_falls_through_to_next_free_protein() {
        let mut system = ParticleSystem::new();
        let occupied = system.add_protein(Point2::new(100.0, 100.0));
        let free = system.add_protein(Point2::new(130.0, 100.0));
        let holder = system.add_ligand(LigandVariant::Normal, Point2::new(0.0, 0.0));
        system.bind(holder, occupied).unwrap();
        let seeker = system.add_ligand(LigandVariant::Normal, Point2::new(115.0, 100.0));

        step(&mut system, &still_params(), &mut ZeroRng).unwrap();

        assert_eq!(system.ligand(seeker).unwrap().bound_to(), Some(free));
    }

    #[test]
    fn bound_ligand_follows_its_protein() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut system = ParticleSystem::new();
        let protein = system.add_protein(Point2::new(450.0, 400.0));
        let ligand = system.add_ligand(LigandVariant::Normal, Point2::new(455.0, 400.0));
        system.bind(ligand, protein).unwrap();
        let params = SimulationParameters {
            temperature: 5.0,
            ..still_params()
        };

        for _ in 0..25 {
            step(&mut system, &params, &mut rng).unwrap();
            assert_eq!(
                system.ligand(ligand).unwrap().particle.position,
                system.protein(protein).unwrap().particle.position
            );
        }
    }

    #[test]
    fn unbinding_pushes_ligand_out_of_contact() {
        let mut system = ParticleSystem::new();
        let protein = system.add_protein(Point2::new(400.0, 400.0));
        let ligand = system.add_ligand(LigandVariant::Normal, Point2::new(400.0, 400.0));
        system.bind(ligand, protein).unwrap();
        let params = SimulationParameters {
            k_on: 0.0,
            k_off: 1.0,
            ..still_params()
        };

        let events = step(&mut system, &params, &mut ZeroRng).unwrap();

        assert_eq!(events.unbindings, 1);
        let ligand = system.ligand(ligand).unwrap();
        let protein = system.protein(protein).unwrap();
        assert!(!ligand.is_bound());
        assert!(!protein.is_occupied());
        let gap = ligand.particle.distance_to(&protein.particle);
        assert!(gap > PROTEIN_RADIUS + LIGAND_RADIUS);
    }

    #[test]
    fn released_ligand_near_wall_is_clamped_inside() {
        let mut system = ParticleSystem::new();
        let protein = system.add_protein(Point2::new(884.0, 400.0));
        let ligand = system.add_ligand(LigandVariant::Normal, Point2::new(884.0, 400.0));
        system.bind(ligand, protein).unwrap();
        let params = SimulationParameters {
            k_on: 0.0,
            k_off: 1.0,
            ..still_params()
        };

        step(&mut system, &params, &mut ZeroRng).unwrap();

        let ligand = system.ligand(ligand).unwrap();
        assert!(
            params
                .arena
                .contains_disc(&ligand.particle.position, ligand.particle.radius)
        );
    }

    #[test]
    fn free_particles_stay_inside_arena() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut system = ParticleSystem::new();
        system.add_protein(Point2::new(20.0, 20.0));
        system.add_ligand(LigandVariant::Normal, Point2::new(880.0, 790.0));
        let params = SimulationParameters {
            temperature: 100.0,
            k_on: 0.0,
            k_on_competitor: 0.0,
            ..SimulationParameters::default()
        };

        for _ in 0..200 {
            step(&mut system, &params, &mut rng).unwrap();
            for particle in system.particles() {
                assert!(params.arena.contains_disc(&particle.position, particle.radius));
            }
        }
    }
}
