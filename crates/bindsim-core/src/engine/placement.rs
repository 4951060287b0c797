use crate::core::geometry::Arena;
use crate::core::models::particle::{Particle, ParticleKind};
use nalgebra::Point2;
use rand::Rng;
use tracing::warn;

pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Result of a spawn placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Point2<f64>,
    pub attempts: usize,
    /// `false` when every attempt overlapped an existing particle and the last sample was kept.
    pub collision_free: bool,
}

/// Rejection sampler for the positions of newly spawned particles.
#[derive(Debug, Clone, Copy)]
pub struct SpawnPlacer {
    max_attempts: usize,
}

impl Default for SpawnPlacer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

impl SpawnPlacer {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Samples a position for a new particle of `kind` that does not overlap `existing`.
    ///
    /// Candidates are drawn uniformly so that the disc lies inside the arena. After
    /// `max_attempts` rejected candidates the last one is accepted as is, so placement always
    /// terminates even in a saturated arena.
    pub fn place<'a, R, I>(
        &self,
        kind: ParticleKind,
        arena: &Arena,
        existing: I,
        rng: &mut R,
    ) -> Placement
    where
        R: Rng + ?Sized,
        I: IntoIterator<Item = &'a Particle>,
    {
        let radius = kind.radius();
        let occupied: Vec<(Point2<f64>, f64)> = existing
            .into_iter()
            .map(|particle| (particle.position, particle.radius))
            .collect();

        let mut position = arena.center();
        for attempt in 1..=self.max_attempts {
            position = arena.sample_position(radius, rng);
            let clear = occupied.iter().all(|(other, other_radius)| {
                nalgebra::distance(&position, other) >= radius + other_radius
            });
            if clear {
                return Placement {
                    position,
                    attempts: attempt,
                    collision_free: true,
                };
            }
        }

        warn!(
            %kind,
            attempts = self.max_attempts,
            "No collision-free position found; placing particle with overlap."
        );
        Placement {
            position,
            attempts: self.max_attempts,
            collision_free: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ligand::LigandVariant;
    use crate::core::models::particle::PROTEIN_RADIUS;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_arena_accepts_first_candidate() {
        let mut rng = StdRng::seed_from_u64(1);
        let arena = Arena::new(200.0, 200.0);
        let placement = SpawnPlacer::default().place(
            ParticleKind::Protein,
            &arena,
            Vec::<&Particle>::new(),
            &mut rng,
        );

        assert!(placement.collision_free);
        assert_eq!(placement.attempts, 1);
        assert!(arena.contains_disc(&placement.position, PROTEIN_RADIUS));
    }

    #[test]
    fn placement_avoids_existing_particles() {
        let mut rng = StdRng::seed_from_u64(9);
        let arena = Arena::new(300.0, 300.0);
        let blocker = Particle::new(Point2::new(150.0, 150.0), 60.0);

        for _ in 0..50 {
            let placement = SpawnPlacer::default().place(
                ParticleKind::Ligand(LigandVariant::Normal),
                &arena,
                [&blocker],
                &mut rng,
            );
            assert!(placement.collision_free);
            assert!(nalgebra::distance(&placement.position, &blocker.position) >= 66.0);
        }
    }

    #[test]
    fn saturated_arena_falls_back_after_attempt_cap() {
        let mut rng = StdRng::seed_from_u64(3);
        let arena = Arena::new(40.0, 40.0);
        let blanket = Particle::new(arena.center(), 100.0);
        let placer = SpawnPlacer::new(25);

        let placement = placer.place(ParticleKind::Protein, &arena, [&blanket], &mut rng);

        assert!(!placement.collision_free);
        assert_eq!(placement.attempts, 25);
        assert!(arena.contains_disc(&placement.position, PROTEIN_RADIUS));
    }

    #[test]
    fn zero_attempt_cap_is_raised_to_one() {
        assert_eq!(SpawnPlacer::new(0).max_attempts(), 1);
    }
}
