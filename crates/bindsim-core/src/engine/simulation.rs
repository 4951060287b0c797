use super::command::{Command, CommandQueue, ParameterUpdate};
use super::config::{ConfigError, SimulationParameters};
use super::error::EngineError;
use super::kinetics::{self, StepEvents};
use super::metrics::{MetricsRecorder, MetricsSample, MetricsSeries};
use super::population::{PopulationChange, PopulationController};
use super::snapshot::SimulationSnapshot;
use crate::core::models::system::ParticleSystem;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, trace};

/// Outcome of one call to [`Simulation::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Index of the tick that was advanced, or `None` if the simulation is paused.
    pub tick: Option<usize>,
    pub events: StepEvents,
    pub population: PopulationChange,
    pub sample: Option<MetricsSample>,
}

impl TickReport {
    pub fn advanced(&self) -> bool {
        self.tick.is_some()
    }
}

/// A running protein/ligand binding simulation.
///
/// Changes requested between ticks (parameter updates, pause, resume, reset) are validated
/// immediately and queued; they take effect together at the start of the next call to
/// [`step`](Self::step). The particle system is therefore never modified while a tick is in
/// progress, and the population is reconciled at most once per tick.
pub struct Simulation<R = StdRng> {
    params: SimulationParameters,
    system: ParticleSystem,
    commands: CommandQueue,
    population: PopulationController,
    metrics: MetricsRecorder,
    rng: R,
    running: bool,
}

impl Simulation<StdRng> {
    /// Creates a simulation seeded from the operating system.
    pub fn new(params: SimulationParameters) -> Result<Self, EngineError> {
        Self::with_rng(params, StdRng::from_os_rng())
    }

    /// Creates a reproducible simulation.
    pub fn with_seed(params: SimulationParameters, seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(params, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    /// Validates `params` and spawns the initial population.
    pub fn with_rng(params: SimulationParameters, rng: R) -> Result<Self, EngineError> {
        params.validate()?;
        let mut simulation = Self::assemble(params, ParticleSystem::new(), rng);
        simulation.reinitialize()?;
        Ok(simulation)
    }

    /// Wraps an existing particle system without adding or removing particles.
    ///
    /// Population targets in `params` take effect the next time a count update is applied.
    pub fn from_system(
        params: SimulationParameters,
        system: ParticleSystem,
        rng: R,
    ) -> Result<Self, EngineError> {
        params.validate()?;
        system.check_binding_consistency()?;
        Ok(Self::assemble(params, system, rng))
    }

    fn assemble(params: SimulationParameters, system: ParticleSystem, rng: R) -> Self {
        Self {
            params,
            system,
            commands: CommandQueue::new(),
            population: PopulationController::default(),
            metrics: MetricsRecorder::new(),
            rng,
            running: true,
        }
    }

    /// Advances the simulation by one tick.
    ///
    /// Pending commands are applied first, in submission order. If the simulation is then
    /// paused, nothing else happens and no metrics sample is recorded.
    #[instrument(skip_all, name = "simulation_step", level = "debug")]
    pub fn step(&mut self) -> Result<TickReport, EngineError> {
        let population = self.apply_pending_commands()?;
        if !self.running {
            return Ok(TickReport {
                population,
                ..TickReport::default()
            });
        }

        let events = kinetics::step(&mut self.system, &self.params, &mut self.rng)?;
        debug_assert_eq!(self.system.check_binding_consistency(), Ok(()));
        let sample = self.metrics.record(&self.system);

        trace!(
            tick = sample.tick,
            bindings = events.bindings,
            unbindings = events.unbindings,
            normal_bound = sample.normal_bound,
            competitor_bound = sample.competitor_bound,
            "Tick advanced."
        );

        Ok(TickReport {
            tick: Some(sample.tick),
            events,
            population,
            sample: Some(sample),
        })
    }

    /// Validates a command and queues it for the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a rejected parameter value; the current value
    /// is kept and nothing is queued.
    pub fn submit(&mut self, command: Command) -> Result<(), ConfigError> {
        self.commands.push(command)
    }

    pub fn pause(&mut self) {
        self.enqueue(Command::Pause);
    }

    pub fn resume(&mut self) {
        self.enqueue(Command::Resume);
    }

    pub fn toggle_pause(&mut self) {
        self.enqueue(Command::TogglePause);
    }

    /// Applies any pending commands, then respawns every particle from the current targets
    /// and clears the metrics series.
    pub fn reset(&mut self) -> Result<PopulationChange, EngineError> {
        self.enqueue(Command::Reset);
        self.apply_pending_commands()
    }

    pub fn set_protein_count(&mut self, n: usize) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::Proteins(n)))
    }

    pub fn set_ligand_count(&mut self, n: usize) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::Ligands(n)))
    }

    pub fn set_competitor_count(&mut self, n: usize) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::Competitors(n)))
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::Temperature(temperature)))
    }

    pub fn set_k_on(&mut self, rate: f64) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::KOn(rate)))
    }

    pub fn set_k_on_competitor(&mut self, rate: f64) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::KOnCompetitor(rate)))
    }

    pub fn set_k_off(&mut self, rate: f64) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::KOff(rate)))
    }

    pub fn set_binding_radius(&mut self, radius: f64) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::BindingRadius(radius)))
    }

    pub fn set_dt(&mut self, dt: f64) -> Result<(), ConfigError> {
        self.submit(Command::Set(ParameterUpdate::Dt(dt)))
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn metrics(&self) -> &MetricsSeries {
        self.metrics.series()
    }

    /// Number of ticks advanced since construction or the last reset.
    pub fn tick(&self) -> usize {
        self.metrics.series().len()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    pub fn snapshot(&self) -> SimulationSnapshot {
        SimulationSnapshot::capture(&self.system, self.params.arena, self.tick(), !self.running)
    }

    fn enqueue(&mut self, command: Command) {
        self.commands.push_unchecked(command);
    }

    fn apply_pending_commands(&mut self) -> Result<PopulationChange, EngineError> {
        let pending = self.commands.drain();
        if pending.is_empty() {
            return Ok(PopulationChange::default());
        }

        let mut population_dirty = false;
        let mut reset_requested = false;
        for command in pending {
            debug!(%command, "Applying command.");
            match command {
                Command::Set(update) => {
                    update.apply_to(&mut self.params);
                    population_dirty |= update.affects_population();
                }
                Command::Pause => self.running = false,
                Command::Resume => self.running = true,
                Command::TogglePause => self.running = !self.running,
                Command::Reset => reset_requested = true,
            }
        }

        if reset_requested {
            self.reinitialize()
        } else if population_dirty {
            Ok(self.population.reconcile(
                &mut self.system,
                self.params.population(),
                &self.params.arena,
                &mut self.rng,
            )?)
        } else {
            Ok(PopulationChange::default())
        }
    }

    fn reinitialize(&mut self) -> Result<PopulationChange, EngineError> {
        self.system.clear();
        self.metrics.reset();
        let change = self.population.reconcile(
            &mut self.system,
            self.params.population(),
            &self.params.arena,
            &mut self.rng,
        )?;
        info!(
            proteins = self.system.protein_count(),
            particles = change.spawned,
            crowded = change.crowded,
            "Simulation initialized."
        );
        Ok(change)
    }
}
