use crate::core::kinetics::equilibrium_occupancy;
use crate::core::models::system::BoundCounts;
use crate::engine::command::Command;
use crate::engine::config::SimulationParameters;
use crate::engine::error::EngineError;
use crate::engine::metrics::{CHART_WINDOW, FRAMES_PER_SECOND, MetricsSeries};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::simulation::Simulation;
use crate::engine::snapshot::SimulationSnapshot;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

/// A command submitted just before the given step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledCommand {
    pub tick: usize,
    pub command: Command,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunConfig {
    /// Number of times the simulation is stepped. Steps taken while paused do not advance
    /// the tick counter.
    pub ticks: usize,
    /// Seed for reproducible runs; the operating system is used when absent.
    pub seed: Option<u64>,
    pub schedule: Vec<ScheduledCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub steps: usize,
    pub ticks_advanced: usize,
    pub bindings: usize,
    pub unbindings: usize,
    pub final_bound: BoundCounts,
    /// Mean bound counts `(normal, competitor)` over every recorded tick.
    pub mean_bound: Option<(f64, f64)>,
    /// Mean bound counts over the trailing chart window.
    pub recent_mean_bound: Option<(f64, f64)>,
    /// Recorded ticks expressed as seconds of animation.
    pub elapsed_seconds: f64,
    /// Fraction of time a single free protein would spend occupied by normal ligands,
    /// from the final rate constants.
    pub expected_normal_occupancy: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct RunResult {
    pub parameters: SimulationParameters,
    pub metrics: MetricsSeries,
    pub snapshot: SimulationSnapshot,
    pub summary: RunSummary,
}

#[instrument(skip_all, name = "binding_run_workflow")]
pub fn run(
    params: &SimulationParameters,
    config: &RunConfig,
    reporter: &ProgressReporter,
) -> Result<RunResult, EngineError> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut simulation = Simulation::with_rng(params.clone(), rng)?;

    let mut schedule = config.schedule.clone();
    schedule.sort_by_key(|entry| entry.tick);
    let mut schedule = schedule.into_iter().peekable();

    info!(
        steps = config.ticks,
        scheduled = config.schedule.len(),
        seed = ?config.seed,
        "Starting binding simulation run."
    );
    reporter.report(Progress::RunStart {
        total_ticks: config.ticks as u64,
    });

    let mut bindings = 0;
    let mut unbindings = 0;
    for step in 0..config.ticks {
        while let Some(entry) = schedule.next_if(|entry| entry.tick <= step) {
            simulation.submit(entry.command)?;
            reporter.report(Progress::Message(format!(
                "Step {}: {}",
                step, entry.command
            )));
        }

        let report = simulation.step()?;
        bindings += report.events.bindings;
        unbindings += report.events.unbindings;
        match report.tick {
            Some(tick) => reporter.report(Progress::TickCompleted {
                tick,
                bound: simulation.system().bound_counts(),
            }),
            None => reporter.report(Progress::TickSkipped),
        }
    }

    reporter.report(Progress::RunFinish);

    let metrics = simulation.metrics().clone();
    let final_params = simulation.params().clone();
    let summary = RunSummary {
        steps: config.ticks,
        ticks_advanced: metrics.len(),
        bindings,
        unbindings,
        final_bound: simulation.system().bound_counts(),
        mean_bound: metrics.mean_occupancy(metrics.len()),
        recent_mean_bound: metrics.mean_occupancy(CHART_WINDOW),
        elapsed_seconds: metrics.len() as f64 / FRAMES_PER_SECOND,
        expected_normal_occupancy: equilibrium_occupancy(final_params.k_on, final_params.k_off),
    };

    info!(
        ticks = summary.ticks_advanced,
        bindings = summary.bindings,
        unbindings = summary.unbindings,
        normal_bound = summary.final_bound.normal,
        competitor_bound = summary.final_bound.competitor,
        "Run complete."
    );

    Ok(RunResult {
        parameters: final_params,
        snapshot: simulation.snapshot(),
        metrics,
        summary,
    })
}
