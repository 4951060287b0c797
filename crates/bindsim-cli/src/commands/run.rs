use crate::cli::RunArgs;
use crate::config::builder::{build_config, load_file_config};
use crate::error::Result;
use crate::utils::export::write_metrics_csv;
use crate::utils::progress::CliProgressHandler;
use bindsim::engine::metrics::{CHART_WINDOW, FRAMES_PER_SECOND};
use bindsim::engine::progress::ProgressReporter;
use bindsim::workflows::{self, run::RunResult};
use tracing::{info, warn};

pub fn run(args: RunArgs) -> Result<()> {
    info!("Resolving configuration from defaults, file and CLI arguments...");
    let file_config = load_file_config(&args.source)?;
    let app_config = build_config(file_config, &args.overrides)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Simulating {} proteins with {} ligands and {} competitors for {} ticks...",
        app_config.parameters.num_proteins,
        app_config.parameters.num_ligands,
        app_config.parameters.num_competitors,
        app_config.run.ticks
    );
    info!("Invoking the core run workflow...");

    let result = workflows::run::run(&app_config.parameters, &app_config.run, &reporter)?;

    if result.summary.ticks_advanced == 0 {
        warn!("Run finished without advancing any tick.");
    }

    if let Some(path) = &app_config.metrics_output {
        write_metrics_csv(path, &result.metrics)?;
        println!("✓ Bound-count series written to: {}", path.display());
    }

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &RunResult) {
    let summary = &result.summary;
    println!(
        "✓ Advanced {} of {} steps.",
        summary.ticks_advanced, summary.steps
    );
    println!(
        "  Final bound: {} normal, {} competitor ({} proteins)",
        summary.final_bound.normal,
        summary.final_bound.competitor,
        result.parameters.num_proteins
    );
    if let Some((normal, competitor)) = summary.mean_bound {
        println!(
            "  Mean bound:  {:.2} normal, {:.2} competitor",
            normal, competitor
        );
    }
    if let Some((normal, competitor)) = summary.recent_mean_bound {
        println!(
            "  Last {} ticks: {:.2} normal, {:.2} competitor",
            CHART_WINDOW, normal, competitor
        );
    }
    println!(
        "  Elapsed:     {:.1} s at {} fps",
        summary.elapsed_seconds, FRAMES_PER_SECOND
    );
    println!(
        "  Events:      {} bindings, {} unbindings",
        summary.bindings, summary.unbindings
    );
    if let Some(occupancy) = summary.expected_normal_occupancy {
        println!(
            "  k_on / (k_on + k_off) = {:.3} (single protein, normal ligands only)",
            occupancy
        );
    }
}
