use bindsim::engine::config::SimulationParameters;
use bindsim::workflows::run::RunConfig;
use std::path::PathBuf;

pub struct AppConfig {
    pub parameters: SimulationParameters,
    pub run: RunConfig,
    pub metrics_output: Option<PathBuf>,
}
