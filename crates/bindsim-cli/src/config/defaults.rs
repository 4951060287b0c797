use bindsim::engine::config::SimulationParameters;

pub struct DefaultsConfig {
    pub ticks: usize,
    pub parameters: SimulationParameters,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            ticks: 1000,
            parameters: SimulationParameters::default(),
        }
    }
}
