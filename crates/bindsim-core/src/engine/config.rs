use crate::core::geometry::Arena;
use crate::core::models::ligand::LigandVariant;
use std::ops::RangeInclusive;
use thiserror::Error;

pub const DEFAULT_NUM_PROTEINS: usize = 20;
pub const DEFAULT_NUM_LIGANDS: usize = 30;
pub const DEFAULT_NUM_COMPETITORS: usize = 30;
pub const DEFAULT_TEMPERATURE: f64 = 10.0;
pub const DEFAULT_K_ON: f64 = 0.1;
pub const DEFAULT_K_ON_COMPETITOR: f64 = 0.1;
pub const DEFAULT_K_OFF: f64 = 0.01;
pub const DEFAULT_BINDING_RADIUS: f64 = 10.0;
pub const DEFAULT_DT: f64 = 10.0;
pub const DEFAULT_ARENA_WIDTH: f64 = 900.0;
pub const DEFAULT_ARENA_HEIGHT: f64 = 800.0;

// Slider ranges offered by interactive front ends. Advisory only; validation accepts any
// non-negative value.
pub const PROTEIN_COUNT_RANGE: RangeInclusive<usize> = 1..=150;
pub const LIGAND_COUNT_RANGE: RangeInclusive<usize> = 0..=300;
pub const COMPETITOR_COUNT_RANGE: RangeInclusive<usize> = 0..=300;
pub const TEMPERATURE_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const K_ON_RANGE: RangeInclusive<f64> = 0.0..=1.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value {value} for '{name}': {reason}")]
    InvalidValue {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Target number of particles of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PopulationTargets {
    pub proteins: usize,
    pub ligands: usize,
    pub competitors: usize,
}

impl PopulationTargets {
    pub fn ligands_of(&self, variant: LigandVariant) -> usize {
        match variant {
            LigandVariant::Normal => self.ligands,
            LigandVariant::Competitor => self.competitors,
        }
    }
}

/// Everything that controls a simulation. Treated as immutable while a tick runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParameters {
    pub num_proteins: usize,
    pub num_ligands: usize,
    pub num_competitors: usize,
    /// Scales the Brownian step: each coordinate moves by at most `sqrt(temperature * dt)`.
    pub temperature: f64,
    /// Binding rate constant for normal ligands.
    pub k_on: f64,
    /// Binding rate constant for competitor ligands.
    pub k_on_competitor: f64,
    /// Unbinding rate constant, shared by both species.
    pub k_off: f64,
    /// Capture distance beyond the protein surface within which a ligand may bind.
    pub binding_radius: f64,
    pub dt: f64,
    pub arena: Arena,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            num_proteins: DEFAULT_NUM_PROTEINS,
            num_ligands: DEFAULT_NUM_LIGANDS,
            num_competitors: DEFAULT_NUM_COMPETITORS,
            temperature: DEFAULT_TEMPERATURE,
            k_on: DEFAULT_K_ON,
            k_on_competitor: DEFAULT_K_ON_COMPETITOR,
            k_off: DEFAULT_K_OFF,
            binding_radius: DEFAULT_BINDING_RADIUS,
            dt: DEFAULT_DT,
            arena: Arena::new(DEFAULT_ARENA_WIDTH, DEFAULT_ARENA_HEIGHT),
        }
    }
}

impl SimulationParameters {
    pub fn population(&self) -> PopulationTargets {
        PopulationTargets {
            proteins: self.num_proteins,
            ligands: self.num_ligands,
            competitors: self.num_competitors,
        }
    }

    /// Binding rate constant for the given ligand species.
    pub fn binding_rate(&self, variant: LigandVariant) -> f64 {
        match variant {
            LigandVariant::Normal => self.k_on,
            LigandVariant::Competitor => self.k_on_competitor,
        }
    }

    /// Checks every numeric field.
    ///
    /// Rates, temperature, binding radius and timestep must be finite and non-negative; the
    /// arena dimensions must be finite and strictly positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_non_negative("temperature", self.temperature)?;
        validate_non_negative("k_on", self.k_on)?;
        validate_non_negative("k_on_competitor", self.k_on_competitor)?;
        validate_non_negative("k_off", self.k_off)?;
        validate_non_negative("binding_radius", self.binding_radius)?;
        validate_non_negative("dt", self.dt)?;
        validate_positive("arena_width", self.arena.width)?;
        validate_positive("arena_height", self.arena.height)?;
        Ok(())
    }
}

pub(crate) fn validate_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "must be a finite number",
        });
    }
    if value < 0.0 {
        return Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "must not be negative",
        });
    }
    Ok(())
}

pub(crate) fn validate_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    validate_non_negative(name, value)?;
    if value == 0.0 {
        return Err(ConfigError::InvalidValue {
            name,
            value,
            reason: "must be greater than zero",
        });
    }
    Ok(())
}

#[derive(Default)]
pub struct SimulationParametersBuilder {
    num_proteins: Option<usize>,
    num_ligands: Option<usize>,
    num_competitors: Option<usize>,
    temperature: Option<f64>,
    k_on: Option<f64>,
    k_on_competitor: Option<f64>,
    k_off: Option<f64>,
    binding_radius: Option<f64>,
    dt: Option<f64>,
    arena_width: Option<f64>,
    arena_height: Option<f64>,
}

impl SimulationParametersBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_proteins(mut self, n: usize) -> Self {
        self.num_proteins = Some(n);
        self
    }
    pub fn num_ligands(mut self, n: usize) -> Self {
        self.num_ligands = Some(n);
        self
    }
    pub fn num_competitors(mut self, n: usize) -> Self {
        self.num_competitors = Some(n);
        self
    }
    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }
    pub fn k_on(mut self, rate: f64) -> Self {
        self.k_on = Some(rate);
        self
    }
    pub fn k_on_competitor(mut self, rate: f64) -> Self {
        self.k_on_competitor = Some(rate);
        self
    }
    pub fn k_off(mut self, rate: f64) -> Self {
        self.k_off = Some(rate);
        self
    }
    pub fn binding_radius(mut self, radius: f64) -> Self {
        self.binding_radius = Some(radius);
        self
    }
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = Some(dt);
        self
    }
    pub fn arena(mut self, width: f64, height: f64) -> Self {
        self.arena_width = Some(width);
        self.arena_height = Some(height);
        self
    }

    pub fn build(self) -> Result<SimulationParameters, ConfigError> {
        let params = SimulationParameters {
            num_proteins: self
                .num_proteins
                .ok_or(ConfigError::MissingParameter("num_proteins"))?,
            num_ligands: self
                .num_ligands
                .ok_or(ConfigError::MissingParameter("num_ligands"))?,
            num_competitors: self
                .num_competitors
                .ok_or(ConfigError::MissingParameter("num_competitors"))?,
            temperature: self
                .temperature
                .ok_or(ConfigError::MissingParameter("temperature"))?,
            k_on: self.k_on.ok_or(ConfigError::MissingParameter("k_on"))?,
            k_on_competitor: self
                .k_on_competitor
                .ok_or(ConfigError::MissingParameter("k_on_competitor"))?,
            k_off: self.k_off.ok_or(ConfigError::MissingParameter("k_off"))?,
            binding_radius: self
                .binding_radius
                .ok_or(ConfigError::MissingParameter("binding_radius"))?,
            dt: self.dt.ok_or(ConfigError::MissingParameter("dt"))?,
            arena: Arena::new(
                self.arena_width
                    .ok_or(ConfigError::MissingParameter("arena_width"))?,
                self.arena_height
                    .ok_or(ConfigError::MissingParameter("arena_height"))?,
            ),
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> SimulationParametersBuilder {
        SimulationParametersBuilder::new()
            .num_proteins(5)
            .num_ligands(10)
            .num_competitors(2)
            .temperature(4.0)
            .k_on(0.3)
            .k_on_competitor(0.05)
            .k_off(0.02)
            .binding_radius(8.0)
            .dt(1.0)
            .arena(400.0, 300.0)
    }

    #[test]
    fn defaults_match_reference_setup_and_are_valid() {
        let params = SimulationParameters::default();
        assert_eq!(
            params.population(),
            PopulationTargets {
                proteins: 20,
                ligands: 30,
                competitors: 30,
            }
        );
        assert_eq!(params.k_off, 0.01);
        assert_eq!(params.arena, Arena::new(900.0, 800.0));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn builder_with_all_fields_succeeds() {
        let params = complete_builder().build().unwrap();
        assert_eq!(params.num_competitors, 2);
        assert_eq!(params.binding_rate(LigandVariant::Normal), 0.3);
        assert_eq!(params.binding_rate(LigandVariant::Competitor), 0.05);
        assert_eq!(params.population().ligands_of(LigandVariant::Competitor), 2);
    }

    #[test]
    fn builder_reports_missing_parameter() {
        let result = SimulationParametersBuilder::new().num_proteins(1).build();
        assert_eq!(result, Err(ConfigError::MissingParameter("num_ligands")));
    }

    #[test]
    fn builder_rejects_negative_rate() {
        let result = complete_builder().k_off(-0.1).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { name: "k_off", .. })
        ));
    }

    #[test]
    fn validation_rejects_non_finite_values() {
        let params = SimulationParameters {
            temperature: f64::NAN,
            ..SimulationParameters::default()
        };
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidValue {
                name: "temperature",
                ..
            })
        ));
    }

    #[test]
    fn validation_rejects_zero_arena_dimension() {
        let result = complete_builder().arena(0.0, 100.0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                name: "arena_width",
                ..
            })
        ));
    }

    #[test]
    fn zero_rates_and_timestep_are_allowed() {
        let result = complete_builder()
            .k_on(0.0)
            .k_on_competitor(0.0)
            .k_off(0.0)
            .dt(0.0)
            .temperature(0.0)
            .build();
        assert!(result.is_ok());
    }
}
