use super::config::{ConfigError, SimulationParameters, validate_non_negative};
use std::collections::VecDeque;
use std::fmt;

/// A change to one simulation parameter.
///
/// The arena dimensions are fixed at construction and have no update variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterUpdate {
    Proteins(usize),
    Ligands(usize),
    Competitors(usize),
    Temperature(f64),
    KOn(f64),
    KOnCompetitor(f64),
    KOff(f64),
    BindingRadius(f64),
    Dt(f64),
}

impl ParameterUpdate {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Proteins(_) => "num_proteins",
            Self::Ligands(_) => "num_ligands",
            Self::Competitors(_) => "num_competitors",
            Self::Temperature(_) => "temperature",
            Self::KOn(_) => "k_on",
            Self::KOnCompetitor(_) => "k_on_competitor",
            Self::KOff(_) => "k_off",
            Self::BindingRadius(_) => "binding_radius",
            Self::Dt(_) => "dt",
        }
    }

    /// Returns `true` for updates that change a population target.
    pub fn affects_population(&self) -> bool {
        matches!(
            self,
            Self::Proteins(_) | Self::Ligands(_) | Self::Competitors(_)
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Self::Proteins(_) | Self::Ligands(_) | Self::Competitors(_) => Ok(()),
            Self::Temperature(value)
            | Self::KOn(value)
            | Self::KOnCompetitor(value)
            | Self::KOff(value)
            | Self::BindingRadius(value)
            | Self::Dt(value) => validate_non_negative(self.name(), value),
        }
    }

    /// Writes the new value into `params`. Callers validate first.
    pub(crate) fn apply_to(&self, params: &mut SimulationParameters) {
        match *self {
            Self::Proteins(n) => params.num_proteins = n,
            Self::Ligands(n) => params.num_ligands = n,
            Self::Competitors(n) => params.num_competitors = n,
            Self::Temperature(value) => params.temperature = value,
            Self::KOn(value) => params.k_on = value,
            Self::KOnCompetitor(value) => params.k_on_competitor = value,
            Self::KOff(value) => params.k_off = value,
            Self::BindingRadius(value) => params.binding_radius = value,
            Self::Dt(value) => params.dt = value,
        }
    }
}

impl fmt::Display for ParameterUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Proteins(n) | Self::Ligands(n) | Self::Competitors(n) => {
                write!(f, "{} = {}", self.name(), n)
            }
            Self::Temperature(value)
            | Self::KOn(value)
            | Self::KOnCompetitor(value)
            | Self::KOff(value)
            | Self::BindingRadius(value)
            | Self::Dt(value) => write!(f, "{} = {}", self.name(), value),
        }
    }
}

/// An instruction for the simulation, applied at the start of the next tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Set(ParameterUpdate),
    Pause,
    Resume,
    TogglePause,
    Reset,
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Set(update) => write!(f, "set {}", update),
            Command::Pause => f.write_str("pause"),
            Command::Resume => f.write_str("resume"),
            Command::TogglePause => f.write_str("toggle pause"),
            Command::Reset => f.write_str("reset"),
        }
    }
}

/// FIFO buffer of validated commands awaiting the next tick boundary.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and enqueues a command. Rejected commands leave the queue untouched.
    pub fn push(&mut self, command: Command) -> Result<(), ConfigError> {
        if let Command::Set(update) = &command {
            update.validate()?;
        }
        self.push_unchecked(command);
        Ok(())
    }

    pub(crate) fn push_unchecked(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    /// Removes and returns every pending command in submission order.
    pub fn drain(&mut self) -> Vec<Command> {
        self.pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
