use super::models::AppConfig;
use crate::error::{CliError, Result};
use bindsim::engine::command::{Command, ParameterUpdate};
use bindsim::workflows::run::ScheduledCommand;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FilePopulationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proteins: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ligands: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitors: Option<usize>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileKineticsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_on: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_on_competitor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_off: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_radius: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileMotionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileArenaConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileAction {
    Pause,
    Resume,
    TogglePause,
    Reset,
}

/// One `[[schedule]]` entry: any number of parameter changes and at most one action, all
/// submitted before the given step.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileScheduleEntry {
    pub tick: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<FileAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proteins: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ligands: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub competitors: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_on: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_on_competitor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_off: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
}

impl FileScheduleEntry {
    /// Expands the entry into commands: parameter updates first, then the action.
    pub fn to_commands(&self) -> Result<Vec<ScheduledCommand>> {
        let updates = [
            self.proteins.map(ParameterUpdate::Proteins),
            self.ligands.map(ParameterUpdate::Ligands),
            self.competitors.map(ParameterUpdate::Competitors),
            self.temperature.map(ParameterUpdate::Temperature),
            self.k_on.map(ParameterUpdate::KOn),
            self.k_on_competitor.map(ParameterUpdate::KOnCompetitor),
            self.k_off.map(ParameterUpdate::KOff),
            self.binding_radius.map(ParameterUpdate::BindingRadius),
            self.dt.map(ParameterUpdate::Dt),
        ];

        let mut commands = Vec::new();
        for update in updates.into_iter().flatten() {
            update
                .validate()
                .map_err(|e| CliError::Config(format!("schedule entry at tick {}: {}", self.tick, e)))?;
            commands.push(Command::Set(update));
        }
        if let Some(action) = self.action {
            commands.push(match action {
                FileAction::Pause => Command::Pause,
                FileAction::Resume => Command::Resume,
                FileAction::TogglePause => Command::TogglePause,
                FileAction::Reset => Command::Reset,
            });
        }

        if commands.is_empty() {
            return Err(CliError::Config(format!(
                "schedule entry at tick {} sets no parameter and has no action",
                self.tick
            )));
        }
        Ok(commands
            .into_iter()
            .map(|command| ScheduledCommand {
                tick: self.tick,
                command,
            })
            .collect())
    }

    fn from_scheduled(scheduled: &ScheduledCommand) -> Self {
        let mut entry = Self {
            tick: scheduled.tick,
            ..Self::default()
        };
        match scheduled.command {
            Command::Set(update) => match update {
                ParameterUpdate::Proteins(n) => entry.proteins = Some(n),
                ParameterUpdate::Ligands(n) => entry.ligands = Some(n),
                ParameterUpdate::Competitors(n) => entry.competitors = Some(n),
                ParameterUpdate::Temperature(v) => entry.temperature = Some(v),
                ParameterUpdate::KOn(v) => entry.k_on = Some(v),
                ParameterUpdate::KOnCompetitor(v) => entry.k_on_competitor = Some(v),
                ParameterUpdate::KOff(v) => entry.k_off = Some(v),
                ParameterUpdate::BindingRadius(v) => entry.binding_radius = Some(v),
                ParameterUpdate::Dt(v) => entry.dt = Some(v),
            },
            Command::Pause => entry.action = Some(FileAction::Pause),
            Command::Resume => entry.action = Some(FileAction::Resume),
            Command::TogglePause => entry.action = Some(FileAction::TogglePause),
            Command::Reset => entry.action = Some(FileAction::Reset),
        }
        entry
    }
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub population: Option<FilePopulationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kinetics: Option<FileKineticsConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion: Option<FileMotionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arena: Option<FileArenaConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<FileScheduleEntry>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Fully populated file representation of a resolved configuration.
    pub fn from_app_config(app: &AppConfig) -> Self {
        let params = &app.parameters;
        Self {
            ticks: Some(app.run.ticks),
            seed: app.run.seed,
            output: app.metrics_output.clone(),
            population: Some(FilePopulationConfig {
                proteins: Some(params.num_proteins),
                ligands: Some(params.num_ligands),
                competitors: Some(params.num_competitors),
            }),
            kinetics: Some(FileKineticsConfig {
                k_on: Some(params.k_on),
                k_on_competitor: Some(params.k_on_competitor),
                k_off: Some(params.k_off),
                binding_radius: Some(params.binding_radius),
            }),
            motion: Some(FileMotionConfig {
                temperature: Some(params.temperature),
                dt: Some(params.dt),
            }),
            arena: Some(FileArenaConfig {
                width: Some(params.arena.width),
                height: Some(params.arena.height),
            }),
            schedule: app
                .run
                .schedule
                .iter()
                .map(FileScheduleEntry::from_scheduled)
                .collect(),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Other(e.into()))
    }
}
