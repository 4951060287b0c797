use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileScheduleEntry};
use super::models::AppConfig;
use crate::cli::{CliOverrides, ConfigSource};
use crate::error::{CliError, Result};
use bindsim::engine::config::SimulationParametersBuilder;
use bindsim::workflows::run::RunConfig;
use std::str::FromStr;

/// Reads the config file named by `source`, if any, and applies its `-S` overrides.
pub fn load_file_config(source: &ConfigSource) -> Result<FileConfig> {
    let file_config = if let Some(config_path) = &source.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    apply_set_values(file_config, &source.set_values)
}

/// Resolves every setting. CLI flags win over the file (including `-S` overrides), which
/// wins over built-in defaults.
pub fn build_config(mut file_config: FileConfig, cli: &CliOverrides) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();
    let base = &defaults.parameters;

    let population = file_config.population.take().unwrap_or_default();
    let kinetics = file_config.kinetics.take().unwrap_or_default();
    let motion = file_config.motion.take().unwrap_or_default();
    let arena = file_config.arena.take().unwrap_or_default();

    let parameters = SimulationParametersBuilder::new()
        .num_proteins(
            cli.proteins
                .or(population.proteins)
                .unwrap_or(base.num_proteins),
        )
        .num_ligands(
            cli.ligands
                .or(population.ligands)
                .unwrap_or(base.num_ligands),
        )
        .num_competitors(
            cli.competitors
                .or(population.competitors)
                .unwrap_or(base.num_competitors),
        )
        .temperature(
            cli.temperature
                .or(motion.temperature)
                .unwrap_or(base.temperature),
        )
        .dt(cli.dt.or(motion.dt).unwrap_or(base.dt))
        .k_on(cli.k_on.or(kinetics.k_on).unwrap_or(base.k_on))
        .k_on_competitor(
            cli.k_on_competitor
                .or(kinetics.k_on_competitor)
                .unwrap_or(base.k_on_competitor),
        )
        .k_off(cli.k_off.or(kinetics.k_off).unwrap_or(base.k_off))
        .binding_radius(
            cli.binding_radius
                .or(kinetics.binding_radius)
                .unwrap_or(base.binding_radius),
        )
        .arena(
            arena.width.unwrap_or(base.arena.width),
            arena.height.unwrap_or(base.arena.height),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let mut schedule = Vec::new();
    for entry in &file_config.schedule {
        schedule.extend(entry.to_commands()?);
    }

    Ok(AppConfig {
        parameters,
        run: RunConfig {
            ticks: cli.ticks.or(file_config.ticks).unwrap_or(defaults.ticks),
            seed: cli.seed.or(file_config.seed),
            schedule,
        },
        metrics_output: cli.output.clone().or(file_config.output),
    })
}

fn parse_value<T: FromStr>(key: &str, value_str: &str, kind: &str) -> Result<T> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value_str))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "ticks" => config.ticks = Some(parse_value(key, value_str, "integer")?),
            "seed" => config.seed = Some(parse_value(key, value_str, "integer")?),
            "population.proteins" => {
                config
                    .population
                    .get_or_insert_with(Default::default)
                    .proteins = Some(parse_value(key, value_str, "integer")?);
            }
            "population.ligands" => {
                config
                    .population
                    .get_or_insert_with(Default::default)
                    .ligands = Some(parse_value(key, value_str, "integer")?);
            }
            "population.competitors" => {
                config
                    .population
                    .get_or_insert_with(Default::default)
                    .competitors = Some(parse_value(key, value_str, "integer")?);
            }
            "kinetics.k-on" => {
                config.kinetics.get_or_insert_with(Default::default).k_on =
                    Some(parse_value(key, value_str, "float")?);
            }
            "kinetics.k-on-competitor" => {
                config
                    .kinetics
                    .get_or_insert_with(Default::default)
                    .k_on_competitor = Some(parse_value(key, value_str, "float")?);
            }
            "kinetics.k-off" => {
                config.kinetics.get_or_insert_with(Default::default).k_off =
                    Some(parse_value(key, value_str, "float")?);
            }
            "kinetics.binding-radius" => {
                config
                    .kinetics
                    .get_or_insert_with(Default::default)
                    .binding_radius = Some(parse_value(key, value_str, "float")?);
            }
            "motion.temperature" => {
                config.motion.get_or_insert_with(Default::default).temperature =
                    Some(parse_value(key, value_str, "float")?);
            }
            "motion.dt" => {
                config.motion.get_or_insert_with(Default::default).dt =
                    Some(parse_value(key, value_str, "float")?);
            }
            "arena.width" => {
                config.arena.get_or_insert_with(Default::default).width =
                    Some(parse_value(key, value_str, "float")?);
            }
            "arena.height" => {
                config.arena.get_or_insert_with(Default::default).height =
                    Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands, RunArgs};
    use bindsim::engine::command::{Command, ParameterUpdate};
    use clap::Parser;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    fn parse_run_args(config_path: Option<&Path>, extra: &[&str]) -> RunArgs {
        let mut args = vec!["bindsim".to_string(), "run".to_string()];
        if let Some(path) = config_path {
            args.push("-c".to_string());
            args.push(path.to_str().unwrap().to_string());
        }
        args.extend(extra.iter().map(|s| s.to_string()));

        match Cli::parse_from(args).command {
            Commands::Run(run_args) => run_args,
            other => panic!("Expected 'run' subcommand, got {:?}", other),
        }
    }

    fn resolve(args: &RunArgs) -> Result<AppConfig> {
        build_config(load_file_config(&args.source)?, &args.overrides)
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let app = resolve(&parse_run_args(None, &[])).unwrap();
        let defaults = DefaultsConfig::default();

        assert_eq!(app.parameters, defaults.parameters);
        assert_eq!(app.run.ticks, defaults.ticks);
        assert_eq!(app.run.seed, None);
        assert!(app.run.schedule.is_empty());
        assert!(app.metrics_output.is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "file.toml",
            r#"
            ticks = 250
            output = "bound.csv"

            [population]
            proteins = 12

            [kinetics]
            k-off = 0.05

            [arena]
            width = 400.0
            height = 300.0
            "#,
        );

        let app = resolve(&parse_run_args(Some(&path), &[])).unwrap();

        assert_eq!(app.run.ticks, 250);
        assert_eq!(app.parameters.num_proteins, 12);
        assert_eq!(app.parameters.num_ligands, 30);
        assert_eq!(app.parameters.k_off, 0.05);
        assert_eq!(app.parameters.arena.width, 400.0);
        assert_eq!(app.metrics_output, Some(PathBuf::from("bound.csv")));
    }

    #[test]
    fn cli_flags_override_set_values_and_file() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "override.toml",
            r#"
            [kinetics]
            k-on = 0.5
            k-on-competitor = 0.5

            [motion]
            temperature = 1.0
            "#,
        );

        let args = parse_run_args(
            Some(&path),
            &[
                "-S",
                "kinetics.k-on=0.3",
                "-S",
                "kinetics.k-on-competitor=0.25",
                "--k-on",
                "0.9",
                "-n",
                "42",
                "--seed",
                "11",
            ],
        );
        let app = resolve(&args).unwrap();

        assert_eq!(app.parameters.k_on, 0.9);
        assert_eq!(app.parameters.k_on_competitor, 0.25);
        assert_eq!(app.parameters.temperature, 1.0);
        assert_eq!(app.run.ticks, 42);
        assert_eq!(app.run.seed, Some(11));
    }

    #[test]
    fn schedule_entries_become_commands_in_order() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "schedule.toml",
            r#"
            [[schedule]]
            tick = 100
            competitors = 60

            [[schedule]]
            tick = 200
            action = "pause"
            "#,
        );

        let app = resolve(&parse_run_args(Some(&path), &[])).unwrap();

        let commands: Vec<_> = app
            .run
            .schedule
            .iter()
            .map(|s| (s.tick, s.command))
            .collect();
        assert_eq!(
            commands,
            vec![
                (100, Command::Set(ParameterUpdate::Competitors(60))),
                (200, Command::Pause),
            ]
        );
    }

    #[test]
    fn invalid_parameter_value_is_a_config_error() {
        let args = parse_run_args(None, &["--k-off=-0.5"]);
        let result = resolve(&args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("k_off")));
    }

    #[test]
    fn malformed_set_value_is_rejected() {
        let args = parse_run_args(None, &["-S", "population.proteins"]);
        assert!(matches!(resolve(&args), Err(CliError::Config(_))));

        let args = parse_run_args(None, &["-S", "population.proteins=many"]);
        assert!(matches!(resolve(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_set_key_is_rejected() {
        let args = parse_run_args(None, &["-S", "arena.depth=3"]);
        let result = resolve(&args);
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("arena.depth")));
    }

    #[test]
    fn set_values_work_without_config_file() {
        let source = ConfigSource {
            config: None,
            set_values: vec!["arena.height=500".to_string(), "seed=3".to_string()],
        };
        let app = build_config(load_file_config(&source).unwrap(), &CliOverrides::default())
            .unwrap();

        assert_eq!(app.parameters.arena.height, 500.0);
        assert_eq!(app.run.seed, Some(3));
    }
}
