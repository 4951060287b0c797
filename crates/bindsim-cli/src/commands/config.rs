use crate::cli::{CliOverrides, ConfigArgs};
use crate::config::builder::{build_config, load_file_config};
use crate::config::file::FileConfig;
use crate::error::Result;

pub fn run(args: ConfigArgs) -> Result<()> {
    print!("{}", render(&args)?);
    Ok(())
}

/// The effective configuration as a complete TOML document.
fn render(args: &ConfigArgs) -> Result<String> {
    let app_config = build_config(load_file_config(&args.source)?, &CliOverrides::default())?;
    FileConfig::from_app_config(&app_config).to_toml()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigSource;

    #[test]
    fn render_includes_every_section_with_overrides() {
        let args = ConfigArgs {
            source: ConfigSource {
                config: None,
                set_values: vec!["kinetics.k-off=0.25".to_string()],
            },
        };

        let rendered = render(&args).unwrap();
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();

        assert_eq!(parsed.ticks, Some(1000));
        assert_eq!(parsed.population.unwrap().proteins, Some(20));
        assert_eq!(parsed.kinetics.unwrap().k_off, Some(0.25));
        assert_eq!(parsed.arena.unwrap().width, Some(900.0));
        assert!(parsed.schedule.is_empty());
    }
}
