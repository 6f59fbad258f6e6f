use crate::cli::ConfigCommands;
use crate::config::{default_config_path, CliConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_config_show(),
        ConfigCommands::Set {
            unit,
            duration,
            clear,
        } => run_config_set(unit, duration, clear),
    }
}

fn run_config_show() -> Result<(), CliError> {
    let path = default_config_path().map_err(CliError::Config)?;
    let config = CliConfig::load_from_path(&path).map_err(CliError::Config)?;

    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn run_config_set(
    unit: Option<String>,
    duration: Option<String>,
    clear: bool,
) -> Result<(), CliError> {
    let mut config = CliConfig::load().map_err(CliError::Config)?;
    update_config(&mut config, unit, duration, clear);

    let path = config.save().map_err(CliError::Config)?;
    println!("Saved CLI config to {}", path.display());
    Ok(())
}

/// Apply `config set` flags; an explicit blank value clears that default.
pub fn update_config(
    config: &mut CliConfig,
    unit: Option<String>,
    duration: Option<String>,
    clear: bool,
) {
    if clear {
        config.default_unit = None;
        config.default_duration = None;
        return;
    }
    if unit.is_some() {
        config.default_unit = unit;
    }
    if duration.is_some() {
        config.default_duration = duration;
    }
}
