use crate::config::ScenarioConfig;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{info, warn};
use std::fs::File;
use std::path::Path;

/// Load and parse a scenario from a YAML file
pub fn load_config(config_path: &Path) -> Result<ScenarioConfig> {
    info!("Loading scenario from: {:?}", config_path);

    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open scenario file '{}'", config_path.display()))?;

    let config: ScenarioConfig = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse scenario file '{}'", config_path.display()))?;

    config.validate()?;

    if config.requests.is_empty() {
        warn!("Scenario {:?} has no requests; only the topology will be built", config_path);
    } else {
        info!("Scenario has {} request(s)", config.requests.len());
    }

    Ok(config)
}

/// Resolve a topology file path relative to the scenario file's directory
pub fn resolve_relative(config_path: &Path, target: &Path) -> std::path::PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(target),
        _ => target.to_path_buf(),
    }
}
