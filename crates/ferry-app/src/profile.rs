use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::Context;
use ferry_config::Config;

/// Config file picked up from the working directory when `--config` is not given
const DEFAULT_CONFIG_FILE: &str = "ferry.json";

fn read_config(path: &Path) -> anyhow::Result<Config> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(config)
}

/// Config together with the file it was read from, if any
pub struct LoadedConfig {
    pub config: Config,
    pub source: Option<PathBuf>,
}

/// Loads `path`, or `ferry.json` when present, or the defaults. Environment
/// overrides are applied last in every case.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LoadedConfig> {
    let source = match path {
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|file| file.exists()),
    };

    let mut config = match &source {
        Some(file) => read_config(file)?,
        None => Config::default(),
    };
    config.apply_env();

    Ok(LoadedConfig { config, source })
}
