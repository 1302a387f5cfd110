mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

pub const ENV_TMDB_BASE_URL: &str = "TMDB_API_BASE_URL";
pub const ENV_TMDB_ACCESS_TOKEN: &str = "TMDB_API_ACCESS_TOKEN";
pub const ENV_TMDB_IMAGE_BASE_URL: &str = "TMDB_IMAGE_BASE_URL";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./cinescope.toml",
        "./config.toml",
        "~/.config/cinescope/config.toml",
        "/etc/cinescope/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate_config(&config)?;
    Ok(config)
}

/// Let the process environment override endpoint settings.
///
/// Empty variables are ignored.
pub fn apply_env_overrides(config: &mut Config) {
    let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

    if let Some(url) = read(ENV_TMDB_BASE_URL) {
        config.tmdb.base_url = url;
    }
    if let Some(token) = read(ENV_TMDB_ACCESS_TOKEN) {
        config.tmdb.access_token = token;
    }
    if let Some(url) = read(ENV_TMDB_IMAGE_BASE_URL) {
        config.images.base_url = url;
    }
}

/// Validate configuration
///
/// Missing TMDB credentials are not rejected here; the gateway reports them
/// as a configuration error when it is constructed.
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.tmdb.requests_per_second == 0 {
        anyhow::bail!("tmdb.requests_per_second must be at least 1");
    }

    if config.tmdb.timeout_secs == 0 {
        anyhow::bail!("tmdb.timeout_secs must be at least 1");
    }

    if let Some(ref dir) = config.server.static_dir {
        if !dir.exists() {
            tracing::warn!("Static directory does not exist: {:?}", dir);
        }
    }

    for year in &config.browse.available_years {
        if !(1874..=9999).contains(year) {
            anyhow::bail!("browse.available_years contains an invalid year: {}", year);
        }
    }

    Ok(())
}
