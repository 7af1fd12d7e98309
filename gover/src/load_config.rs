/// `load_config` module: reads an optional YAML file into a [`ScrapeConfig`].
///
/// Every key is optional; anything not present keeps the built-in default
/// (go.dev endpoints, 2 requests in flight, 1 s between requests).
///
/// ```yaml
/// doc_url_template: "https://go.dev/doc/{version}"
/// parallelism: 2
/// delay_ms: 1000
/// request_timeout_secs: 30
/// run_timeout_secs: 900
/// ```
///
/// # Errors
/// All errors in this module use `anyhow::Error` and are surfaced at the CLI boundary.
use anyhow::{Context, Result};
use gover_core::config::ScrapeConfig;
use std::fs;
use std::path::Path;
use tracing::{error, info};

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ScrapeConfig> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = fs::read_to_string(path_ref)
        .map_err(|e| {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            e
        })
        .with_context(|| format!("Failed to read config file {:?}", path_ref))?;

    if config_content.trim().is_empty() {
        info!(config_path = ?path_ref, "Config file is empty, using defaults");
        return Ok(ScrapeConfig::default());
    }

    let config: ScrapeConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if !config.doc_url_template.contains(gover_core::config::VERSION_PLACEHOLDER) {
        error!(template = %config.doc_url_template, "doc_url_template has no {{version}} placeholder");
        anyhow::bail!(
            "doc_url_template must contain {}: {}",
            gover_core::config::VERSION_PLACEHOLDER,
            config.doc_url_template
        );
    }

    Ok(config)
}
