//! Configuration loading from mcsum.toml
//!
//! mcsum configuration can be specified in a `mcsum.toml` file next to the export.
//! The configuration is automatically discovered by walking up from the current directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

use mcsum_decode::{DEFAULT_HEADER_SENTINEL, DecoderConfig, NOISE_SEED_VARIABLE};
use mcsum_stats::{ClampMode, DEFAULT_QUANTILES, FinalizeOptions, FinalizeScope, QuantileTarget};

/// Configuration file name looked up by [`McsumConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "mcsum.toml";

/// mcsum configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct McsumConfig {
    /// Input format configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Estimator configuration
    #[serde(default)]
    pub stats: StatsConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input format of the simulation export
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Field delimiter (a single character)
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// First field of the header row
    #[serde(default = "default_header_sentinel")]
    pub header_sentinel: String,
    /// Variables that are dropped before aggregation
    #[serde(default = "default_skip_variables")]
    pub skip_variables: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            header_sentinel: default_header_sentinel(),
            skip_variables: default_skip_variables(),
        }
    }
}

fn default_delimiter() -> String {
    "\t".to_string()
}
fn default_header_sentinel() -> String {
    DEFAULT_HEADER_SENTINEL.to_string()
}
fn default_skip_variables() -> Vec<String> {
    vec![NOISE_SEED_VARIABLE.to_string()]
}

/// Estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsConfig {
    /// Quantile levels to estimate, each strictly between 0 and 1
    #[serde(default = "default_quantiles")]
    pub quantiles: Vec<f64>,
    /// Apply the bias correction to the final time step too
    #[serde(default = "default_correct_last_step")]
    pub correct_last_step: bool,
    /// Hold finalized quantiles inside the observed min/max
    #[serde(default = "default_clamp_to_range")]
    pub clamp_to_range: bool,
    /// Log progress every N scenarios (0 disables)
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            quantiles: default_quantiles(),
            correct_last_step: default_correct_last_step(),
            clamp_to_range: default_clamp_to_range(),
            progress_interval: default_progress_interval(),
        }
    }
}

fn default_quantiles() -> Vec<f64> {
    DEFAULT_QUANTILES.to_vec()
}
fn default_correct_last_step() -> bool {
    true
}
fn default_clamp_to_range() -> bool {
    true
}
fn default_progress_interval() -> u64 {
    1000
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Directory the tables are written to
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Output format: "tab", "csv", "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            format: default_format(),
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}
fn default_format() -> String {
    "tab".to_string()
}

impl McsumConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Decoder settings
    pub fn decoder(&self) -> anyhow::Result<DecoderConfig> {
        let mut chars = self.input.delimiter.chars();
        let delimiter = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(anyhow::anyhow!(
                    "Delimiter must be a single character, got {:?}",
                    self.input.delimiter
                ));
            }
        };
        Ok(DecoderConfig {
            delimiter,
            header_sentinel: self.input.header_sentinel.clone(),
        })
    }

    /// Validated quantile targets
    pub fn quantile_targets(&self) -> anyhow::Result<Vec<QuantileTarget>> {
        self.stats
            .quantiles
            .iter()
            .map(|&p| QuantileTarget::new(p).map_err(anyhow::Error::from))
            .collect()
    }

    /// Finalization scope from `correct_last_step`
    pub fn finalize_scope(&self) -> FinalizeScope {
        if self.stats.correct_last_step {
            FinalizeScope::AllSteps
        } else {
            FinalizeScope::ExcludeLastStep
        }
    }

    /// Finalization settings from `correct_last_step` and `clamp_to_range`
    pub fn finalize_options(&self) -> FinalizeOptions {
        FinalizeOptions {
            scope: self.finalize_scope(),
            clamp: if self.stats.clamp_to_range {
                ClampMode::ObservedRange
            } else {
                ClampMode::Off
            },
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# mcsum Configuration

[input]
# Field delimiter of the export
delimiter = "\t"
# First field of the header row carrying the time axis
header_sentinel = "Time"
# Variables recorded by the exporter that are not aggregated
skip_variables = ["NOISE SEED"]

[stats]
# Quantile levels to estimate (each strictly between 0 and 1)
quantiles = [0.25, 0.5, 0.75]
# Bias-correct the final time step as well (false reproduces the legacy tooling)
correct_last_step = true
# Keep corrected quantiles inside the observed min/max (false reproduces the legacy numbers)
clamp_to_range = true
# Log progress every N scenarios (0 disables)
progress_interval = 1000

[output]
# Directory for the statistic tables
directory = "."
# Output format: tab, csv, json
format = "tab"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = McsumConfig::default();
        assert_eq!(config.input.delimiter, "\t");
        assert_eq!(config.input.skip_variables, vec!["NOISE SEED"]);
        assert_eq!(config.stats.quantiles, vec![0.25, 0.5, 0.75]);
        assert!(config.stats.correct_last_step);
        assert!(config.stats.clamp_to_range);
        assert_eq!(config.output.format, "tab");
        assert_eq!(config.finalize_options(), FinalizeOptions::default());
    }

    #[test]
    fn test_legacy_finalize_options() {
        let config: McsumConfig = toml::from_str(
            r#"
            [stats]
            correct_last_step = false
            clamp_to_range = false
        "#,
        )
        .unwrap();
        assert_eq!(
            config.finalize_options(),
            FinalizeOptions {
                scope: FinalizeScope::ExcludeLastStep,
                clamp: ClampMode::Off,
            }
        );
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
            [stats]
            quantiles = [0.1, 0.9]
            correct_last_step = false

            [output]
            format = "csv"
        "#;

        let config: McsumConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.stats.quantiles, vec![0.1, 0.9]);
        assert_eq!(config.finalize_scope(), FinalizeScope::ExcludeLastStep);
        assert_eq!(config.output.format, "csv");
        // Defaults should still apply
        assert_eq!(config.input.header_sentinel, "Time");
        assert_eq!(config.stats.progress_interval, 1000);
    }

    #[test]
    fn test_default_toml_parses() {
        let config: McsumConfig = toml::from_str(&McsumConfig::default_toml()).unwrap();
        assert_eq!(config, McsumConfig::default());
    }

    #[test]
    fn test_decoder_settings() {
        let mut config = McsumConfig::default();
        assert_eq!(config.decoder().unwrap().delimiter, '\t');

        config.input.delimiter = ",".to_string();
        assert_eq!(config.decoder().unwrap().delimiter, ',');

        config.input.delimiter = ";;".to_string();
        assert!(config.decoder().is_err());
        config.input.delimiter = String::new();
        assert!(config.decoder().is_err());
    }

    #[test]
    fn test_invalid_quantile() {
        let mut config = McsumConfig::default();
        config.stats.quantiles = vec![0.5, 1.5];
        assert!(config.quantile_targets().is_err());
    }
}
