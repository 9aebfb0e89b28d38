use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow, bail, ensure};
use config::{Config, ConfigError, File};
use serde::Deserialize;
use usersearch::lookup::DEFAULT_ENDPOINT;
use usersearch::{DEFAULT_MIN_LENGTH, DEFAULT_QUIET_PERIOD, GateConfig, app_dirs};

use crate::cli::{CliArgs, SourceKind};

#[cfg(test)]
mod tests;

const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const MAX_QUIET_PERIOD_MS: u64 = 60_000;
const MAX_TIMEOUT_MS: u64 = 300_000;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    gate: GateSection,
    lookup: LookupSection,
    input: InputSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct GateSection {
    min_length: Option<usize>,
    quiet_period_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LookupSection {
    source: Option<String>,
    endpoint: Option<String>,
    file: Option<PathBuf>,
    timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct InputSection {
    keystroke_delay_ms: Option<u64>,
}

/// Where the resolved configuration fetches records from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupSource {
    Http { endpoint: String, timeout: Duration },
    File { path: PathBuf },
    Static,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub gate: GateConfig,
    pub source: LookupSource,
    pub keystroke_delay: Duration,
}

impl ResolvedConfig {
    pub fn print_summary(&self) {
        println!("Effective configuration:");
        println!("  Minimum length: {}", self.gate.min_length);
        println!("  Quiet period: {}ms", self.gate.quiet_period.as_millis());
        match &self.source {
            LookupSource::Http { endpoint, timeout } => {
                println!("  Source: http");
                println!("  Endpoint: {endpoint}");
                println!("  Timeout: {}ms", timeout.as_millis());
            }
            LookupSource::File { path } => {
                println!("  Source: file");
                println!("  File: {}", path.display());
            }
            LookupSource::Static => println!("  Source: static (built-in sample)"),
        }
        if !self.keystroke_delay.is_zero() {
            println!("  Keystroke delay: {}ms", self.keystroke_delay.as_millis());
        }
    }
}

pub fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
    let builder = build_config(cli)?;
    let mut raw: RawConfig = builder
        .try_deserialize()
        .map_err(|err| anyhow!("failed to deserialize configuration: {err}"))?;
    raw.apply_cli_overrides(cli);
    raw.resolve()
}

fn build_config(cli: &CliArgs) -> Result<Config> {
    let mut builder = Config::builder();

    if !cli.no_config {
        for path in default_config_files() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    for path in &cli.config {
        builder = builder.add_source(File::from(path.clone()).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("usersearch")
            .separator("__")
            .try_parsing(true),
    );

    builder.build().map_err(|err| match err {
        ConfigError::Frozen => anyhow!("configuration builder is frozen"),
        other => other.into(),
    })
}

fn default_config_files() -> Vec<PathBuf> {
    let mut files = Vec::new();

    if let Ok(dir) = app_dirs::get_config_dir() {
        files.push(dir.join("config.toml"));
    }

    if let Ok(current_dir) = env::current_dir() {
        files.push(current_dir.join(".usersearch.toml"));
        files.push(current_dir.join("usersearch.toml"));
    }

    files
}

impl RawConfig {
    fn apply_cli_overrides(&mut self, cli: &CliArgs) {
        if let Some(value) = cli.min_length {
            self.gate.min_length = Some(value);
        }
        if let Some(value) = cli.quiet_period_ms {
            self.gate.quiet_period_ms = Some(value);
        }
        if let Some(source) = cli.source {
            self.lookup.source = Some(source.as_str().to_string());
        }
        if let Some(endpoint) = cli.endpoint.clone() {
            self.lookup.endpoint = Some(endpoint);
        }
        if let Some(file) = cli.file.clone() {
            self.lookup.file = Some(file);
        }
        if let Some(value) = cli.timeout_ms {
            self.lookup.timeout_ms = Some(value);
        }
        if let Some(value) = cli.keystroke_delay_ms {
            self.input.keystroke_delay_ms = Some(value);
        }
    }

    fn resolve(self) -> Result<ResolvedConfig> {
        let min_length = self.gate.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
        ensure!(min_length >= 1, "gate.min_length must be at least 1");

        let quiet_period = match self.gate.quiet_period_ms {
            Some(ms) => {
                ensure!(
                    ms <= MAX_QUIET_PERIOD_MS,
                    "gate.quiet_period_ms must not exceed {MAX_QUIET_PERIOD_MS}"
                );
                Duration::from_millis(ms)
            }
            None => DEFAULT_QUIET_PERIOD,
        };

        let source = self.lookup.resolve()?;
        let keystroke_delay =
            Duration::from_millis(self.input.keystroke_delay_ms.unwrap_or_default());

        Ok(ResolvedConfig {
            gate: GateConfig {
                quiet_period,
                min_length,
            },
            source,
            keystroke_delay,
        })
    }
}

impl LookupSection {
    fn resolve(self) -> Result<LookupSource> {
        let kind = match self.source.as_deref() {
            Some(raw) => parse_source(raw)?,
            // A configured file implies the file source.
            None if self.file.is_some() => SourceKind::File,
            None => SourceKind::Http,
        };

        match kind {
            SourceKind::Http => {
                let endpoint = self
                    .endpoint
                    .map(|endpoint| endpoint.trim().to_string())
                    .filter(|endpoint| !endpoint.is_empty())
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
                ensure!(
                    endpoint.starts_with("http://") || endpoint.starts_with("https://"),
                    "lookup.endpoint must be an http(s) URL, got '{endpoint}'"
                );

                let timeout_ms = self.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS);
                ensure!(
                    (1..=MAX_TIMEOUT_MS).contains(&timeout_ms),
                    "lookup.timeout_ms must be between 1 and {MAX_TIMEOUT_MS}"
                );

                Ok(LookupSource::Http {
                    endpoint,
                    timeout: Duration::from_millis(timeout_ms),
                })
            }
            SourceKind::File => {
                let Some(path) = self.file else {
                    bail!("lookup.file is required for the file source");
                };
                Ok(LookupSource::File { path })
            }
            SourceKind::Static => Ok(LookupSource::Static),
        }
    }
}

fn parse_source(value: &str) -> Result<SourceKind> {
    match value.trim().to_ascii_lowercase().as_str() {
        "http" => Ok(SourceKind::Http),
        "file" => Ok(SourceKind::File),
        "static" => Ok(SourceKind::Static),
        other => bail!("unknown lookup source '{other}'"),
    }
}
