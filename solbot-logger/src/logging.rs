use anyhow::Result;
use serde::Deserialize;
use std::{fs::File, str::FromStr, sync::Arc};
use tracing::Level;
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{
        self,
        writer::{BoxMakeWriter, MakeWriterExt},
    },
    prelude::*,
    Registry,
};

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Plain,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    /// Log level, e.g. "info", "debug", "trace".
    pub level: String,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Required if output is "file".
    pub file_path: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Plain,
            output: LogOutput::Stdout,
            file_path: None,
        }
    }
}

impl LogConfig {
    /// The configured level, falling back to `INFO` for unknown names.
    pub fn level(&self) -> Level {
        Level::from_str(&self.level).unwrap_or(Level::INFO)
    }
}

/// Installs the global `tracing` subscriber described by `config`.
///
/// Must be called at most once per process.
pub fn init(config: &LogConfig) -> Result<()> {
    let log_level = config.level();

    let writer = match config.output {
        LogOutput::Stdout => BoxMakeWriter::new(std::io::stdout.with_max_level(log_level)),
        LogOutput::Stderr => BoxMakeWriter::new(std::io::stderr.with_max_level(log_level)),
        LogOutput::File => {
            let file_path = config.file_path.as_deref().ok_or_else(|| {
                anyhow::anyhow!("Log output is 'file' but 'file_path' is not specified")
            })?;
            let log_file = Arc::new(File::create(file_path)?);
            BoxMakeWriter::new(log_file.with_max_level(log_level))
        }
    };

    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(config.output != LogOutput::File);
    let subscriber = Registry::default().with(LevelFilter::from_level(log_level));

    match config.format {
        LogFormat::Json => subscriber.with(layer.json()).try_init()?,
        LogFormat::Plain => subscriber.with(layer.pretty()).try_init()?,
    }

    Ok(())
}
