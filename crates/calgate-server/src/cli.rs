//! Command-line interface definition.

use std::path::PathBuf;

use calgate_core::TracingOutputFormat;
use clap::Parser;

use crate::config::ServerConfig;
use crate::error::ServerResult;

/// calgate - Domain-scoped HTTP facade over Google Calendar
#[derive(Debug, Parser)]
#[command(name = "calgate")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "CALGATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "CALGATE_BIND")]
    pub bind: Option<String>,

    /// Path to the credential descriptor (JSON keyed by domain)
    #[arg(long, env = "CREDENTIALS")]
    pub credentials: Option<PathBuf>,

    /// User impersonated by every service account
    #[arg(long, env = "CALGATE_SUBJECT")]
    pub subject: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long)]
    pub log_format: Option<TracingOutputFormat>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    /// Load and validate the credentials, then exit
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    /// Resolves the effective configuration: file first, then flags.
    pub fn resolve_config(&self) -> ServerResult<ServerConfig> {
        let config = match &self.config {
            Some(path) => ServerConfig::load_from(path)?,
            None => ServerConfig::default(),
        };
        Ok(self.apply(config))
    }

    /// Applies command-line overrides to `config`.
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(bind) = &self.bind {
            config.bind = bind.clone();
        }
        if let Some(credentials) = &self.credentials {
            config.credentials = Some(credentials.clone());
        }
        if let Some(subject) = &self.subject {
            config.impersonation_subject = Some(subject.clone()).filter(|s| !s.is_empty());
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        config
    }
}
