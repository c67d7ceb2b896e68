use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Minimal file storage web service")]
pub struct Args {
    /// Host to bind to (overrides FILEHUB_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides FILEHUB_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory where uploaded files are stored (overrides FILEHUB_STORAGE_DIR)
    #[arg(long)]
    pub storage_dir: Option<String>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_host = env::var("FILEHUB_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("FILEHUB_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing FILEHUB_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 5001,
            Err(err) => return Err(err).context("reading FILEHUB_PORT"),
        };
        let env_storage =
            env::var("FILEHUB_STORAGE_DIR").unwrap_or_else(|_| "./data/uploads".into());

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            storage_dir: args.storage_dir.unwrap_or(env_storage),
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
