use anyhow::{Context, Result};
use clap::Parser;
use std::env;

use crate::models::tenant::TenantId;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub uploads_dir: String,
    pub public_scheme: String,
    pub uploads_url_path: String,
    pub mime_type: String,
    pub home_tenant: TenantId,
    pub admin_tokens: Vec<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Network-wide document inventory service")]
pub struct Args {
    /// Host to bind to (overrides NETWORK_INVENTORY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides NETWORK_INVENTORY_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL of the host content store (overrides NETWORK_INVENTORY_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Upload root of the home tenant (overrides NETWORK_INVENTORY_UPLOADS_DIR)
    #[arg(long)]
    pub uploads_dir: Option<String>,

    /// Scheme used for public file links (overrides NETWORK_INVENTORY_PUBLIC_SCHEME)
    #[arg(long)]
    pub public_scheme: Option<String>,

    /// Upload path below each tenant's URL prefix (overrides NETWORK_INVENTORY_UPLOADS_URL_PATH)
    #[arg(long)]
    pub uploads_url_path: Option<String>,

    /// MIME type to inventory (overrides NETWORK_INVENTORY_MIME_TYPE)
    #[arg(long)]
    pub mime_type: Option<String>,

    /// Tenant whose uploads live directly in the upload root (overrides NETWORK_INVENTORY_HOME_TENANT)
    #[arg(long)]
    pub home_tenant: Option<TenantId>,

    /// Comma-separated admin bearer tokens (overrides NETWORK_INVENTORY_ADMIN_TOKENS)
    #[arg(long, value_delimiter = ',')]
    pub admin_tokens: Option<Vec<String>>,

    /// Run migrations and exit
    #[arg(long)]
    pub migrate: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and migrate flag.
    pub fn from_env_and_args() -> Result<(Self, bool)> {
        // Parse CLI once
        let args = Args::parse();
        let migrate = args.migrate;
        Ok((Self::from_args(args)?, migrate))
    }

    /// Merge parsed CLI args over environment variables and defaults.
    pub fn from_args(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env_or("NETWORK_INVENTORY_HOST", "0.0.0.0");
        let env_port = parse_env("NETWORK_INVENTORY_PORT", 3000u16)?;
        let env_db = env_or(
            "NETWORK_INVENTORY_DATABASE_URL",
            "sqlite://./data/meta/network_inventory.db",
        );
        let env_uploads = env_or("NETWORK_INVENTORY_UPLOADS_DIR", "./data/uploads");
        let env_scheme = env_or("NETWORK_INVENTORY_PUBLIC_SCHEME", "https");
        let env_url_path = env_or("NETWORK_INVENTORY_UPLOADS_URL_PATH", "wp-content/uploads");
        let env_mime = env_or("NETWORK_INVENTORY_MIME_TYPE", "application/pdf");
        let env_home = parse_env("NETWORK_INVENTORY_HOME_TENANT", 1 as TenantId)?;
        let env_tokens = env::var("NETWORK_INVENTORY_ADMIN_TOKENS")
            .map(|v| v.split(',').map(str::to_string).collect())
            .unwrap_or_default();

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
            uploads_dir: args.uploads_dir.unwrap_or(env_uploads),
            public_scheme: args.public_scheme.unwrap_or(env_scheme),
            uploads_url_path: args.uploads_url_path.unwrap_or(env_url_path),
            mime_type: args.mime_type.unwrap_or(env_mime),
            home_tenant: args.home_tenant.unwrap_or(env_home),
            admin_tokens: args.admin_tokens.unwrap_or(env_tokens),
        };

        if cfg.home_tenant <= 0 {
            anyhow::bail!("home tenant must be positive, got {}", cfg.home_tenant);
        }

        Ok(cfg)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .parse::<T>()
            .with_context(|| format!("parsing {} value `{}`", key, value)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err).with_context(|| format!("reading {}", key)),
    }
}
