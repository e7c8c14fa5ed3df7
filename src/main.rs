use anyhow::Result;
use network_inventory::{
    auth::AdminTokens, config, db, routes, services::content_store::UploadLayout,
    state::AppState,
};
use std::{io::ErrorKind, path::Path, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + migrate flag ---
    let (cfg, migrate) = config::AppConfig::from_env_and_args()?;

    tracing::info!(
        host = %cfg.host,
        port = cfg.port,
        database_url = %cfg.database_url,
        uploads_dir = %cfg.uploads_dir,
        mime_type = %cfg.mime_type,
        home_tenant = cfg.home_tenant,
        admin_tokens = cfg.admin_tokens.len(),
        "Starting network-inventory"
    );

    // --- Check upload root; scans never write to it ---
    if !Path::new(&cfg.uploads_dir).is_dir() {
        tracing::warn!(
            "Upload root {} is missing; every file will be reported as missing",
            cfg.uploads_dir
        );
    }

    // --- Initialize SQLite connection ---
    let db = Arc::new(db::connect(&cfg.database_url).await?);

    // --- Handle migration mode ---
    if migrate {
        db::run_migrations(&db).await?;
        tracing::info!("Database migration complete.");
        return Ok(()); // exit after migration
    }

    let admin_tokens = AdminTokens::new(cfg.admin_tokens.clone());
    if admin_tokens.is_empty() {
        tracing::warn!("No admin tokens configured; every admin request will be denied");
    }

    // --- Initialize core service ---
    let layout = UploadLayout {
        uploads_dir: cfg.uploads_dir.clone().into(),
        scheme: cfg.public_scheme.clone(),
        uploads_url_path: cfg.uploads_url_path.clone(),
        home_tenant: cfg.home_tenant,
    };
    let state = AppState::new(db, layout, cfg.mime_type.clone(), admin_tokens);

    // --- Build router ---
    let app = routes::routes::app(state);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
