use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use http::HeaderValue;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use storefront_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }
    let db_arc = Arc::new(db_pool);

    // Auth service shared by login handler and middleware
    let auth_service = Arc::new(api::auth::AuthService::new(
        cfg.jwt_secret.clone(),
        cfg.session_ttl_secs,
    ));

    // Mail transport: HTTP relay when configured, log-only fallback otherwise
    let transport: Arc<dyn api::notifications::MailTransport> = match &cfg.mailer_endpoint {
        Some(endpoint) => {
            info!("Mail relay configured: {}", endpoint);
            Arc::new(api::notifications::HttpMailer::new(endpoint.clone()))
        }
        None => {
            info!("No mail relay configured; order notifications will be logged");
            Arc::new(api::notifications::LogMailer)
        }
    };
    let notifier = Arc::new(api::notifications::Notifier::new(
        transport,
        cfg.admin_email.clone(),
        cfg.mail_from.clone(),
    ));

    let services = api::handlers::AppServices::new(db_arc.clone(), auth_service.clone());

    let app_state = api::AppState {
        db: db_arc,
        auth: auth_service,
        services,
        notifier,
    };

    // Build CORS layer from config; permissive when no origins are listed
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    let cors_layer = match configured_origins {
        Some(origins) => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };

    let app = api::router_with_cors(app_state, cors_layer);

    let host: std::net::IpAddr = cfg
        .host
        .parse()
        .with_context(|| format!("invalid listen host {:?}", cfg.host))?;
    let addr = SocketAddr::from((host, cfg.port));
    info!("storefront-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
