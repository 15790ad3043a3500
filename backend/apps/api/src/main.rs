//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors stay in the
//! feature crates' own error types.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use academy::{
    AcademyAppState, AcademyConfig, CoinGeckoSource, MarketTicker, PgAcademyRepository,
    entitled_routes, member_routes, public_routes,
};
use anyhow::Context;
use auth::{
    AccessPolicy, AuthAppState, AuthConfig, GateState, HttpRoleVerifier, PgAuthRepository,
    auth_router, identify, require_access,
};
use axum::middleware::from_fn_with_state;
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,academy=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: errors here should not prevent server startup
    let auth_repo = PgAuthRepository::new(pool.clone());
    match auth_repo.cleanup_expired().await {
        Ok(sessions) => {
            tracing::info!(sessions_deleted = sessions, "Auth session cleanup completed");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Auth session cleanup failed, continuing anyway");
        }
    }

    // Auth
    let auth_config = auth_config()?;
    let auth_state = match env::var("ROLE_VERIFY_URL").ok().filter(|u| !u.is_empty()) {
        Some(url) => {
            tracing::info!(url = %url, "Role verification delegated to remote endpoint");
            let verifier = HttpRoleVerifier::new(url)?;
            AuthAppState::with_remote_verifier(auth_repo, auth_config, verifier)
        }
        None => AuthAppState::new(auth_repo, auth_config),
    };

    // Academy
    let academy_config = academy_config()?;
    let source = CoinGeckoSource::from_config(&academy_config)?;
    let (ticker, ticker_handle) = MarketTicker::new(Arc::new(source), academy_config.ticker_refresh);
    let ticker_task = ticker.spawn();

    let academy_state = AcademyAppState::new(
        PgAcademyRepository::new(pool.clone()),
        academy_config,
        ticker_handle,
    );

    // Route groups, each behind its access policy
    let public = public_routes(academy_state.clone()).route_layer(from_fn_with_state(
        auth_state.clone(),
        identify::<PgAuthRepository>,
    ));
    let members = member_routes(academy_state.clone()).route_layer(from_fn_with_state(
        GateState::new(auth_state.clone(), AccessPolicy::Authenticated),
        require_access::<PgAuthRepository>,
    ));
    let entitled = entitled_routes(academy_state).route_layer(from_fn_with_state(
        GateState::new(auth_state.clone(), AccessPolicy::Entitled),
        require_access::<PgAuthRepository>,
    ));

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/auth", auth_router(auth_state))
        .nest("/api", public.merge(members).merge(entitled))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env_parse("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 31113)))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    ticker_task.abort();
    Ok(())
}

fn auth_config() -> anyhow::Result<AuthConfig> {
    let base = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    };

    // Required in production; debug builds fall back to a random secret
    let session_secret = match env::var("SESSION_SECRET") {
        Ok(secret_b64) => decode_secret(&secret_b64)?,
        Err(_) if cfg!(debug_assertions) => base.session_secret,
        Err(_) => anyhow::bail!("SESSION_SECRET must be set in production"),
    };

    let password_pepper = env::var("PASSWORD_PEPPER")
        .ok()
        .filter(|p| !p.is_empty())
        .map(String::into_bytes);

    // Comma-separated peers allowed to set X-Forwarded-For
    let trusted_proxies = match env::var("TRUSTED_PROXIES") {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<IpAddr>()
                    .with_context(|| format!("TRUSTED_PROXIES: invalid address {s:?}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?,
        Err(_) => Vec::new(),
    };

    Ok(AuthConfig {
        session_secret,
        password_pepper,
        cookie_secure: env_parse("COOKIE_SECURE", base.cookie_secure)?,
        trusted_proxies,
        ..base
    })
}

fn academy_config() -> anyhow::Result<AcademyConfig> {
    let mut config = if cfg!(debug_assertions) {
        AcademyConfig::development()
    } else {
        AcademyConfig::default()
    };

    if let Ok(base) = env::var("MARKET_API_BASE") {
        config = config.with_market_api_base(base);
    }
    let refresh_secs = env_parse("TICKER_REFRESH_SECS", config.ticker_refresh.as_secs())?;
    config.ticker_refresh = Duration::from_secs(refresh_secs.max(1));

    Ok(config)
}

fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let secret_bytes = Engine::decode(&general_purpose::STANDARD, secret_b64.trim())
        .context("SESSION_SECRET is not valid base64")?;
    secret_bytes
        .try_into()
        .map_err(|_| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes"))
}

/// Parse an optional variable, falling back to `default` when unset
fn env_parse<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key}: {e}")),
        Err(_) => Ok(default),
    }
}
