//! SafeHaven HTTP server.
//!
//! Reads configuration from `SAFE_HAVEN__*` environment variables, wires the
//! configured adapters into the application layer and serves the API.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use safe_haven::adapters::ai::{
    AnthropicConfig, AnthropicProvider, MockAIProvider, OpenAIConfig, OpenAIProvider,
};
use safe_haven::adapters::auth::{FirebaseConfig, FirebaseIdentityProvider, MockIdentityProvider};
use safe_haven::adapters::http::{app_router, AppState, RateLimiterState, CLIENT_SESSION_HEADER};
use safe_haven::adapters::rate_limiter::{InMemoryRateLimiter, RedisRateLimiter};
use safe_haven::adapters::store::{InMemoryDocumentStore, PostgresDocumentStore};
use safe_haven::application::handlers::{CompletionSettings, StructuredCompletion};
use safe_haven::application::{ClientSessionRegistry, SessionServices};
use safe_haven::config::{
    AiProvider, AppConfig, IdentityBackend, RateLimitBackend, ServerConfig, StoreBackend,
};
use safe_haven::domain::foundation::Timestamp;
use safe_haven::ports::{AIProvider, DocumentStore, IdentityProvider, RateLimiter};

type StartupError = Box<dyn std::error::Error + Send + Sync>;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
const RATE_LIMIT_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        ai = ?config.ai.primary_provider,
        identity = ?config.auth.provider,
        store = ?config.store.backend,
        rate_limit = ?config.rate_limit.backend,
        "Starting SafeHaven"
    );

    let provider = build_ai_provider(&config)?;
    let identity = build_identity_provider(&config)?;
    let store = build_document_store(&config).await?;
    let rate_limiter = RateLimiterState::new(build_rate_limiter(&config).await?)
        .with_trusted_proxies(config.rate_limit.trusted_proxy_list()?);

    let sessions = Arc::new(
        ClientSessionRegistry::new(
            SessionServices {
                identity,
                store: Arc::clone(&store),
            },
            config.server.session_ttl(),
        )
        .with_max_sessions(config.server.max_sessions),
    );
    sessions.spawn_sweeper(SESSION_SWEEP_INTERVAL);

    let completion = Arc::new(StructuredCompletion::new(
        provider,
        CompletionSettings {
            timeout: config.ai.timeout(),
            ..CompletionSettings::default()
        },
    ));

    let app = with_http_layers(
        app_router(AppState {
            sessions,
            store,
            completion,
            rate_limiter,
        }),
        &config.server,
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shut down");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_new(&server.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let json = server
        .is_production()
        .then(|| tracing_subscriber::fmt::layer().json());
    let pretty = (!server.is_production()).then(|| tracing_subscriber::fmt::layer().pretty());

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(pretty)
        .init();
}

fn build_ai_provider(config: &AppConfig) -> Result<Arc<dyn AIProvider>, StartupError> {
    let ai = &config.ai;
    let provider: Arc<dyn AIProvider> = match ai.primary_provider {
        AiProvider::OpenAI => {
            let mut openai = OpenAIConfig::new(ai.openai_api_key.clone().unwrap_or_default())
                .with_timeout(ai.timeout());
            if let Some(model) = &ai.model {
                openai = openai.with_model(model.clone());
            }
            Arc::new(OpenAIProvider::new(openai)?)
        }
        AiProvider::Anthropic => {
            let mut anthropic =
                AnthropicConfig::new(ai.anthropic_api_key.clone().unwrap_or_default())
                    .with_timeout(ai.timeout());
            if let Some(model) = &ai.model {
                anthropic = anthropic.with_model(model.clone());
            }
            Arc::new(AnthropicProvider::new(anthropic)?)
        }
        AiProvider::Mock => {
            tracing::warn!("Using mock completion provider");
            Arc::new(MockAIProvider::new())
        }
    };
    Ok(provider)
}

fn build_identity_provider(config: &AppConfig) -> Result<Arc<dyn IdentityProvider>, StartupError> {
    let auth = &config.auth;
    let provider: Arc<dyn IdentityProvider> = match auth.provider {
        IdentityBackend::Firebase => {
            let firebase = FirebaseConfig::new(auth.firebase_api_key.clone().unwrap_or_default())
                .with_base_url(auth.identity_toolkit_url.clone());
            Arc::new(FirebaseIdentityProvider::new(firebase)?)
        }
        IdentityBackend::Mock => {
            tracing::warn!("Using mock identity provider");
            Arc::new(MockIdentityProvider::new())
        }
    };
    Ok(provider)
}

async fn build_document_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>, StartupError> {
    let store_config = &config.store;
    let store: Arc<dyn DocumentStore> = match store_config.backend {
        StoreBackend::Postgres => {
            let url = store_config.database_url.as_deref().unwrap_or_default();
            let store = PostgresDocumentStore::connect(url, store_config.max_connections).await?;
            if store_config.run_migrations {
                store.migrate().await?;
                tracing::info!("Database migrations applied");
            }
            Arc::new(store)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory document store; data is lost on restart");
            Arc::new(InMemoryDocumentStore::new())
        }
    };
    Ok(store)
}

async fn build_rate_limiter(config: &AppConfig) -> Result<Arc<dyn RateLimiter>, StartupError> {
    let settings = &config.rate_limit;
    let limiter: Arc<dyn RateLimiter> = match settings.backend {
        RateLimitBackend::Redis => {
            let url = settings.redis_url.as_deref().unwrap_or_default();
            Arc::new(RedisRateLimiter::connect(url, settings.limits()).await?)
        }
        RateLimitBackend::Memory => {
            let limiter = Arc::new(InMemoryRateLimiter::new(settings.limits()));
            spawn_rate_limit_purge(Arc::clone(&limiter));
            limiter
        }
    };
    Ok(limiter)
}

fn spawn_rate_limit_purge(limiter: Arc<InMemoryRateLimiter>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(RATE_LIMIT_PURGE_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = limiter.purge_expired(Timestamp::now()).await;
            tracing::debug!(purged, "Purged expired rate limit windows");
        }
    });
}

fn with_http_layers(router: Router, server: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static("x-request-id");

    router
        .layer(cors_layer(server))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let client_session = HeaderName::from_static(CLIENT_SESSION_HEADER);
    let allow_origin = if origins.is_empty() && !server.is_production() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, client_session.clone()])
        .expose_headers([client_session, header::RETRY_AFTER])
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
