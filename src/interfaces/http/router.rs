//! API Router with Swagger UI

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{GateService, UserService};
use crate::auth::jwt::JwtConfig;
use crate::auth::middleware::{admin_middleware, auth_middleware, AuthState};
use crate::config::RateLimitConfig;
use crate::infrastructure::database::repositories::{LogRepository, UserRepository};
use crate::infrastructure::mqtt::CommandPublisher;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::modules::{auth, gates, health, logs, metrics, profile, users};
use crate::interfaces::http::{SharedGateService, SharedUserService};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::login,
        auth::get_current_user,
        auth::change_password,
        // Gates
        gates::list_gates,
        gates::dispatch_command,
        // Users
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::reset_password,
        users::delete_user,
        // Audit log
        logs::list_logs,
        // Profile
        profile::get_profile,
        profile::upload_profile_image,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            PaginatedResponse<users::UserDto>,
            PaginatedResponse<logs::LogEntryDto>,
            PaginationParams,
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            auth::ChangePasswordRequest,
            // Gates
            gates::GateDto,
            gates::DispatchDto,
            // Users
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::ResetPasswordRequest,
            // Audit log
            logs::LogEntryDto,
            // Health
            health::HealthStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check"),
        (name = "Authentication", description = "Login (JWT), current user, password change"),
        (name = "Gates", description = "Gate open/close commands over MQTT"),
        (name = "Users", description = "User administration: accounts, roles, access windows"),
        (name = "Audit Log", description = "Who opened which gate, and when"),
        (name = "Profile", description = "Own account info and profile image"),
    ),
    info(
        title = "Gate Central API",
        version = "1.0.0",
        description = "REST API for authenticated gate control over MQTT",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Everything the router needs, gathered in one place.
pub struct RouterDeps {
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    /// Reference timezone for the access-window check
    pub timezone: chrono_tz::Tz,
    pub publisher: Arc<dyn CommandPublisher>,
    pub upload_dir: PathBuf,
    /// `None` disables the `/metrics` endpoint
    pub metrics_handle: Option<PrometheusHandle>,
    /// `None` disables login rate limiting (tests)
    pub rate_limit: Option<RateLimitConfig>,
}

/// Create the API router with all routes
pub fn create_api_router(deps: RouterDeps) -> Router {
    let user_repo = Arc::new(UserRepository::new(deps.db.clone()));
    let log_repo = Arc::new(LogRepository::new(deps.db.clone()));

    let user_service: SharedUserService =
        Arc::new(UserService::new(user_repo, deps.jwt_config.clone()));
    let gate_service: SharedGateService =
        Arc::new(GateService::new(deps.publisher, log_repo.clone()));

    let middleware_state = AuthState {
        jwt_config: deps.jwt_config,
        db: deps.db.clone(),
        timezone: deps.timezone,
    };

    let auth_handler_state = auth::AuthHandlerState {
        users: user_service.clone(),
    };

    // Login (public, rate-limited per client IP)
    let mut login_routes = Router::new()
        .route("/login", post(auth::login))
        .with_state(auth_handler_state.clone());
    if let Some(rl) = &deps.rate_limit {
        if let Some(conf) = GovernorConfigBuilder::default()
            .per_second(rl.login_replenish_secs)
            .burst_size(rl.login_burst)
            .finish()
        {
            login_routes = login_routes.layer(GovernorLayer::new(Arc::new(conf)));
        }
    }

    // Session-holder routes
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_user))
        .route("/change-password", put(auth::change_password))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_handler_state);

    let gate_routes = Router::new()
        .route("/", get(gates::list_gates))
        .route("/{gate_id}/{action}", post(gates::dispatch_command))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(gates::GateHandlerState {
            gates: gate_service,
        });

    let profile_routes = Router::new()
        .route("/", get(profile::get_profile))
        .route("/image", post(profile::upload_profile_image))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(profile::ProfileHandlerState {
            users: user_service.clone(),
            upload_dir: deps.upload_dir.clone(),
        });

    // Admin-only routes: auth runs first (outer), then the role check.
    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/{id}/password", put(users::reset_password))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(users::UserHandlerState {
            users: user_service,
        });

    let log_routes = Router::new()
        .route("/", get(logs::list_logs))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(logs::LogHandlerState { logs: log_repo });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let mut router = Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check).with_state(health::HealthState { db: deps.db }))
        .nest("/api/v1/auth", login_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        .nest("/api/v1/gates", gate_routes)
        .nest("/api/v1/profile", profile_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/logs", log_routes)
        .nest_service(
            "/static/profile-images",
            ServeDir::new(&deps.upload_dir),
        );

    if let Some(handle) = deps.metrics_handle {
        router = router.route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics::MetricsState { handle }),
        );
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}
