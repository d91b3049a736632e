//! Application state and factory
//!
//! This module holds the state shared by every worker and provides the
//! factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpResponse};
use tessera_core::repositories::SessionStore;
use tessera_core::services::{CredentialVerifier, TokenService};
use tessera_shared::errors::{error_codes, ErrorResponse};

use crate::handlers::error::json_error_handler;
use crate::middleware::auth::JwtAuth;
use crate::routes::auth::{login, logout, refresh_token};
use crate::routes::todo::create_todo;

/// Token service over whichever session store the deployment selected
pub type SharedTokenService = TokenService<Arc<dyn SessionStore>>;

/// Application state that holds shared services
pub struct AppState {
    pub token_service: Arc<SharedTokenService>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn new(token_service: SharedTokenService, credentials: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            token_service: Arc::new(token_service),
            credentials,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    app_state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        // Add application state
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(Logger::default())
        // Health check endpoint
        .route("/health", web::get().to(health_check))
        // API v1 routes
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(login))
                        .route("/refresh", web::post().to(refresh_token))
                        .service(
                            web::resource("/logout")
                                .route(web::post().to(logout))
                                .wrap(JwtAuth::new()),
                        ),
                )
                .service(
                    web::resource("/todos")
                        .route(web::post().to(create_todo))
                        .wrap(JwtAuth::new()),
                ),
        )
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

/// Health check endpoint handler
///
/// Reports 503 when the session store does not answer.
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store = state.token_service.store();
    let store_reachable = store.ping().await.is_ok();

    let mut response = if store_reachable {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };

    response.json(serde_json::json!({
        "status": if store_reachable { "healthy" } else { "degraded" },
        "service": "tessera-api",
        "version": env!("CARGO_PKG_VERSION"),
        "revocation": store.tracks_sessions(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
