//! Bearer token authentication middleware for protecting API endpoints.
//!
//! This middleware extracts the access token from the Authorization header,
//! verifies it with the token service (signature, expiry and live session)
//! and injects the caller's [`AuthContext`] into the request.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use tessera_core::{
    domain::{ClaimSet, ExtraClaims},
    errors::{DomainError, TokenError},
};

use crate::app::AppState;
use crate::handlers::error::ApiError;

/// Authentication context injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Subject the access token was issued to
    pub subject: String,
    /// Identifier of the access token
    pub token_id: String,
    /// Extra claims carried by the token
    pub extra: ExtraClaims,
    /// The verified access token itself, needed to revoke it on logout
    pub access_token: String,
}

impl AuthContext {
    /// Creates an authentication context from verified claims
    pub fn from_claims(claims: ClaimSet, access_token: String) -> Result<Self, DomainError> {
        let token_id = claims.token_id.ok_or(TokenError::InvalidToken)?;
        Ok(Self {
            subject: claims.subject,
            token_id,
            extra: claims.extra,
            access_token,
        })
    }
}

/// Bearer authentication middleware factory
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtAuth;

impl JwtAuth {
    pub fn new() -> Self {
        Self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

/// Bearer authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let token = extract_bearer_token(&req);
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            // A missing header is reported like any other bad token
            let token = token.ok_or(ApiError(TokenError::InvalidToken.into()))?;

            let state = state.ok_or_else(|| {
                ApiError(DomainError::Internal {
                    message: "application state not configured".to_string(),
                })
            })?;

            let claims = state
                .token_service
                .verify_access_token(&token)
                .await
                .map_err(ApiError)?;
            let auth_context = AuthContext::from_claims(claims, token).map_err(ApiError)?;

            req.extensions_mut().insert(auth_context);

            service.call(req).await
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError(TokenError::InvalidToken.into()).into());

        ready(result)
    }
}
