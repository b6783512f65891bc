//! HTTP front for the dashboard
//!
//! Proxies login/verify/logout to the auth API and answers with consolidated
//! permissions, so the browser never sees an unconsolidated role graph. Also
//! serves the permission catalog to administrators.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::AuthBackend;
use crate::catalog::{self, Bundle, BUNDLES};
use crate::error::Error;
use crate::model::{AuthPayload, Credentials, LoggedUser, Permission};
use crate::session::Session;

// ============================================================================
// State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn AuthBackend>,
}

impl AppState {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self { success: false, data: None, error: Some(msg.into()) }
    }
}

/// What the browser keeps for authorization decisions
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionView {
    pub user: Option<LoggedUser>,
    pub roles: Vec<String>,
    pub permissions: Vec<Permission>,
}

impl SessionView {
    fn from_session(session: Session) -> Self {
        let roles = session.grants.roles().iter().map(|r| r.name.clone()).collect();
        let permissions = session.grants.permissions().to_vec();
        Self { user: Some(session.user), roles, permissions }
    }
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub permission: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub permission: Option<String>,
    pub allowed: bool,
    pub role: Option<String>,
    pub has_role: bool,
}

/// Needed for every `/catalog` route
pub const VIEW_CATALOG: &str = "system-administration.permissions.view";

type ApiError = (StatusCode, Json<ApiResponse<()>>);

fn status_of(e: &Error) -> StatusCode {
    match e {
        Error::NotAuthenticated | Error::SessionExpired => StatusCode::UNAUTHORIZED,
        Error::Upstream { .. } | Error::Transport(_) => StatusCode::BAD_GATEWAY,
        Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::BAD_REQUEST,
    }
}

fn api_error(e: Error) -> ApiError {
    (status_of(&e), Json(ApiResponse::err(e.to_string())))
}

/// Token from `Authorization: Bearer <token>`; the scheme is case-insensitive
fn bearer(headers: &HeaderMap) -> Result<&str, Error> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim())
        .filter(|t| !t.is_empty())
        .ok_or(Error::NotAuthenticated)
}

async fn resolve(state: &AppState, headers: &HeaderMap) -> Result<Session, Error> {
    let token = bearer(headers)?;
    let payload = state.backend.verify(token).await?;
    Ok(Session::from_payload(payload))
}

// ============================================================================
// Guard
// ============================================================================

async fn guard(state: AppState, permission: &'static str, mut req: Request, next: Next) -> Response {
    let headers = req.headers().clone();
    let session = match resolve(&state, &headers).await {
        Ok(s) => s,
        Err(e) => return api_error(e).into_response(),
    };
    if !session.grants.has_permission(permission) {
        tracing::info!(user = %session.user.username, permission, "forbidden");
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<()>::err(format!("missing permission {permission}"))),
        )
            .into_response();
    }
    req.extensions_mut().insert(Arc::new(session));
    next.run(req).await
}

/// Reject requests whose session lacks `permission`: 401 without a valid
/// token, 403 when the permission is absent.
pub fn require_permission(
    router: Router<AppState>,
    state: &AppState,
    permission: &'static str,
) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        state.clone(),
        move |State(s): State<AppState>, req: Request, next: Next| guard(s, permission, req, next),
    ))
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> Result<Json<ApiResponse<AuthPayload>>, ApiError> {
    let payload = state.backend.login(&creds).await.map_err(|e| {
        tracing::warn!(user = %creds.username, error = %e, "login rejected");
        api_error(e)
    })?;
    let session = Session::from_payload(payload);
    tracing::info!(user = %session.user.username, permissions = session.grants.len(), "login");
    Ok(Json(ApiResponse::ok(AuthPayload { token: session.token, user: session.user })))
}

async fn verify(State(state): State<AppState>, headers: HeaderMap) -> (StatusCode, Json<ApiResponse<SessionView>>) {
    match resolve(&state, &headers).await {
        Ok(session) => (StatusCode::OK, Json(ApiResponse::ok(SessionView::from_session(session)))),
        Err(e) => {
            tracing::debug!(error = %e, "verify failed");
            let body = ApiResponse {
                success: false,
                data: Some(SessionView::default()),
                error: Some(e.to_string()),
            };
            // Any verify failure means the caller must drop its grants
            let status = match e {
                Error::Upstream { .. } | Error::Transport(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::UNAUTHORIZED,
            };
            (status, Json(body))
        }
    }
}

async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<ApiResponse<()>>, ApiError> {
    let token = bearer(&headers).map_err(api_error)?;
    state.backend.logout(token).await.map_err(api_error)?;
    Ok(Json(ApiResponse::ok(())))
}

async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(q): Query<CheckQuery>,
) -> Result<Json<ApiResponse<CheckResult>>, ApiError> {
    let session = resolve(&state, &headers).await.map_err(api_error)?;
    let allowed = q.permission.as_deref().is_some_and(|p| session.grants.has_permission(p));
    let has_role = q.role.as_deref().is_some_and(|r| session.grants.has_role(r));
    Ok(Json(ApiResponse::ok(CheckResult { permission: q.permission, allowed, role: q.role, has_role })))
}

async fn catalog_permissions(Extension(session): Extension<Arc<Session>>) -> Json<ApiResponse<Vec<String>>> {
    tracing::debug!(user = %session.user.username, "catalog permissions");
    Json(ApiResponse::ok(catalog::all_permissions()))
}

async fn catalog_bundles(Extension(session): Extension<Arc<Session>>) -> Json<ApiResponse<&'static [Bundle]>> {
    tracing::debug!(user = %session.user.username, "catalog bundles");
    Json(ApiResponse::ok(BUNDLES))
}

async fn catalog_read_only(Extension(session): Extension<Arc<Session>>) -> Json<ApiResponse<Vec<String>>> {
    tracing::debug!(user = %session.user.username, "catalog read-only");
    Json(ApiResponse::ok(catalog::read_only_permissions()))
}

// ============================================================================
// Router
// ============================================================================

/// Full application router
pub fn router(state: AppState) -> Router {
    let catalog_routes = Router::new()
        .route("/catalog/permissions", get(catalog_permissions))
        .route("/catalog/bundles", get(catalog_bundles))
        .route("/catalog/read-only", get(catalog_read_only));
    let catalog_routes = require_permission(catalog_routes, &state, VIEW_CATALOG);

    Router::new()
        .route("/health", get(health))
        .route("/session/login", post(login))
        .route("/session/verify", get(verify))
        .route("/session/logout", post(logout))
        .route("/session/check", get(check))
        .merge(catalog_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
