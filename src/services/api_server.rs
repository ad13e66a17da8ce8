// src/services/api_server.rs
//! API Server for certificate issuance and verification
//!
//! Thin HTTP transport over the two services:
//! - `POST /issue-certificate` issues a certificate for an authenticated professor
//! - `GET  /verify-certificate?id=<uuid>` verifies a certificate
//!
//! Callers authenticate with an HS256 bearer token whose `sub` claim is their
//! profile id. CORS is open so the verification page can be served from
//! another origin.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Query, State},
    http::{header, HeaderMap, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::error::CertificateError;
use crate::services::certificate_issuer::{CertificateIssuer, IssueRequest};
use crate::services::verifier::Verifier;
use crate::storage::{CertificateStore, ObjectStore};

/// Claims expected in bearer tokens.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    /// Profile id of the caller.
    pub sub: String,
    pub exp: usize,
}

/// Query string of the verification endpoint.
#[derive(Deserialize)]
struct VerifyQuery {
    id: Option<String>,
}

/// API server state containing all service dependencies
pub struct ApiServer<S, O> {
    /// Issuance service; `None` when no private key is configured
    issuer: Option<Arc<CertificateIssuer<S, O>>>,

    /// Verification service; `None` when no public key is configured
    verifier: Option<Arc<Verifier<S>>>,

    /// HS256 secret used to validate bearer tokens
    jwt_secret: Arc<String>,
}

// Implement Clone by hand so `S` and `O` need not be `Clone` for axum's State
impl<S, O> Clone for ApiServer<S, O> {
    fn clone(&self) -> Self {
        ApiServer {
            issuer: self.issuer.clone(),
            verifier: self.verifier.clone(),
            jwt_secret: Arc::clone(&self.jwt_secret),
        }
    }
}

impl<S: CertificateStore, O: ObjectStore> ApiServer<S, O> {
    /// Creates a new instance of the API server
    ///
    /// # Arguments
    /// * `issuer` - Issuance service, if this deployment signs certificates
    /// * `verifier` - Verification service, if this deployment verifies certificates
    /// * `jwt_secret` - Secret for validating bearer tokens
    pub fn new(
        issuer: Option<CertificateIssuer<S, O>>,
        verifier: Option<Verifier<S>>,
        jwt_secret: impl Into<String>,
    ) -> Self {
        ApiServer {
            issuer: issuer.map(Arc::new),
            verifier: verifier.map(Arc::new),
            jwt_secret: Arc::new(jwt_secret.into()),
        }
    }

    /// Builds the router with all routes and the CORS layer.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                HeaderName::from_static("x-client-info"),
                HeaderName::from_static("apikey"),
            ]);

        Router::new()
            .route("/issue-certificate", post(Self::issue_certificate_handler))
            .route("/verify-certificate", get(Self::verify_certificate_handler))
            .layer(cors)
            .with_state(self.clone())
    }

    /// Starts the API server and begins listening for requests
    ///
    /// # Arguments
    /// * `addr` - Socket address to bind to (e.g., "127.0.0.1:3000")
    pub async fn run(&self, addr: SocketAddr) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("API server listening on http://{}", addr);
        axum::serve(listener, self.router()).await
    }

    /// Resolves the caller's profile id from the `Authorization` header.
    fn authenticate(&self, headers: &HeaderMap) -> Result<String, Response> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| (StatusCode::UNAUTHORIZED, "Missing auth").into_response())?;

        let key = DecodingKey::from_secret(self.jwt_secret.as_bytes());
        decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims.sub)
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                (StatusCode::UNAUTHORIZED, "Invalid token").into_response()
            })
    }

    // =====================
    // Certificate Handlers
    // =====================

    /// Issues a certificate
    ///
    /// # Endpoint
    /// POST /issue-certificate
    ///
    /// # Request Body
    /// JSON payload `{ "student_id": ..., "course_id": ... }`
    ///
    /// # Responses
    /// - 200 OK: Returns the issued certificate, its facts and signature
    /// - 400 Bad Request: Body is not valid JSON
    /// - 401 Unauthorized: Missing or invalid bearer token
    /// - 403 Forbidden: Caller may not issue this certificate
    /// - 404 Not Found: Course or student does not exist
    /// - 500 Internal Server Error: Rendering, upload, signing or storage failed
    async fn issue_certificate_handler(
        State(state): State<Self>,
        headers: HeaderMap,
        payload: Result<Json<IssueRequest>, JsonRejection>,
    ) -> Response {
        let caller_id = match state.authenticate(&headers) {
            Ok(caller_id) => caller_id,
            Err(response) => return response,
        };

        let Json(request) = match payload {
            Ok(payload) => payload,
            Err(rejection) => {
                debug!("Invalid issuance body: {}", rejection);
                return (StatusCode::BAD_REQUEST, "Invalid JSON body").into_response();
            }
        };

        let Some(issuer) = state.issuer.as_ref() else {
            return (StatusCode::SERVICE_UNAVAILABLE, "Issuance is not configured").into_response();
        };

        match issuer.issue(&caller_id, &request).await {
            Ok(issued) => (StatusCode::OK, Json(issued)).into_response(),
            Err(e) => error_response(e),
        }
    }

    /// Verifies a certificate
    ///
    /// # Endpoint
    /// GET /verify-certificate?id=<uuid>
    ///
    /// # Responses
    /// - 200 OK: Returns the verification report (valid or not)
    /// - 400 Bad Request: Missing `id`
    /// - 404 Not Found: No certificate with this id
    /// - 500 Internal Server Error: Verification could not be carried out
    async fn verify_certificate_handler(
        State(state): State<Self>,
        Query(query): Query<VerifyQuery>,
    ) -> Response {
        let Some(id) = query.id.filter(|id| !id.trim().is_empty()) else {
            return (StatusCode::BAD_REQUEST, "Missing certificate id").into_response();
        };

        let Some(verifier) = state.verifier.as_ref() else {
            return (StatusCode::SERVICE_UNAVAILABLE, "Verification is not configured")
                .into_response();
        };

        match verifier.verify_certificate(&id).await {
            Ok(report) => (StatusCode::OK, Json(report)).into_response(),
            Err(e) => error_response(e),
        }
    }
}

/// HTTP status for a service error.
pub fn status_for(err: &CertificateError) -> StatusCode {
    match err {
        CertificateError::NotProfessor
        | CertificateError::NotCourseOwner(_)
        | CertificateError::EnrollmentIncomplete { .. } => StatusCode::FORBIDDEN,
        CertificateError::StudentNotFound(_)
        | CertificateError::CourseNotFound(_)
        | CertificateError::CertificateNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: CertificateError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        error!("Request failed: {}", err);
        (status, "Internal Server Error").into_response()
    } else {
        debug!("Request rejected: {}", err);
        (status, err.to_string()).into_response()
    }
}
