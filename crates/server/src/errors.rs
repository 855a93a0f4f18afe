//! Error replies for the HTTP surface.
//!
//! Handlers return `Result<Json<T>, ApiReply>` and funnel every failure
//! through [`reject`], which classifies the error, logs it under a
//! correlation id, and keeps internals out of the response body. Callers
//! only ever see `{ "error": "<message>" }`.

use axum::http::StatusCode;
use axum::Json;
use ringforge_core::{ApplicationError, DomainError, InterfaceError};
use ringforge_db::repositories::RepositoryError;
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

/// JSON error body shared by every route.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

pub type ApiReply = (StatusCode, Json<ApiError>);

/// Fresh correlation id for one request. Logged, never returned in the body.
pub fn correlation_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Map an application error onto a status code and a caller-safe body.
pub fn reject(correlation_id: &str, error: ApplicationError) -> ApiReply {
    let interface = error.into_interface(correlation_id);
    let status = match &interface {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status.is_server_error() {
        error!(
            event_name = "api.request.failed",
            correlation_id = %correlation_id,
            error = %interface,
            "request failed"
        );
    } else {
        warn!(
            event_name = "api.request.rejected",
            correlation_id = %correlation_id,
            error = %interface,
            "request rejected"
        );
    }

    (status, Json(ApiError { error: interface.user_message() }))
}

pub fn domain(correlation_id: &str, error: DomainError) -> ApiReply {
    reject(correlation_id, ApplicationError::Domain(error))
}

/// Database faults surface as 503 with an opaque body; the real error goes
/// to the log only.
pub fn persistence(correlation_id: &str, error: RepositoryError) -> ApiReply {
    reject(correlation_id, ApplicationError::Persistence(error.to_string()))
}

/// Plain input rejection for request shapes the domain layer never sees.
pub fn bad_request(correlation_id: &str, message: impl Into<String>) -> ApiReply {
    let message = message.into();
    warn!(
        event_name = "api.request.rejected",
        correlation_id = %correlation_id,
        error = %message,
        "request rejected"
    );
    (StatusCode::BAD_REQUEST, Json(ApiError { error: message }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::Json;
    use ringforge_core::DomainError;
    use ringforge_db::repositories::RepositoryError;

    use super::{bad_request, domain, persistence};

    #[test]
    fn invalid_reference_is_a_bad_request_with_its_message() {
        let (status, Json(body)) = domain(
            "req-1",
            DomainError::InvalidReference { kind: "stone", id: "stone-missing".to_string() },
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "unknown stone `stone-missing`");
    }

    #[test]
    fn direct_lookup_miss_is_not_found() {
        let (status, Json(body)) =
            domain("req-2", DomainError::NotFound { kind: "configuration", id: "RCFG-1".to_string() });

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error, "configuration `RCFG-1` not found");
    }

    #[test]
    fn database_faults_stay_opaque_to_callers() {
        let (status, Json(body)) = persistence("req-3", RepositoryError::CorruptRecord {
            entity: "stone",
            id: "stone-round".to_string(),
            reason: "sizes_json is not valid JSON".to_string(),
        });

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(!body.error.contains("sizes_json"));
        assert_eq!(body.error, "The service is temporarily unavailable. Please retry shortly.");
    }

    #[test]
    fn bad_request_echoes_the_validation_message() {
        let (status, Json(body)) = bad_request("req-4", "carat query parameter is required");

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "carat query parameter is required");
    }
}
