use std::sync::Arc;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use crate::circulation::domain::CirculationService;
use crate::core::command::CommandError;

#[derive(Clone)]
pub struct AppState {
    pub(crate) service: Arc<dyn CirculationService>,
}

impl AppState {
    pub fn new(service: Arc<dyn CirculationService>) -> AppState {
        AppState {
            service,
        }
    }
}

pub type ServerError = (StatusCode, Json<CommandError>);

impl From<CommandError> for ServerError {
    fn from(err: CommandError) -> Self {
        let status = StatusCode::from_u16(err.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(err))
    }
}

// patron credential from `Authorization: Bearer <id>`, or the raw header value
pub(crate) fn credential(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let value = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
        _ => value,
    };
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
    use crate::core::command::{CommandError, FailureKind};
    use crate::core::controller::{credential, ServerError};

    #[tokio::test]
    async fn test_should_read_credential() {
        let mut headers = HeaderMap::new();
        assert_eq!(None, credential(&headers));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer 2391"));
        assert_eq!(Some("2391".to_string()), credential(&headers));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("2391"));
        assert_eq!(Some("2391".to_string()), credential(&headers));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(None, credential(&headers));
    }

    #[tokio::test]
    async fn test_should_use_command_status() {
        let (status, body) = ServerError::from(CommandError::new(FailureKind::MechanismConflict, "locked", 409));
        assert_eq!(StatusCode::CONFLICT, status);
        assert_eq!(FailureKind::MechanismConflict, body.0.kind);
    }
}
