//! HTTP Basic authentication for the dashboard route.

use axum::extract::{Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use base64::Engine;

use crate::state::AppState;

/// Reject dashboard requests without valid Basic credentials.
///
/// A dashboard with no configured password is treated as locked, not
/// open: every request is rejected until a password is set.
pub async fn basic_auth(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let dashboard = &state.config().dashboard;
    let Some(expected_password) = dashboard.get_password() else {
        tracing::warn!("dashboard request rejected, no password configured");
        return unauthorized();
    };

    let provided = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(decode_basic);

    match provided {
        Some((username, password))
            if username == dashboard.username && password == expected_password =>
        {
            next.run(request).await
        }
        _ => unauthorized(),
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"provia\"")],
        "unauthorized",
    )
        .into_response()
}

/// Parse an `Authorization: Basic <base64>` header into (username, password).
fn decode_basic(header_value: &str) -> Option<(String, String)> {
    let encoded = header_value.strip_prefix("Basic ")?;
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_well_formed_credentials() {
        let encoded = base64::engine::general_purpose::STANDARD.encode("admin:s3cret");
        let creds = decode_basic(&format!("Basic {encoded}"));
        assert_eq!(
            creds,
            Some(("admin".to_string(), "s3cret".to_string()))
        );
    }

    #[test]
    fn rejects_non_basic_schemes_and_garbage() {
        assert_eq!(decode_basic("Bearer abc"), None);
        assert_eq!(decode_basic("Basic not-base64!!"), None);
        let no_colon = base64::engine::general_purpose::STANDARD.encode("adminonly");
        assert_eq!(decode_basic(&format!("Basic {no_colon}")), None);
    }
}
