use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};

pub const API_KEY_ENV: &str = "WIT_API_KEY";
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Key the server expects, None when authentication is disabled
pub fn expected_api_key() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty())
}

pub fn check_api_key(expected: Option<&str>, provided: Option<&str>) -> Result<(), (StatusCode, &'static str)> {
    let Some(expected) = expected else {
        return Ok(());
    };

    match provided {
        Some(key) if key == expected => Ok(()),
        Some(_) => Err((StatusCode::UNAUTHORIZED, "Invalid API key")),
        None => Err((StatusCode::UNAUTHORIZED, "Missing X-API-Key header")),
    }
}

pub async fn require_api_key(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let expected = expected_api_key();

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    check_api_key(expected.as_deref(), provided)?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_disabled_without_key() {
        assert!(check_api_key(None, None).is_ok());
        assert!(check_api_key(None, Some("anything")).is_ok());
    }

    #[test]
    fn test_key_checked_when_configured() {
        assert!(check_api_key(Some("secret"), Some("secret")).is_ok());
        assert_eq!(
            check_api_key(Some("secret"), Some("wrong")).unwrap_err(),
            (StatusCode::UNAUTHORIZED, "Invalid API key")
        );
        assert_eq!(
            check_api_key(Some("secret"), None).unwrap_err(),
            (StatusCode::UNAUTHORIZED, "Missing X-API-Key header")
        );
    }
}
