use crate::settings::Settings;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::error::ApiError;

/// Accepts the configured token either as a bearer header or as the
/// `token` query parameter; the header wins when both are present.
pub fn verify_token(
    settings: &Settings,
    auth: Option<Authorization<Bearer>>,
    query_token: Option<&str>,
) -> Result<(), ApiError> {
    let provided = auth.as_ref().map(|a| a.token()).or(query_token);
    if provided == Some(settings.auth_token.as_str()) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized(
            "Invalid authentication token".into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;

    fn test_settings() -> Settings {
        Settings {
            gemini_api_key: "test-key".to_string(),
            gemini_base_url: Url::parse("https://example.com").unwrap(),
            gemini_model: "gemini-2.0-flash".to_string(),
            output_dir: "calendars".to_string(),
            debug: false,
            auth_token: "secret".to_string(),
            enable_swagger: true,
            port: 8080,
        }
    }

    #[test]
    fn test_verify_token_header() {
        let settings = test_settings();
        let auth = Authorization::bearer("secret").unwrap();
        assert!(verify_token(&settings, Some(auth), None).is_ok());
    }

    #[test]
    fn test_verify_token_query() {
        let settings = test_settings();
        assert!(verify_token(&settings, None, Some("secret")).is_ok());
        assert!(verify_token(&settings, None, Some("bad")).is_err());
    }
}
