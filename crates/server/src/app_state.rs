use axum::http::HeaderMap;
use server_api::ApiContext;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::API_KEY_HEADER,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) api: ApiContext,
    pub(crate) api_key: Option<String>,
}

impl AppState {
    /// Requests must present the configured key in the `apikey` header; no key configured means open access.
    pub(crate) fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.api_key.as_deref() else {
            return Ok(());
        };
        let presented = headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented == Some(expected) {
            Ok(())
        } else {
            Err(ApiError::new(
                ErrorCode::Unauthorized,
                "missing or invalid apikey header",
            ))
        }
    }
}
