//! Client side of Creatorverse: the data access client for the `creators` table and the
//! UI-independent controllers (forms, delete confirmation, view loading) built on top of it.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use shared::{
    domain::{Creator, CreatorId},
    protocol::{
        creators_route, id_eq_filter, IdOrder, API_KEY_HEADER, PREFER_HEADER,
        RETURN_REPRESENTATION,
    },
    schema::CreatorRecord,
};
use thiserror::Error;
use tracing::{debug, warn};

pub mod confirm;
pub mod form;
pub mod route;
pub mod views;

pub use confirm::{DeleteConfirmation, DeleteOutcome, DeletePhase};
pub use form::{FormController, FormMode, FormPhase, SubmitOutcome, SubmitRejection, SubmitRequest};
pub use route::Route;
pub use views::{CreatorCard, DetailView, EditView, ListView, LoadState, LoadToken};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("creator {id} not found")]
    NotFound { id: CreatorId },
    #[error("backend error: {message}")]
    Backend {
        status: Option<u16>,
        message: String,
    },
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            status: None,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Backend {
            status: err.status().map(|status| status.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Table operations behind every view. Implementations hold no cache.
#[async_trait]
pub trait CreatorStore: Send + Sync {
    /// All rows, ascending by id.
    async fn list_all(&self) -> Result<Vec<Creator>, StoreError>;
    async fn get_by_id(&self, id: CreatorId) -> Result<Creator, StoreError>;
    async fn insert(&self, record: &CreatorRecord) -> Result<Creator, StoreError>;
    /// Replaces every column of the row.
    async fn update(&self, id: CreatorId, record: &CreatorRecord) -> Result<Creator, StoreError>;
    /// Succeeds whether or not the row existed.
    async fn delete_by_id(&self, id: CreatorId) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn table_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), creators_route())
    }
}

pub struct HttpCreatorStore {
    http: Client,
    config: BackendConfig,
}

impl HttpCreatorStore {
    pub fn new(config: BackendConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(http: Client, config: BackendConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let builder = self.http.request(method, self.config.table_url());
        match self.config.api_key.as_deref() {
            Some(key) => builder.header(API_KEY_HEADER, key).bearer_auth(key),
            None => builder,
        }
    }

    async fn fetch_rows(&self, builder: RequestBuilder) -> Result<Vec<Creator>, StoreError> {
        let response = checked(builder.send().await?).await?;
        Ok(response.json::<Vec<Creator>>().await?)
    }
}

#[async_trait]
impl CreatorStore for HttpCreatorStore {
    async fn list_all(&self) -> Result<Vec<Creator>, StoreError> {
        let result = self
            .fetch_rows(
                self.request(Method::GET)
                    .query(&[("select", "*"), ("order", IdOrder::Ascending.as_param())]),
            )
            .await
            .map(|mut rows| {
                rows.sort_by_key(|creator| creator.id);
                rows
            });
        logged("list_all", None, result)
    }

    async fn get_by_id(&self, id: CreatorId) -> Result<Creator, StoreError> {
        let result = self
            .fetch_rows(
                self.request(Method::GET)
                    .query(&[("select", "*".to_string()), ("id", id_eq_filter(id))]),
            )
            .await
            .and_then(|rows| rows.into_iter().next().ok_or(StoreError::NotFound { id }));
        logged("get_by_id", Some(id), result)
    }

    async fn insert(&self, record: &CreatorRecord) -> Result<Creator, StoreError> {
        let result = self
            .fetch_rows(
                self.request(Method::POST)
                    .header(PREFER_HEADER, RETURN_REPRESENTATION)
                    .json(record),
            )
            .await
            .and_then(|rows| {
                rows.into_iter()
                    .next()
                    .ok_or_else(|| StoreError::backend("backend returned no row for insert"))
            });
        logged("insert", None, result)
    }

    async fn update(&self, id: CreatorId, record: &CreatorRecord) -> Result<Creator, StoreError> {
        let result = self
            .fetch_rows(
                self.request(Method::PATCH)
                    .query(&[("id", id_eq_filter(id))])
                    .header(PREFER_HEADER, RETURN_REPRESENTATION)
                    .json(record),
            )
            .await
            .and_then(|rows| rows.into_iter().next().ok_or(StoreError::NotFound { id }));
        logged("update", Some(id), result)
    }

    async fn delete_by_id(&self, id: CreatorId) -> Result<(), StoreError> {
        let result = match self
            .request(Method::DELETE)
            .query(&[("id", id_eq_filter(id))])
            .send()
            .await
        {
            Ok(response) => checked(response).await.map(drop),
            Err(err) => Err(err.into()),
        };
        logged("delete_by_id", Some(id), result)
    }
}

/// Turns a non-2xx response into `StoreError::Backend`, keeping the server's message when it sent one.
async fn checked(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("message")?.as_str().map(str::to_string))
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status.to_string()
            } else {
                body
            }
        });
    Err(StoreError::Backend {
        status: Some(status.as_u16()),
        message,
    })
}

fn logged<T>(
    operation: &'static str,
    id: Option<CreatorId>,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match &result {
        Ok(_) => debug!(operation, id = id.map(|id| id.0), "creators request succeeded"),
        Err(StoreError::NotFound { id }) => {
            debug!(operation, id = id.0, "creator not found")
        }
        Err(error) => warn!(operation, id = id.map(|id| id.0), %error, "creators request failed"),
    }
    result
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
