//! The remote JSON document holding the published product list.
//!
//! The document is a flat JSON array with no envelope. Reads return the
//! whole array; writes replace it wholesale and echo the stored array back.

use std::future::Future;

use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Url};
use serde_json::Value;

use super::error::SyncError;
use crate::models::Product;

/// A remote product document.
pub trait RemoteStore {
    /// Reads the whole document.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Value>, SyncError>>;

    /// Replaces the whole document with `products`, returning what was stored.
    fn replace(&self, products: &[Product]) -> impl Future<Output = Result<Vec<Value>, SyncError>>;
}

/// [`RemoteStore`] over plain HTTP: `GET` reads, `POST` replaces.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: Client,
    url: Url,
}

impl HttpRemote {
    /// Creates a remote for the document at `url`.
    pub fn new(url: &str) -> Result<Self, SyncError> {
        Self::with_client(Client::new(), url)
    }

    /// Creates a remote that sends requests through `client`.
    pub fn with_client(client: Client, url: &str) -> Result<Self, SyncError> {
        let url = Url::parse(url).map_err(|source| SyncError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Document URL with a cache-busting timestamp appended.
    fn fresh_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("t", &Utc::now().timestamp_millis().to_string());
        url
    }

    async fn read_array(response: reqwest::Response) -> Result<Vec<Value>, SyncError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status(status));
        }

        let body = response.text().await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(items)) => Ok(items),
            Ok(other) => Err(SyncError::Payload(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            ))),
            Err(e) => Err(SyncError::Payload(e.to_string())),
        }
    }
}

impl RemoteStore for HttpRemote {
    async fn fetch(&self) -> Result<Vec<Value>, SyncError> {
        let url = self.fresh_url();
        tracing::debug!(%url, "Fetching remote products");

        let response = self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        Self::read_array(response).await
    }

    async fn replace(&self, products: &[Product]) -> Result<Vec<Value>, SyncError> {
        tracing::debug!(url = %self.url, count = products.len(), "Publishing products");

        let body = serde_json::to_vec(products).map_err(|e| SyncError::Payload(e.to_string()))?;
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        Self::read_array(response).await
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url() {
        let err = HttpRemote::new("not a url").unwrap_err();
        assert!(matches!(err, SyncError::InvalidUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_fresh_url_appends_timestamp() {
        let remote = HttpRemote::new("https://api.example.com/documents/abc").unwrap();
        let url = remote.fresh_url();

        assert_eq!(url.path(), "/documents/abc");
        assert!(url.query_pairs().any(|(k, v)| k == "t" && v.parse::<i64>().is_ok()));
        assert!(remote.url().query().is_none());
    }

    #[test]
    fn test_fresh_url_keeps_existing_query() {
        let remote = HttpRemote::new("https://api.example.com/doc?token=1").unwrap();
        let url = remote.fresh_url();

        assert!(url.query_pairs().any(|(k, v)| k == "token" && v == "1"));
        assert!(url.query_pairs().any(|(k, _)| k == "t"));
    }
}
