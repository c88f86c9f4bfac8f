//! PX-Web API integration (Statistics Iceland).

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{AppError, EXIT_USAGE};
use crate::index::RawRecord;

pub const DEFAULT_BASE_URL: &str = "https://px.hagstofa.is:443/pxis/api/v1";
pub const BASE_URL_ENV: &str = "HAGSTOFA_API_URL";

/// A PX-Web table response; only the `data` rows are used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PxResponse {
    #[serde(default)]
    pub data: Vec<RawRecord>,
}

/// Anything that can answer a table query.
///
/// Failures are fatal for the data source being loaded; nothing is retried.
pub trait Transport {
    fn post(&self, path: &str, body: &Value) -> Result<PxResponse, AppError>;
}

pub struct PxClient {
    client: Client,
    base_url: String,
}

impl PxClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL from `HAGSTOFA_API_URL` (a `.env` file is honoured), falling
    /// back to the public endpoint.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if url.trim().is_empty() => {
                Err(AppError::new(EXIT_USAGE, format!("{BASE_URL_ENV} is set but empty.")))
            }
            Ok(url) => Ok(Self::new(url.trim())),
            Err(_) => Ok(Self::new(DEFAULT_BASE_URL)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_matches('/'))
    }
}

impl Transport for PxClient {
    fn post(&self, path: &str, body: &Value) -> Result<PxResponse, AppError> {
        let url = self.url(path);
        debug!(%url, "posting table query");

        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| AppError::transport(format!("PX-Web request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::transport(format!(
                "PX-Web request to {url} failed with status {}.",
                resp.status()
            )));
        }

        resp.json()
            .map_err(|e| AppError::transport(format!("Failed to parse PX-Web response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slashes() {
        let client = PxClient::new("https://example.test/api/v1/");
        assert_eq!(client.base_url(), "https://example.test/api/v1");
        assert_eq!(
            client.url("/is/Efnahagur/VIS01301.px"),
            "https://example.test/api/v1/is/Efnahagur/VIS01301.px"
        );
    }

    #[test]
    fn decodes_table_response() {
        let body = r#"{
            "columns": [{"code": "Mánuður", "text": "Mánuður", "type": "t"}],
            "comments": [],
            "data": [
                {"key": ["2024M01", "index_B1997", "IS00"], "values": ["612.3"]},
                {"key": ["2024M01", "index_B1997", "IS01"], "values": [".."]}
            ]
        }"#;
        let resp: PxResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data.len(), 2);
        assert_eq!(resp.data[0].key, ["2024M01", "index_B1997", "IS00"]);

        let empty: PxResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.data.is_empty());
    }
}
