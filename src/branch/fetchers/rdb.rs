//! ALT Linux repository database (rdb) API implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::branch::error::FetchError;
use crate::branch::fetcher::BranchFetcher;
use crate::branch::types::{BranchRequest, PackageRecord};
use crate::config::Settings;

/// Response of `export/branch_binary_packages`
#[derive(Debug, Deserialize)]
struct BranchPackagesResponse {
    packages: Vec<PackageRecord>,
}

/// Error body returned by the API for rejected requests
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorResponse {
    message: Option<String>,
    errors: Option<Value>,
}

impl ApiErrorResponse {
    fn describe(self, fallback: &str) -> String {
        match (self.message, self.errors) {
            (Some(message), Some(errors)) => format!("{}: {}", message, errors),
            (Some(message), None) => message,
            (None, Some(errors)) => errors.to_string(),
            (None, None) => fallback.to_string(),
        }
    }
}

/// Fetcher implementation for the rdb export API
pub struct RdbFetcher {
    client: Client,
    base_url: String,
}

impl RdbFetcher {
    /// Creates a new RdbFetcher from settings
    pub fn new(settings: &Settings) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url_for(&self, request: &BranchRequest) -> String {
        let mut url = format!(
            "{}/export/branch_binary_packages/{}",
            self.base_url, request.branch
        );
        if let Some(arch) = &request.architecture {
            url.push_str("?arch=");
            url.push_str(arch);
        }
        url
    }
}

#[async_trait]
impl BranchFetcher for RdbFetcher {
    async fn fetch(&self, request: &BranchRequest) -> Result<Vec<PackageRecord>, FetchError> {
        let url = self.url_for(request);
        debug!("Fetching branch packages: {}", url);

        let response = self.client.get(&url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(request.branch.clone()));
        }

        if !status.is_success() {
            warn!("rdb API returned status {}: {}", status, url);
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .unwrap_or_default()
                .describe(&format!("Unexpected status: {}", status));
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: BranchPackagesResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse rdb API response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        debug!(
            "Found {} packages in branch {}",
            body.packages.len(),
            request.branch
        );

        Ok(body.packages)
    }
}
