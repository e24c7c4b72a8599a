//! HTTP transport: GET a JSON array of events.

use std::time::Duration;

use async_trait::async_trait;

use super::RemoteSource;
use crate::error::{PlanningError, PlanningResult};
use crate::event::Event;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(url: &str, token: Option<String>) -> PlanningResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| PlanningError::Remote(e.to_string()))?;

        Ok(HttpSource {
            client,
            url: url.to_string(),
            token,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn fetch_planning(&self) -> PlanningResult<Vec<Event>> {
        tracing::debug!(url = %self.url, "Fetching planning over HTTP");

        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                PlanningError::RemoteTimeout(HTTP_TIMEOUT)
            } else {
                PlanningError::Remote(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlanningError::Remote(format!(
                "{} responded with {}",
                self.url, status
            )));
        }

        response
            .json::<Vec<Event>>()
            .await
            .map_err(|e| PlanningError::Remote(format!("Failed to parse planning: {e}")))
    }
}
