//! Provider subprocess transport.
//!
//! A provider is any executable named `planning-provider-<name>` in PATH that
//! speaks the JSON protocol from [`protocol`](super::protocol). Providers keep
//! their own credentials; we only pass them the `[remote]` config table.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use super::RemoteSource;
use super::protocol::{Command, FetchPlanning, ProviderCommand, Request, Response};
use crate::error::{PlanningError, PlanningResult};
use crate::event::Event;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ProviderSource {
    name: String,
    binary: Option<PathBuf>,
    params: serde_json::Map<String, serde_json::Value>,
    timeout: Duration,
}

impl ProviderSource {
    pub fn new(name: &str, params: serde_json::Map<String, serde_json::Value>) -> Self {
        ProviderSource {
            name: name.to_string(),
            binary: None,
            params,
            timeout: PROVIDER_TIMEOUT,
        }
    }

    /// Use an explicit executable instead of looking one up in PATH.
    pub fn with_binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn binary_path(&self) -> PlanningResult<PathBuf> {
        if let Some(path) = &self.binary {
            return Ok(path.clone());
        }

        let binary_name = format!("planning-provider-{}", self.name);
        which::which(&binary_name).map_err(|_| PlanningError::ProviderNotInstalled(binary_name))
    }

    /// Call a typed provider command and return the result.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> PlanningResult<C::Response> {
        timeout(self.timeout, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| PlanningError::RemoteTimeout(self.timeout))?
    }

    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> PlanningResult<R> {
        let params = serde_json::to_value(params)?;
        let request_json = serde_json::to_string(&Request { command, params })?;

        let binary_path = self.binary_path()?;
        tracing::debug!(provider = %self.name, binary = %binary_path.display(), ?command, "Calling provider");

        let mut child = TokioCommand::new(&binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PlanningError::Remote(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PlanningError::Remote("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(PlanningError::Remote(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(PlanningError::Remote("Provider returned no response".into()));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| PlanningError::Remote(format!("Failed to parse response: {e}")))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(PlanningError::Remote(error)),
        }
    }
}

#[async_trait]
impl RemoteSource for ProviderSource {
    async fn fetch_planning(&self) -> PlanningResult<Vec<Event>> {
        self.call(FetchPlanning {
            remote_config: self.params.clone(),
        })
        .await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn script(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("planning-provider-test");
        std::fs::write(&path, format!("#!/bin/sh\ncat > /dev/null\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn test_fetch_planning_success() {
        let dir = tempfile::tempdir().unwrap();
        let binary = script(
            &dir,
            r#"echo '{"status":"success","data":[{"id":"a","title":"Math","start":"2024-01-08T08:00+01:00","end":"2024-01-08T10:00+01:00"}]}'"#,
        );

        let source = ProviderSource::new("test", serde_json::Map::new()).with_binary(binary);
        let events = source.fetch_planning().await.unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "a");
    }

    #[tokio::test]
    async fn test_provider_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let binary = script(&dir, r#"echo '{"status":"error","error":"session expired"}'"#);

        let source = ProviderSource::new("test", serde_json::Map::new()).with_binary(binary);
        let err = source.fetch_planning().await.unwrap_err();

        assert!(matches!(err, PlanningError::Remote(ref msg) if msg == "session expired"));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let binary = script(&dir, "sleep 5");

        let source = ProviderSource::new("test", serde_json::Map::new())
            .with_binary(binary)
            .with_timeout(Duration::from_millis(100));

        let err = source.fetch_planning().await.unwrap_err();

        assert!(matches!(err, PlanningError::RemoteTimeout(d) if d == Duration::from_millis(100)));
        assert_eq!(err.to_string(), "Remote source timed out after 100ms");
    }

    #[test]
    fn test_missing_provider_binary() {
        let source = ProviderSource::new("definitely-not-installed-xyz", serde_json::Map::new());
        assert!(matches!(
            source.binary_path(),
            Err(PlanningError::ProviderNotInstalled(_))
        ));
    }
}
