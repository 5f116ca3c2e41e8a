//! Agent Transport (C3): sends a [`QueryParam`] to a remote Agent over HTTP
//! with bounded timeout/retry/backoff, and fetches result artefacts it
//! produces.

use crate::agent::codec::{AgentResponse, QueryParam};
use crate::conf::EnvConfigSettings;
use crate::error::{OrchestrationError, Result};
use crate::model::agent_endpoint::AgentEndpoint;

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

/// Backoff schedule between retries of a retryable Agent failure, in
/// seconds. The loop stops after exhausting `max_retries` attempts
/// regardless of how many entries this has.
const BACKOFF_SCHEDULE_SECS: &[u64] = &[2, 4, 8, 16, 32];

#[derive(Clone)]
pub struct AgentTransport {
    client: reqwest::Client,
    execution_timeout: Duration,
    max_retries: u32,
    results_dir: PathBuf,
}

impl AgentTransport {
    pub fn new(env_conf: &EnvConfigSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(env_conf.agent_execution_timeout_secs))
            .build()
            .map_err(|e| OrchestrationError::Internal(format!("building agent http client: {e}")))?;

        Ok(Self {
            client,
            execution_timeout: Duration::from_secs(env_conf.agent_execution_timeout_secs),
            max_retries: env_conf.agent_max_retries,
            results_dir: PathBuf::from(&env_conf.results_dir),
        })
    }

    fn endpoint_url(&self, endpoint: &AgentEndpoint) -> String {
        format!("{}/query", endpoint.client_id)
    }

    /// Submits a query to the Agent, retrying retryable failures on the
    /// fixed backoff schedule up to `max_retries` attempts. A fatal failure
    /// (e.g. permission denied) returns immediately without retrying.
    pub async fn execute(&self, endpoint: &AgentEndpoint, param: &QueryParam) -> Result<AgentResponse> {
        let mut attempt = 0u32;
        loop {
            match self.execute_once(endpoint, param).await {
                Ok(resp) => return Ok(resp),
                Err(OrchestrationError::AgentRetryableFailure(msg))
                | Err(OrchestrationError::AgentTimeout(msg))
                    if attempt < self.max_retries =>
                {
                    let delay = BACKOFF_SCHEDULE_SECS
                        .get(attempt as usize)
                        .copied()
                        .unwrap_or(*BACKOFF_SCHEDULE_SECS.last().unwrap());
                    warn!(
                        "agent call to {} failed ({msg}), retrying in {delay}s (attempt {}/{})",
                        endpoint.client_id,
                        attempt + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn execute_once(&self, endpoint: &AgentEndpoint, param: &QueryParam) -> Result<AgentResponse> {
        let encoded = param.encode()?;
        let resp = tokio::time::timeout(
            self.execution_timeout,
            self.client
                .post(self.endpoint_url(endpoint))
                .body(encoded)
                .send(),
        )
        .await
        .map_err(|_| OrchestrationError::AgentTimeout(format!("agent {} timed out", endpoint.client_id)))?
        .map_err(|e| OrchestrationError::AgentRetryableFailure(e.to_string()))?;

        let body = resp
            .text()
            .await
            .map_err(|e| OrchestrationError::AgentRetryableFailure(e.to_string()))?;

        AgentResponse::decode(&body)?.into_result()
    }

    /// Downloads a result artefact the Agent produced for `client_id`,
    /// saving it under `<results_dir>/<client_id>/<md5(content)>` and
    /// returning the path it was written to.
    pub async fn download_file(&self, client_id: &str, source_url: &str) -> Result<PathBuf> {
        let bytes = self
            .client
            .get(source_url)
            .send()
            .await
            .map_err(|e| OrchestrationError::AgentRetryableFailure(e.to_string()))?
            .bytes()
            .await
            .map_err(|e| OrchestrationError::AgentRetryableFailure(e.to_string()))?;

        let digest = format!("{:x}", md5::compute(&bytes));
        let dir = self.results_dir.join(client_id);
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(&digest);
        tokio::fs::write(&path, &bytes).await?;
        info!("saved agent artefact for {client_id} to {}", path.display());
        Ok(path)
    }
}
