//! Agent Command Codec (C2): the hex-encoded JSON envelope exchanged with a
//! remote Agent over its single `QueryParam` entry point.

use crate::error::{OrchestrationError, Result};
use crate::model::agent_endpoint::OsFamily;

use serde::{Deserialize, Serialize};

/// What is sent to the Agent: the SQL to run and which binary/host it
/// should run against. Hex-encoded as a single opaque string on the wire,
/// the same shape the Agent's own CLI accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryParam {
    pub client_id: String,
    pub os_family: OsFamily,
    pub statement: String,
}

impl QueryParam {
    pub fn new(client_id: impl Into<String>, os_family: OsFamily, statement: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            os_family,
            statement: statement.into(),
        }
    }

    /// Hex-encodes the JSON-serialized param, the exact payload shape the
    /// Agent Transport posts.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(hex::encode(json))
    }
}

/// The Agent's reply: a synchronous exit status plus, for background
/// submissions, an opaque job id the monitor polls on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub status: AgentStatus,
    pub exit_code: i32,
    pub output: String,
    pub job_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Ok,
    Accepted,
    Error,
}

impl AgentResponse {
    pub fn decode(hex_body: &str) -> Result<Self> {
        let bytes = hex::decode(hex_body)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn into_result(self) -> Result<AgentResponse> {
        match self.status {
            AgentStatus::Error => Err(classify_agent_failure(&self.output)),
            _ => Ok(self),
        }
    }
}

fn classify_agent_failure(output: &str) -> OrchestrationError {
    if crate::error::is_retryable_message(output) {
        OrchestrationError::AgentRetryableFailure(output.to_string())
    } else {
        OrchestrationError::AgentFatalFailure(output.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_query_param_through_hex() {
        let param = QueryParam::new("client-1", OsFamily::Linux, "SELECT 1");
        let encoded = param.encode().unwrap();
        let bytes = hex::decode(&encoded).unwrap();
        let decoded: QueryParam = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded.client_id, "client-1");
        assert_eq!(decoded.statement, "SELECT 1");
    }

    #[test]
    fn error_status_is_classified_by_message() {
        let resp = AgentResponse {
            status: AgentStatus::Error,
            exit_code: 1,
            output: "connection refused".to_string(),
            job_id: None,
        };
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, OrchestrationError::AgentRetryableFailure(_)));
    }

    #[test]
    fn permission_denied_is_fatal() {
        let resp = AgentResponse {
            status: AgentStatus::Error,
            exit_code: 1,
            output: "permission denied".to_string(),
            job_id: None,
        };
        let err = resp.into_result().unwrap_err();
        assert!(matches!(err, OrchestrationError::AgentFatalFailure(_)));
    }
}
