use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::execution::ExecutionResult;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::time::Duration;

pub const PYTHON_VERSION: &str = "3.10.0";

/// Sandboxed execution of learner code.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(&self, code: &str, stdin: &str) -> Result<ExecutionResult>;
}

/// Runs Python through a Piston `execute` endpoint.
#[derive(Clone)]
pub struct PistonExecutor {
    client: Client,
    url: String,
    timeout: Duration,
}

impl PistonExecutor {
    pub fn new(client: Client, url: String, timeout: Duration) -> Self {
        Self { client, url, timeout }
    }

    pub fn from_config(config: &Config, client: Client) -> Self {
        Self::new(client, config.piston_url.clone(), config.code_run_timeout())
    }
}

pub(crate) fn piston_payload(code: &str, stdin: &str) -> JsonValue {
    serde_json::json!({
        "language": "python",
        "version": PYTHON_VERSION,
        "files": [{"name": "main.py", "content": code}],
        "stdin": stdin,
        "args": [],
        "compile_timeout": 10000,
        "run_timeout": 10000,
        "compile_memory_limit": -1,
        "run_memory_limit": -1
    })
}

#[async_trait]
impl CodeExecutor for PistonExecutor {
    async fn execute(&self, code: &str, stdin: &str) -> Result<ExecutionResult> {
        let res = self
            .client
            .post(&self.url)
            .json(&piston_payload(code, stdin))
            .timeout(self.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(Error::Provider(format!("Piston API Error {}: {}", status, text)));
        }

        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_carries_code_and_stdin() {
        let payload = piston_payload("print(input())", "hi");
        assert_eq!(payload["language"], "python");
        assert_eq!(payload["version"], PYTHON_VERSION);
        assert_eq!(payload["files"][0]["name"], "main.py");
        assert_eq!(payload["files"][0]["content"], "print(input())");
        assert_eq!(payload["stdin"], "hi");
        assert_eq!(payload["run_timeout"], 10000);
    }
}
