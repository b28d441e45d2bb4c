use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeRun {
    pub code: String,
    #[serde(default)]
    pub stdin: String,
}

/// One stage (compile or run) of a sandboxed execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StageOutput {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub output: String,
    pub code: Option<i32>,
    pub signal: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub language: String,
    pub version: String,
    pub run: StageOutput,
    #[serde(default)]
    pub compile: Option<StageOutput>,
}

impl ExecutionResult {
    /// Exited with status 0 and was not killed by a signal.
    pub fn succeeded(&self) -> bool {
        self.run.code == Some(0) && self.run.signal.is_none()
    }
}
