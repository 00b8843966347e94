//! Provider subprocess protocol.
//!
//! This module handles communication with external provider binaries
//! (e.g., `tickercal-provider-corpcal`) using JSON over stdin/stdout.
//!
//! The protocol is designed to be language-agnostic: any executable
//! that speaks the JSON protocol can be a provider. Providers manage
//! their own credentials; tickercal only passes command parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdout, Command as TokioCommand};
use tokio::time::timeout;

use crate::error::{TickerCalError, TickerCalResult};
use crate::source::protocol::{ChangeNotice, Command, ProviderCommand, Request, Response, Subscribe};

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Provider(String);

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    fn binary_path(&self) -> TickerCalResult<std::path::PathBuf> {
        let binary_name = format!("tickercal-provider-{}", self.0);
        let binary_path = which::which(&binary_name).map_err(|_| {
            TickerCalError::ProviderNotInstalled(format!(
                "Provider '{}' not found. Install it with:\n  cargo install {}",
                self.0, binary_name
            ))
        })?;
        Ok(binary_path)
    }

    /// Call a typed provider command and return the result.
    ///
    /// The response type is inferred from the command's associated type,
    /// ensuring compile-time type safety.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> TickerCalResult<C::Response> {
        timeout(PROVIDER_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| TickerCalError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))?
    }

    /// Open a long-lived change feed from this provider.
    ///
    /// The provider process stays alive and writes one JSON notice per
    /// stdout line until it exits or the feed is dropped.
    pub async fn subscribe(&self) -> TickerCalResult<ChangeFeed> {
        let request = encode_request(Command::Subscribe, Subscribe)?;
        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                TickerCalError::Source(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        // Unwrap safe: we piped stdin above
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(format!("{request}\n").as_bytes()).await?;
        drop(stdin);

        let stdout = child.stdout.take().unwrap();
        Ok(ChangeFeed {
            child,
            lines: BufReader::new(stdout).lines(),
        })
    }

    /// Low-level call that sends a command with params and deserializes the response.
    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> TickerCalResult<R> {
        let request_json = encode_request(command, params)?;
        let binary_path = self.binary_path()?;

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .spawn()
            .map_err(|e| {
                TickerCalError::Source(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        // Write request to stdin (unwrap safe: we piped stdin above)
        let mut stdin = child.stdin.take().unwrap();
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        // Wait for process and collect output
        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(TickerCalError::Source(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.is_empty() {
            return Err(TickerCalError::Source(
                "Provider returned no response".into(),
            ));
        }

        let response: Response<R> = serde_json::from_str(&response_str)
            .map_err(|e| TickerCalError::Source(format!("Failed to parse response: {}", e)))?;

        match response {
            Response::Success { data } => Ok(data),
            Response::Error { error } => Err(TickerCalError::Source(error)),
        }
    }
}

fn encode_request<P: Serialize>(command: Command, params: P) -> TickerCalResult<String> {
    let params = serde_json::to_value(params)
        .map_err(|e| TickerCalError::Serialization(e.to_string()))?;
    let request = Request { command, params };
    serde_json::to_string(&request).map_err(|e| TickerCalError::Serialization(e.to_string()))
}

/// A live change feed from a subscribed provider.
pub struct ChangeFeed {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl ChangeFeed {
    /// Next change notice, or None once the provider closes the feed.
    /// Lines that do not parse are skipped.
    pub async fn next(&mut self) -> Option<ChangeNotice> {
        loop {
            match self.lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str(&line) {
                        Ok(notice) => return Some(notice),
                        Err(e) => {
                            tracing::warn!(error = %e, "Ignoring malformed change notice")
                        }
                    }
                }
                Ok(None) => return None,
                Err(_) => return None,
            }
        }
    }
}

impl Drop for ChangeFeed {
    fn drop(&mut self) {
        let _ = self.child.start_kill();
    }
}
