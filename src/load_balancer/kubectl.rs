//! Pool store backed by `kubectl exec` into the front-end container.
//!
//! # Responsibilities
//! - Look up, add and remove `BalancerMember` lines in the pool file
//! - Trigger a graceful reload of the proxy
//!
//! # Design Decisions
//! - `grep` exit status 1 means "not listed" and is not an error
//! - Any other non-zero exit, or a failure to spawn, is a `StoreError`
//! - Members are rendered as `BalancerMember "http://ip:port"`

use std::net::SocketAddr;
use std::process::{Output, Stdio};

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::FrontendConfig;
use crate::load_balancer::store::{PoolStore, StoreError};

/// Runs pool file edits inside the front-end pod.
#[derive(Debug, Clone)]
pub struct KubectlPoolStore {
    program: String,
    pod: String,
    namespace: Option<String>,
    container: String,
    binary: String,
    pool_file: String,
}

impl KubectlPoolStore {
    pub fn new(frontend: &FrontendConfig) -> Self {
        Self {
            program: "kubectl".to_string(),
            pod: frontend.pod_name.clone(),
            namespace: frontend.namespace.clone(),
            container: frontend.container_name.clone(),
            binary: frontend.binary.clone(),
            pool_file: frontend.pool_file.clone(),
        }
    }

    /// Use a different executable in place of `kubectl`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments for running `command` inside the front-end container.
    pub fn exec_args(&self, command: &[&str]) -> Vec<String> {
        let mut args = vec!["exec".to_string(), self.pod.clone()];
        if let Some(namespace) = &self.namespace {
            args.push("-n".to_string());
            args.push(namespace.clone());
        }
        args.push("-c".to_string());
        args.push(self.container.clone());
        args.push("--".to_string());
        args.extend(command.iter().map(|s| s.to_string()));
        args
    }

    async fn run(&self, command: &[&str]) -> Result<Output, StoreError> {
        let args = self.exec_args(command);
        tracing::debug!(program = %self.program, args = ?args, "Running pool store command");

        Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| StoreError::Spawn {
                command: self.describe(command),
                source,
            })
    }

    fn failed(&self, command: &[&str], output: &Output) -> StoreError {
        StoreError::Failed {
            command: self.describe(command),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
    }

    fn describe(&self, command: &[&str]) -> String {
        format!("{} {}", self.program, self.exec_args(command).join(" "))
    }

    async fn run_checked(&self, command: &[&str]) -> Result<(), StoreError> {
        let output = self.run(command).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(self.failed(command, &output))
        }
    }
}

/// The exact line a member occupies in the pool file.
pub fn member_line(member: SocketAddr) -> String {
    format!("BalancerMember \"http://{}\"", member)
}

/// `sed` expression appending a member after the balancer's opening tag.
pub fn insert_expression(member: SocketAddr) -> String {
    format!(
        "s|\\(<Proxy \"balancer:.*>\\)|\\1\\n    {}|",
        member_line(member)
    )
}

/// `sed` expression deleting every line that lists the member.
pub fn delete_expression(member: SocketAddr) -> String {
    let escaped = member_line(member)
        .replace('/', "\\/")
        .replace('.', "\\.")
        .replace('[', "\\[")
        .replace(']', "\\]");
    format!("/{}/d", escaped)
}

#[async_trait]
impl PoolStore for KubectlPoolStore {
    async fn exists(&self, member: SocketAddr) -> Result<bool, StoreError> {
        let line = member_line(member);
        let command = ["grep", "-F", "-q", line.as_str(), self.pool_file.as_str()];
        let output = self.run(&command).await?;

        match output.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(self.failed(&command, &output)),
        }
    }

    async fn insert(&self, member: SocketAddr) -> Result<(), StoreError> {
        let expression = insert_expression(member);
        self.run_checked(&["sed", "-i", expression.as_str(), self.pool_file.as_str()])
            .await
    }

    async fn delete(&self, member: SocketAddr) -> Result<(), StoreError> {
        let expression = delete_expression(member);
        self.run_checked(&["sed", "-i", expression.as_str(), self.pool_file.as_str()])
            .await
    }

    async fn reload(&self) -> Result<(), StoreError> {
        self.run_checked(&[self.binary.as_str(), "-k", "graceful"]).await
    }
}
