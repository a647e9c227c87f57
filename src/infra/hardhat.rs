//! Hardhat CLI 适配
//!
//! 通过 `npx hardhat` 执行部署与合约验证；自定义 gas 价格通过
//! `GAS_PRICE` 环境变量传给部署脚本

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::domain::attempt::VerificationOutcome;
use crate::domain::network::{GasPricePolicy, NetworkEnvironment};
use crate::error::ExecutionError;
use crate::services::collaborators::{DeployAction, DeployOutcome, Verifier};

use super::command::{CommandError, CommandRunner};

/// Hardhat 命令行客户端
pub struct HardhatCli {
    /// Hardhat 项目目录
    project_dir: PathBuf,
    /// 合约验证超时
    verify_timeout: Duration,
    /// 取消令牌；取消时终止进行中的子进程
    cancel: CancellationToken,
}

impl HardhatCli {
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
            verify_timeout: Duration::from_secs(120),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_verify_timeout(mut self, verify_timeout: Duration) -> Self {
        self.verify_timeout = verify_timeout;
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// 部署脚本路径约定: scripts/deploy_<合约名小写>.js
    fn deploy_script(artifact: &str) -> String {
        format!("scripts/deploy_{}.js", artifact.to_lowercase())
    }
}

/// 合并 stdout 与 stderr
fn merged_output(output: &std::process::Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(&stderr);
    }
    text
}

#[async_trait]
impl DeployAction for HardhatCli {
    async fn deploy(
        &self,
        network: &NetworkEnvironment,
        artifact: &str,
        _constructor_args: &[String],
        gas_price: &GasPricePolicy,
        timeout: Duration,
    ) -> Result<DeployOutcome, ExecutionError> {
        let script = Self::deploy_script(artifact);
        let args = ["hardhat", "run", script.as_str(), "--network", network.id.as_str()];

        let mut envs = Vec::new();
        if let Some(price) = gas_price.as_env_value() {
            envs.push(("GAS_PRICE".to_string(), price));
        }

        info!(network = %network.id, script = %script, "executing hardhat deploy");
        let started = Instant::now();
        match CommandRunner::run_captured(
            "npx",
            &args,
            &self.project_dir,
            &envs,
            &self.cancel,
            timeout,
        )
        .await
        {
            Ok(output) => Ok(DeployOutcome {
                success: output.status.success(),
                output: merged_output(&output),
                elapsed: started.elapsed(),
            }),
            Err(CommandError::Timeout) => Err(ExecutionError::Timeout),
            Err(e) => Err(ExecutionError::Failure(e.to_string())),
        }
    }
}

#[async_trait]
impl Verifier for HardhatCli {
    async fn verify(
        &self,
        network: &NetworkEnvironment,
        address: &str,
        constructor_args: &[String],
    ) -> VerificationOutcome {
        let mut args = vec!["hardhat", "verify", "--network", network.id.as_str(), address];
        args.extend(constructor_args.iter().map(|s| s.as_str()));

        info!(network = %network.id, address, "executing hardhat verify");
        match CommandRunner::run_captured(
            "npx",
            &args,
            &self.project_dir,
            &[],
            &self.cancel,
            self.verify_timeout,
        )
        .await
        {
            Ok(output) if output.status.success() => {
                VerificationOutcome::ok("contract verified successfully")
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = stderr.trim();
                if message.is_empty() {
                    VerificationOutcome::failed("verification command exited with failure")
                } else {
                    VerificationOutcome::failed(message)
                }
            }
            Err(CommandError::Timeout) => VerificationOutcome::failed("verification timed out"),
            Err(e) => VerificationOutcome::failed(e.to_string()),
        }
    }
}
