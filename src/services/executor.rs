//! Single-target deployment execution
//!
//! Drives one target through the deploy collaborator and folds every outcome,
//! including timeouts and collaborator panics, into a terminal attempt record.
//! Nothing raised here ever reaches the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::domain::attempt::{AttemptStatus, DeploymentAttempt, VerificationOutcome};
use crate::domain::job::{DeploymentJob, TargetSpec};
use crate::domain::network::{GasPricePolicy, NetworkEnvironment};
use crate::error::ExecutionError;

use super::collaborators::{DeployAction, Verifier};
use super::output::OutputInterpreter;

/// 协作方未自行兑现超时时的硬性兜底余量
const TIMEOUT_GRACE: Duration = Duration::from_secs(5);

/// 部署执行器
pub struct DeploymentExecutor {
    deployer: Arc<dyn DeployAction>,
    verifier: Arc<dyn Verifier>,
    interpreter: OutputInterpreter,
}

impl DeploymentExecutor {
    pub fn new(deployer: Arc<dyn DeployAction>, verifier: Arc<dyn Verifier>) -> Self {
        Self {
            deployer,
            verifier,
            interpreter: OutputInterpreter::default(),
        }
    }

    /// 替换输出解析器
    pub fn with_interpreter(mut self, interpreter: OutputInterpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Execute one target's deployment, with retries and optional
    /// verification. Always returns a terminal attempt.
    pub async fn execute_one(
        &self,
        network: &NetworkEnvironment,
        job: &DeploymentJob,
        spec: &TargetSpec,
    ) -> DeploymentAttempt {
        let mut attempt = DeploymentAttempt::new(&spec.network);
        attempt.start();

        let gas_price = spec
            .gas_price_override
            .map(GasPricePolicy::Fixed)
            .unwrap_or(network.gas_price);

        loop {
            attempt.tries += 1;

            let deploy = self.deployer.deploy(
                network,
                &job.artifact,
                &job.constructor_args,
                &gas_price,
                spec.timeout,
            );

            match tokio::time::timeout(spec.timeout + TIMEOUT_GRACE, deploy).await {
                Err(_) => {
                    error!(
                        network = %spec.network,
                        timeout_ms = spec.timeout.as_millis() as u64,
                        "deployment timed out"
                    );
                    attempt.time_out();
                    break;
                }
                Ok(Err(ExecutionError::Timeout)) => {
                    error!(
                        network = %spec.network,
                        timeout_ms = spec.timeout.as_millis() as u64,
                        "deployment timed out"
                    );
                    attempt.time_out();
                    break;
                }
                Ok(Err(ExecutionError::Failure(message))) => {
                    warn!(network = %spec.network, error = %message, "deploy action failed");
                    if attempt.tries <= job.retry_attempts {
                        tokio::time::sleep(job.retry_delay).await;
                        continue;
                    }
                    attempt.fail(message);
                    break;
                }
                Ok(Ok(outcome)) if !outcome.success => {
                    warn!(network = %spec.network, "deployment exited with failure");
                    if attempt.tries <= job.retry_attempts {
                        tokio::time::sleep(job.retry_delay).await;
                        continue;
                    }
                    let diagnostic = diagnostic_excerpt(&outcome.output);
                    attempt.output = outcome.output;
                    attempt.fail(diagnostic);
                    break;
                }
                Ok(Ok(outcome)) => {
                    let parsed = self.interpreter.parse(&outcome.output);
                    attempt.contract_address = parsed.contract_address;
                    attempt.transaction_hash = parsed.transaction_hash;
                    attempt.gas_used = parsed.gas_used;
                    attempt.succeed(outcome.output);
                    info!(
                        network = %spec.network,
                        address = attempt.contract_address.as_deref().unwrap_or("unknown"),
                        elapsed_ms = outcome.elapsed.as_millis() as u64,
                        "deployment succeeded"
                    );
                    break;
                }
            }
        }

        if attempt.status == AttemptStatus::Succeeded
            && job.verification_enabled
            && !spec.skip_verification
        {
            attempt.verification = Some(self.run_verification(network, &attempt, job).await);
        }

        attempt
    }

    async fn run_verification(
        &self,
        network: &NetworkEnvironment,
        attempt: &DeploymentAttempt,
        job: &DeploymentJob,
    ) -> VerificationOutcome {
        let Some(address) = attempt.contract_address.as_deref() else {
            return VerificationOutcome::failed("no contract address found");
        };

        info!(network = %network.id, address, "verifying contract");
        let outcome = self
            .verifier
            .verify(network, address, &job.constructor_args)
            .await;
        if !outcome.success {
            warn!(network = %network.id, message = %outcome.message, "contract verification failed");
        }
        outcome
    }
}

/// 取输出末尾的非空行作为失败诊断
fn diagnostic_excerpt(output: &str) -> String {
    let lines: Vec<&str> = output.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "deploy command failed".to_string();
    }
    let start = lines.len().saturating_sub(5);
    lines[start..].join("\n")
}
