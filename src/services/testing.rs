//! Test doubles for the collaborator seams.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use crate::config::registry::NetworkRegistry;
use crate::domain::attempt::{AttemptStatus, DeploymentAttempt, VerificationOutcome};
use crate::domain::job::{DeployStrategy, DeploymentJob, TargetSpec};
use crate::domain::network::{GasPricePolicy, NetworkEnvironment};
use crate::domain::report::DeploymentReport;
use crate::error::{ExecutionError, StoreError};
use crate::services::collaborators::{DeployAction, DeployOutcome, ReportStore, Verifier};

pub const SAMPLE_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const SAMPLE_TX_HASH: &str =
    "0x88b44bc83add758c17545a37a3a2bcbeff4e4f11bbe257dcb39007a196f4da54";

/// Output shaped like a hardhat deploy script's stdout.
pub fn sample_success_output() -> String {
    format!(
        "Deploying Token...\nTransaction hash: {}\nGas used: 534210\nContract address: {}\n",
        SAMPLE_TX_HASH, SAMPLE_ADDRESS
    )
}

pub fn test_network(id: &str) -> NetworkEnvironment {
    NetworkEnvironment {
        id: id.to_string(),
        name: format!("{} testnet", id),
        chain_id: 31337,
        rpc_url: "http://127.0.0.1:8545".to_string(),
        gas_price: GasPricePolicy::Auto,
        confirmations: 1,
        block_explorer: String::new(),
        explorer_api: String::new(),
    }
}

pub fn test_registry(ids: &[&str]) -> NetworkRegistry {
    NetworkRegistry::new(ids.iter().map(|id| test_network(id)).collect())
}

pub fn target(network: &str, priority: u32) -> TargetSpec {
    TargetSpec {
        network: network.to_string(),
        priority,
        gas_price_override: None,
        timeout: Duration::from_secs(300),
        skip_verification: false,
        dependencies: Vec::new(),
    }
}

pub fn test_job(strategy: DeployStrategy, targets: Vec<TargetSpec>) -> DeploymentJob {
    DeploymentJob {
        id: "job-test".to_string(),
        artifact: "Token".to_string(),
        constructor_args: Vec::new(),
        strategy,
        retry_attempts: 0,
        retry_delay: Duration::ZERO,
        verification_enabled: false,
        targets,
    }
}

pub fn count_status(attempts: &[DeploymentAttempt], status: AttemptStatus) -> usize {
    attempts.iter().filter(|a| a.status == status).count()
}

/// Scripted behavior for one network.
#[derive(Clone)]
pub enum MockBehavior {
    Succeed { output: String, delay: Duration },
    FailExit { output: String, delay: Duration },
    Error { message: String },
    Hang { duration: Duration },
    Panic,
    /// Fail with a non-zero exit the first `failures` calls, then succeed.
    FlakyThenSucceed { failures: u32 },
}

impl MockBehavior {
    pub fn succeed_after(delay: Duration) -> Self {
        MockBehavior::Succeed {
            output: sample_success_output(),
            delay,
        }
    }
}

/// Start/finish instants of one deploy call, on the tokio clock.
#[derive(Clone, Debug)]
pub struct DeploySpan {
    pub network: String,
    pub started: Instant,
    pub finished: Instant,
}

pub struct MockDeployer {
    behaviors: HashMap<String, MockBehavior>,
    default: MockBehavior,
    pub spans: Arc<Mutex<Vec<DeploySpan>>>,
    counters: Mutex<HashMap<String, u32>>,
}

impl MockDeployer {
    pub fn new() -> Self {
        Self {
            behaviors: HashMap::new(),
            default: MockBehavior::succeed_after(Duration::ZERO),
            spans: Arc::new(Mutex::new(Vec::new())),
            counters: Mutex::new(HashMap::new()),
        }
    }

    pub fn with(mut self, network: &str, behavior: MockBehavior) -> Self {
        self.behaviors.insert(network.to_string(), behavior);
        self
    }
}

#[async_trait]
impl DeployAction for MockDeployer {
    async fn deploy(
        &self,
        network: &NetworkEnvironment,
        _artifact: &str,
        _constructor_args: &[String],
        _gas_price: &GasPricePolicy,
        _timeout: Duration,
    ) -> Result<DeployOutcome, ExecutionError> {
        let started = Instant::now();
        let behavior = self
            .behaviors
            .get(&network.id)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        let result = match behavior {
            MockBehavior::Succeed { output, delay } => {
                tokio::time::sleep(delay).await;
                Ok(DeployOutcome {
                    success: true,
                    output,
                    elapsed: started.elapsed(),
                })
            }
            MockBehavior::FailExit { output, delay } => {
                tokio::time::sleep(delay).await;
                Ok(DeployOutcome {
                    success: false,
                    output,
                    elapsed: started.elapsed(),
                })
            }
            MockBehavior::Error { message } => Err(ExecutionError::Failure(message)),
            MockBehavior::Hang { duration } => {
                tokio::time::sleep(duration).await;
                Ok(DeployOutcome {
                    success: true,
                    output: sample_success_output(),
                    elapsed: started.elapsed(),
                })
            }
            MockBehavior::Panic => panic!("mock deployer panicked"),
            MockBehavior::FlakyThenSucceed { failures } => {
                let call = {
                    let mut counters = self.counters.lock().unwrap();
                    let entry = counters.entry(network.id.clone()).or_insert(0);
                    *entry += 1;
                    *entry
                };
                if call <= failures {
                    Ok(DeployOutcome {
                        success: false,
                        output: "Error: transient failure\n".to_string(),
                        elapsed: started.elapsed(),
                    })
                } else {
                    Ok(DeployOutcome {
                        success: true,
                        output: sample_success_output(),
                        elapsed: started.elapsed(),
                    })
                }
            }
        };

        self.spans.lock().unwrap().push(DeploySpan {
            network: network.id.clone(),
            started,
            finished: Instant::now(),
        });

        result
    }
}

pub struct MockVerifier {
    outcome: VerificationOutcome,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockVerifier {
    pub fn ok() -> Self {
        Self {
            outcome: VerificationOutcome::ok("contract verified successfully"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            outcome: VerificationOutcome::failed(message),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl Verifier for MockVerifier {
    async fn verify(
        &self,
        network: &NetworkEnvironment,
        address: &str,
        _constructor_args: &[String],
    ) -> VerificationOutcome {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{}:{}", network.id, address));
        self.outcome.clone()
    }
}

pub struct MemoryStore {
    pub stored: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            stored: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            stored: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn store(&self, report: &DeploymentReport) -> Result<String, StoreError> {
        if self.fail {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        let mut stored = self.stored.lock().unwrap();
        stored.push(serde_json::to_string(report)?);
        Ok(format!("memory://report-{}", stored.len()))
    }
}
