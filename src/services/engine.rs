//! Coordination engine
//!
//! Dispatches a job's targets according to its strategy. One target's failure
//! never cancels or delays the others; the engine always returns a complete
//! set of terminal attempts, and overall success is a reporting concept only.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::config::registry::NetworkRegistry;
use crate::config::settings::CoordinatorSettings;
use crate::domain::attempt::{AttemptStatus, DeploymentAttempt};
use crate::domain::job::{DeployStrategy, DeploymentJob, TargetSpec};

use super::collaborators::ContinuationPolicy;
use super::executor::DeploymentExecutor;

/// 协调引擎
pub struct CoordinationEngine {
    registry: Arc<NetworkRegistry>,
    executor: Arc<DeploymentExecutor>,
    continuation: Arc<dyn ContinuationPolicy>,
    settings: CoordinatorSettings,
}

impl CoordinationEngine {
    pub fn new(
        registry: Arc<NetworkRegistry>,
        executor: Arc<DeploymentExecutor>,
        continuation: Arc<dyn ContinuationPolicy>,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            registry,
            executor,
            continuation,
            settings,
        }
    }

    /// Run the whole job, returning one terminal attempt per enabled target.
    pub async fn run(&self, job: &Arc<DeploymentJob>) -> Vec<DeploymentAttempt> {
        info!(
            job_id = %job.id,
            artifact = %job.artifact,
            strategy = %job.strategy,
            targets = job.targets.len(),
            "starting deployment run"
        );

        match job.strategy {
            DeployStrategy::Simultaneous => {
                self.run_simultaneous(job, job.targets.clone()).await
            }
            DeployStrategy::Sequential => self.run_sequential(job).await,
            DeployStrategy::Coordinated => self.run_coordinated(job).await,
        }
    }

    /// 并发部署一组目标，由信号量限制同时进行的数量
    async fn run_simultaneous(
        &self,
        job: &Arc<DeploymentJob>,
        targets: Vec<TargetSpec>,
    ) -> Vec<DeploymentAttempt> {
        let mut results = Vec::with_capacity(targets.len());
        let cap = self.settings.max_parallel.min(targets.len()).max(1);
        let semaphore = Arc::new(Semaphore::new(cap));

        let mut handles = Vec::new();
        for spec in targets {
            let network = match self.registry.lookup(&spec.network) {
                Ok(network) => network.clone(),
                Err(e) => {
                    let mut attempt = DeploymentAttempt::new(&spec.network);
                    attempt.start();
                    attempt.fail(e.to_string());
                    results.push(attempt);
                    continue;
                }
            };

            let executor = self.executor.clone();
            let job = job.clone();
            let semaphore = semaphore.clone();
            let network_id = spec.network.clone();
            let handle = tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                executor.execute_one(&network, &job, &spec).await
            });
            handles.push((network_id, handle));
        }

        for (network_id, handle) in handles {
            match handle.await {
                Ok(attempt) => results.push(attempt),
                Err(e) => {
                    warn!(network = %network_id, error = %e, "deployment worker crashed");
                    let mut attempt = DeploymentAttempt::new(network_id);
                    attempt.start();
                    attempt.fail(format!("deployment worker crashed: {}", e));
                    results.push(attempt);
                }
            }
        }

        results
    }

    /// 按优先级逐个部署，失败后由继续策略决定是否中止
    async fn run_sequential(&self, job: &Arc<DeploymentJob>) -> Vec<DeploymentAttempt> {
        let mut ordered: Vec<(usize, TargetSpec)> =
            job.targets.iter().cloned().enumerate().collect();
        ordered.sort_by_key(|(index, spec)| (spec.priority, *index));

        let total = ordered.len();
        let mut results = Vec::with_capacity(total);
        let mut stopped = false;

        for (step, (_, spec)) in ordered.into_iter().enumerate() {
            if stopped {
                let mut attempt = DeploymentAttempt::new(&spec.network);
                attempt.skip();
                results.push(attempt);
                continue;
            }

            let network = match self.registry.lookup(&spec.network) {
                Ok(network) => network.clone(),
                Err(e) => {
                    let mut attempt = DeploymentAttempt::new(&spec.network);
                    attempt.start();
                    attempt.fail(e.to_string());
                    results.push(attempt);
                    continue;
                }
            };

            info!(
                network = %spec.network,
                step = step + 1,
                total,
                "sequential deployment step"
            );
            let attempt = self.executor.execute_one(&network, job, &spec).await;
            let failed = matches!(
                attempt.status,
                AttemptStatus::Failed | AttemptStatus::TimedOut
            );

            if failed && step + 1 < total {
                let go_on = self
                    .continuation
                    .should_continue_after_failure(&network, &attempt)
                    .await;
                if !go_on {
                    warn!(
                        network = %spec.network,
                        "sequential deployment stopped after failure"
                    );
                    stopped = true;
                }
            }
            results.push(attempt);

            if !stopped && step + 1 < total {
                tokio::time::sleep(self.settings.step_delay).await;
            }
        }

        results
    }

    /// 按优先级分批部署；批次之间等待固定时间，让区块确认落定
    async fn run_coordinated(&self, job: &Arc<DeploymentJob>) -> Vec<DeploymentAttempt> {
        let mut buckets: BTreeMap<u32, Vec<TargetSpec>> = BTreeMap::new();
        for spec in &job.targets {
            buckets.entry(spec.priority).or_default().push(spec.clone());
        }

        let total_buckets = buckets.len();
        let mut results = Vec::with_capacity(job.targets.len());

        for (bucket_index, (priority, bucket)) in buckets.into_iter().enumerate() {
            info!(
                priority,
                targets = bucket.len(),
                phase = bucket_index + 1,
                phases = total_buckets,
                "starting deployment phase"
            );
            let mut phase_results = self.run_simultaneous(job, bucket).await;
            results.append(&mut phase_results);

            if bucket_index + 1 < total_buckets {
                info!(
                    delay_ms = self.settings.barrier_delay.as_millis() as u64,
                    "waiting for confirmations before next phase"
                );
                tokio::time::sleep(self.settings.barrier_delay).await;
            }
        }

        results
    }
}
