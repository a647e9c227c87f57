//! Result aggregation
//!
//! Reduces terminal attempts to one report in the job's configured target
//! order. Aggregation is deterministic: the same attempts, order and
//! timestamp always serialize to identical bytes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::attempt::{AttemptStatus, DeploymentAttempt};
use crate::domain::job::DeploymentJob;
use crate::domain::report::{DeploymentReport, NetworkOutcome};
use crate::error::AggregationError;

/// 结果聚合器
pub struct ResultAggregator;

impl ResultAggregator {
    /// 聚合并以当前时间生成报告
    pub fn aggregate(
        job: &DeploymentJob,
        attempts: &[DeploymentAttempt],
    ) -> Result<DeploymentReport, AggregationError> {
        Self::aggregate_at(job, attempts, Utc::now())
    }

    /// 确定性聚合核心
    pub fn aggregate_at(
        job: &DeploymentJob,
        attempts: &[DeploymentAttempt],
        generated_at: DateTime<Utc>,
    ) -> Result<DeploymentReport, AggregationError> {
        let mut by_network: HashMap<&str, &DeploymentAttempt> = HashMap::new();
        for attempt in attempts {
            by_network.entry(attempt.network.as_str()).or_insert(attempt);
        }

        let mut networks = Vec::with_capacity(job.targets.len());
        for spec in &job.targets {
            let attempt =
                by_network
                    .get(spec.network.as_str())
                    .ok_or_else(|| AggregationError {
                        network: spec.network.clone(),
                    })?;
            networks.push(NetworkOutcome::from_attempt(attempt));
        }

        let total = networks.len();
        let successful = count(&networks, AttemptStatus::Succeeded);
        let failed =
            count(&networks, AttemptStatus::Failed) + count(&networks, AttemptStatus::TimedOut);
        let skipped = count(&networks, AttemptStatus::Skipped);
        let success_rate = if total == 0 {
            None
        } else {
            // 一位小数
            Some((successful as f64 / total as f64 * 1000.0).round() / 10.0)
        };

        Ok(DeploymentReport {
            job_id: job.id.clone(),
            artifact: job.artifact.clone(),
            strategy: job.strategy,
            total_networks: total,
            successful,
            failed,
            skipped,
            success_rate,
            networks,
            generated_at,
        })
    }
}

fn count(networks: &[NetworkOutcome], status: AttemptStatus) -> usize {
    networks.iter().filter(|n| n.status == status).count()
}
