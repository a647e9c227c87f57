//! 聚合报告领域模型

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::attempt::{AttemptStatus, DeploymentAttempt, VerificationOutcome};
use super::job::DeployStrategy;

/// 报告中保留的原始输出长度上限
const OUTPUT_EXCERPT_LEN: usize = 1000;

/// 单个目标网络的结果快照
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkOutcome {
    pub network: String,
    pub status: AttemptStatus,
    pub contract_address: Option<String>,
    pub transaction_hash: Option<String>,
    pub gas_used: Option<u64>,
    pub verification: Option<VerificationOutcome>,
    pub error: Option<String>,
    pub tries: u32,
    pub duration_ms: Option<i64>,
    /// 原始输出节选
    pub output: String,
}

impl NetworkOutcome {
    /// 从终态尝试记录生成快照
    pub fn from_attempt(attempt: &DeploymentAttempt) -> Self {
        Self {
            network: attempt.network.clone(),
            status: attempt.status,
            contract_address: attempt.contract_address.clone(),
            transaction_hash: attempt.transaction_hash.clone(),
            gas_used: attempt.gas_used,
            verification: attempt.verification.clone(),
            error: attempt.error.clone(),
            tries: attempt.tries,
            duration_ms: attempt.duration_ms,
            output: truncate_output(&attempt.output),
        }
    }
}

/// 聚合部署报告
///
/// 每个任务生成一次，之后不再修改；networks 保持任务的配置顺序
#[derive(Clone, Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentReport {
    pub job_id: String,
    pub artifact: String,
    pub strategy: DeployStrategy,
    pub total_networks: usize,
    pub successful: usize,
    /// 失败数，含超时
    pub failed: usize,
    pub skipped: usize,
    /// 成功率（百分比，一位小数）；目标集为空时为 null
    pub success_rate: Option<f64>,
    pub networks: Vec<NetworkOutcome>,
    pub generated_at: DateTime<Utc>,
}

/// 按字符边界截断输出
fn truncate_output(output: &str) -> String {
    match output.char_indices().nth(OUTPUT_EXCERPT_LEN) {
        Some((idx, _)) => output[..idx].to_string(),
        None => output.to_string(),
    }
}
