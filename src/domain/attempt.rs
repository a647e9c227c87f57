//! 部署尝试记录
//!
//! 每个目标网络一条；由执行它的 worker 独占持有，到达终态后交给聚合器，
//! 之后不再修改

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 尝试状态
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    TimedOut,
    /// 顺序部署提前终止时未执行的目标
    Skipped,
}

impl AttemptStatus {
    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptStatus::Pending => "pending",
            AttemptStatus::Running => "running",
            AttemptStatus::Succeeded => "succeeded",
            AttemptStatus::Failed => "failed",
            AttemptStatus::TimedOut => "timed_out",
            AttemptStatus::Skipped => "skipped",
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AttemptStatus::Pending | AttemptStatus::Running)
    }
}

/// 合约验证结果，独立于部署状态
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub success: bool,
    pub message: String,
}

impl VerificationOutcome {
    /// 验证成功
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// 验证失败
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 单个目标网络的部署尝试记录
#[derive(Clone, Debug)]
pub struct DeploymentAttempt {
    /// 目标网络标识
    pub network: String,
    /// 当前状态
    pub status: AttemptStatus,
    /// 部署出的合约地址
    pub contract_address: Option<String>,
    /// 部署交易哈希
    pub transaction_hash: Option<String>,
    /// gas 用量
    pub gas_used: Option<u64>,
    /// 部署工具原始输出
    pub output: String,
    /// 错误信息
    pub error: Option<String>,
    /// 验证结果
    pub verification: Option<VerificationOutcome>,
    /// 实际执行次数（含重试）
    pub tries: u32,
    /// 开始时间
    pub started_at: Option<DateTime<Utc>>,
    /// 结束时间
    pub finished_at: Option<DateTime<Utc>>,
    /// 持续时间（毫秒）
    pub duration_ms: Option<i64>,
}

impl DeploymentAttempt {
    /// 创建待执行记录
    pub fn new(network: impl Into<String>) -> Self {
        Self {
            network: network.into(),
            status: AttemptStatus::Pending,
            contract_address: None,
            transaction_hash: None,
            gas_used: None,
            output: String::new(),
            error: None,
            verification: None,
            tries: 0,
            started_at: None,
            finished_at: None,
            duration_ms: None,
        }
    }

    /// 标记开始执行
    pub fn start(&mut self) {
        self.status = AttemptStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// 标记部署成功
    pub fn succeed(&mut self, output: String) {
        self.status = AttemptStatus::Succeeded;
        self.output = output;
        self.finish_timing();
    }

    /// 标记部署失败
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = AttemptStatus::Failed;
        self.error = Some(error.into());
        self.finish_timing();
    }

    /// 标记超时
    pub fn time_out(&mut self) {
        self.status = AttemptStatus::TimedOut;
        self.error = Some("deployment timed out".to_string());
        self.finish_timing();
    }

    /// 标记跳过，不记录时间
    pub fn skip(&mut self) {
        self.status = AttemptStatus::Skipped;
    }

    fn finish_timing(&mut self) {
        let now = Utc::now();
        self.finished_at = Some(now);
        if let Some(started) = self.started_at {
            self.duration_ms = Some((now - started).num_milliseconds());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_terminal() {
        assert!(!AttemptStatus::Pending.is_terminal());
        assert!(!AttemptStatus::Running.is_terminal());
        assert!(AttemptStatus::Succeeded.is_terminal());
        assert!(AttemptStatus::Failed.is_terminal());
        assert!(AttemptStatus::TimedOut.is_terminal());
        assert!(AttemptStatus::Skipped.is_terminal());
    }

    #[test]
    fn test_attempt_lifecycle() {
        let mut attempt = DeploymentAttempt::new("ethereum");
        assert_eq!(attempt.status, AttemptStatus::Pending);
        assert_eq!(attempt.tries, 0);

        attempt.start();
        assert_eq!(attempt.status, AttemptStatus::Running);
        assert!(attempt.started_at.is_some());

        attempt.succeed("Contract address: 0x0000000000000000000000000000000000000001".to_string());
        assert_eq!(attempt.status, AttemptStatus::Succeeded);
        assert!(attempt.finished_at.is_some());
        assert!(attempt.duration_ms.is_some());
        assert!(attempt.error.is_none());
    }

    #[test]
    fn test_attempt_timeout_message() {
        let mut attempt = DeploymentAttempt::new("polygon");
        attempt.start();
        attempt.time_out();
        assert_eq!(attempt.status, AttemptStatus::TimedOut);
        assert_eq!(attempt.error.as_deref(), Some("deployment timed out"));
    }

    #[test]
    fn test_skipped_attempt_has_no_timing() {
        let mut attempt = DeploymentAttempt::new("bsc");
        attempt.skip();
        assert_eq!(attempt.status, AttemptStatus::Skipped);
        assert!(attempt.started_at.is_none());
        assert!(attempt.finished_at.is_none());
    }
}
