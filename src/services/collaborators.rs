//! 外部协作方契约
//!
//! 核心只依赖这些抽象接口，具体实现见 infra 模块

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::attempt::{DeploymentAttempt, VerificationOutcome};
use crate::domain::network::{GasPricePolicy, NetworkEnvironment};
use crate::domain::report::DeploymentReport;
use crate::error::{ExecutionError, StoreError};

/// 部署动作的执行结果
#[derive(Clone, Debug)]
pub struct DeployOutcome {
    /// 退出状态是否成功
    pub success: bool,
    /// 原始输出（stdout 与 stderr 合并）
    pub output: String,
    /// 耗时
    pub elapsed: Duration,
}

/// 部署动作协作方
///
/// 实现方应在 timeout 内自行结束；执行器另有硬性兜底
#[async_trait]
pub trait DeployAction: Send + Sync {
    async fn deploy(
        &self,
        network: &NetworkEnvironment,
        artifact: &str,
        constructor_args: &[String],
        gas_price: &GasPricePolicy,
        timeout: Duration,
    ) -> Result<DeployOutcome, ExecutionError>;
}

/// 合约验证协作方
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(
        &self,
        network: &NetworkEnvironment,
        address: &str,
        constructor_args: &[String],
    ) -> VerificationOutcome;
}

/// 报告持久化协作方
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// 写入报告，返回存储位置
    async fn store(&self, report: &DeploymentReport) -> Result<String, StoreError>;
}

/// 顺序部署失败后的继续决策
#[async_trait]
pub trait ContinuationPolicy: Send + Sync {
    async fn should_continue_after_failure(
        &self,
        network: &NetworkEnvironment,
        attempt: &DeploymentAttempt,
    ) -> bool;
}

/// 失败即停止
pub struct StopOnFailure;

#[async_trait]
impl ContinuationPolicy for StopOnFailure {
    async fn should_continue_after_failure(
        &self,
        _network: &NetworkEnvironment,
        _attempt: &DeploymentAttempt,
    ) -> bool {
        false
    }
}

/// 始终继续，用于无人值守运行
pub struct AlwaysContinue;

#[async_trait]
impl ContinuationPolicy for AlwaysContinue {
    async fn should_continue_after_failure(
        &self,
        _network: &NetworkEnvironment,
        _attempt: &DeploymentAttempt,
    ) -> bool {
        true
    }
}
