//! 统一错误类型
//!
//! 配置期与聚合期错误抛给调用方；单个目标的运行期错误只记录在尝试记录上，
//! 绝不中断其他目标

use thiserror::Error;

/// 配置校验错误
///
/// 携带检测到的全部问题，而不是遇到第一个就失败
#[derive(Debug, Error)]
#[error("invalid deployment configuration: {}", .problems.join("; "))]
pub struct ValidationError {
    pub problems: Vec<String>,
}

/// 未注册的目标网络
#[derive(Debug, Error)]
#[error("unknown network: {0}")]
pub struct UnknownNetworkError(pub String);

/// 聚合不变量被破坏：某个启用目标缺少尝试记录
///
/// 核心中唯一的致命错误，出现时放弃生成报告
#[derive(Debug, Error)]
#[error("missing attempt for enabled network: {network}")]
pub struct AggregationError {
    pub network: String,
}

/// 单目标部署的运行期错误
///
/// 由执行器折叠为尝试记录上的状态与错误文本
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// 部署超时
    #[error("deployment timed out")]
    Timeout,
    /// 部署失败
    #[error("{0}")]
    Failure(String),
}

/// 报告持久化错误
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode report: {0}")]
    Encode(#[from] serde_json::Error),
}

/// 协调器顶层错误
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    UnknownNetwork(#[from] UnknownNetworkError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error("invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
