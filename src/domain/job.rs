//! 部署任务领域模型

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

/// 部署策略
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeployStrategy {
    /// 所有目标并发部署
    Simultaneous,
    /// 按优先级逐个部署
    Sequential,
    /// 按优先级分批部署，批次间等待确认
    Coordinated,
}

impl DeployStrategy {
    /// 转换为字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            DeployStrategy::Simultaneous => "simultaneous",
            DeployStrategy::Sequential => "sequential",
            DeployStrategy::Coordinated => "coordinated",
        }
    }
}

impl fmt::Display for DeployStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeployStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simultaneous" => Ok(DeployStrategy::Simultaneous),
            "sequential" => Ok(DeployStrategy::Sequential),
            "coordinated" => Ok(DeployStrategy::Coordinated),
            other => Err(format!(
                "unknown deployment strategy: '{}' (expected simultaneous, sequential or coordinated)",
                other
            )),
        }
    }
}

/// 单个目标网络的部署参数
#[derive(Clone, Debug)]
pub struct TargetSpec {
    /// 目标网络标识
    pub network: String,
    /// 优先级，数值越小越先部署
    pub priority: u32,
    /// 自定义 gas 价格（wei），覆盖网络默认策略
    pub gas_price_override: Option<u64>,
    /// 部署超时
    pub timeout: Duration,
    /// 跳过合约验证
    pub skip_verification: bool,
    /// 依赖的其他目标网络（仅记录，不参与调度）
    pub dependencies: Vec<String>,
}

/// 部署任务
///
/// 由配置构建器校验后创建，整个运行期间不可变
#[derive(Clone, Debug)]
pub struct DeploymentJob {
    pub id: String,
    /// 合约名称
    pub artifact: String,
    /// 构造函数参数
    pub constructor_args: Vec<String>,
    /// 部署策略
    pub strategy: DeployStrategy,
    /// 部署失败后的重试次数
    pub retry_attempts: u32,
    /// 重试间隔
    pub retry_delay: Duration,
    /// 是否启用合约验证
    pub verification_enabled: bool,
    /// 目标网络，保持配置中的顺序
    pub targets: Vec<TargetSpec>,
}

impl DeploymentJob {
    /// 按配置顺序返回目标网络标识
    pub fn network_ids(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.network.as_str()).collect()
    }

    /// 查找某个目标的部署参数
    pub fn target(&self, network: &str) -> Option<&TargetSpec> {
        self.targets.iter().find(|t| t.network == network)
    }
}
