//! 目标网络领域模型

use std::fmt;

/// Gas 价格策略
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GasPricePolicy {
    /// 由节点自动估算
    Auto,
    /// 固定 gas 价格（wei）
    Fixed(u64),
}

impl GasPricePolicy {
    /// 转换为传给部署工具的环境变量值；自动估算时不设置
    pub fn as_env_value(&self) -> Option<String> {
        match self {
            GasPricePolicy::Auto => None,
            GasPricePolicy::Fixed(price) => Some(price.to_string()),
        }
    }
}

impl fmt::Display for GasPricePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasPricePolicy::Auto => write!(f, "auto"),
            GasPricePolicy::Fixed(price) => write!(f, "{}", price),
        }
    }
}

/// 目标网络环境
///
/// 注册表初始化时创建，进程生命周期内只读
#[derive(Clone, Debug)]
pub struct NetworkEnvironment {
    /// 网络标识 (e.g., "ethereum", "polygon")
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 链 ID
    pub chain_id: u64,
    /// RPC 端点
    pub rpc_url: String,
    /// 默认 gas 价格策略
    pub gas_price: GasPricePolicy,
    /// 所需区块确认数
    pub confirmations: u32,
    /// 区块浏览器地址
    pub block_explorer: String,
    /// 浏览器 API 端点
    pub explorer_api: String,
}
