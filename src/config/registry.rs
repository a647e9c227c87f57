//! 网络注册表
//!
//! 进程生命周期内只读的目标网络目录，不对核心暴露任何写操作

use std::collections::HashMap;

use crate::domain::network::{GasPricePolicy, NetworkEnvironment};
use crate::error::UnknownNetworkError;

/// 网络注册表
pub struct NetworkRegistry {
    /// 按注册顺序保存
    networks: Vec<NetworkEnvironment>,
    /// id -> 下标索引
    index: HashMap<String, usize>,
}

impl NetworkRegistry {
    /// 使用自定义网络目录创建
    pub fn new(networks: Vec<NetworkEnvironment>) -> Self {
        let index = networks
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self { networks, index }
    }

    /// 内置网络目录
    pub fn builtin() -> Self {
        Self::new(vec![
            network(
                "ethereum",
                "Ethereum Mainnet",
                1,
                "https://mainnet.infura.io/v3/{INFURA_API_KEY}",
                GasPricePolicy::Auto,
                2,
                "https://etherscan.io",
                "https://api.etherscan.io/api",
            ),
            network(
                "polygon",
                "Polygon Mainnet",
                137,
                "https://polygon-rpc.com",
                GasPricePolicy::Auto,
                5,
                "https://polygonscan.com",
                "https://api.polygonscan.com/api",
            ),
            network(
                "arbitrum",
                "Arbitrum One",
                42161,
                "https://arbitrum-mainnet.infura.io/v3/{INFURA_API_KEY}",
                GasPricePolicy::Auto,
                3,
                "https://arbiscan.io",
                "https://api.arbiscan.io/api",
            ),
            network(
                "optimism",
                "Optimism",
                10,
                "https://optimism-mainnet.infura.io/v3/{INFURA_API_KEY}",
                GasPricePolicy::Auto,
                3,
                "https://optimistic.etherscan.io",
                "https://api-optimistic.etherscan.io/api",
            ),
            network(
                "bsc",
                "Binance Smart Chain",
                56,
                "https://bsc-dataseed1.binance.org",
                GasPricePolicy::Auto,
                3,
                "https://bscscan.com",
                "https://api.bscscan.com/api",
            ),
            network(
                "avalanche",
                "Avalanche C-Chain",
                43114,
                "https://api.avax.network/ext/bc/C/rpc",
                GasPricePolicy::Auto,
                2,
                "https://snowtrace.io",
                "https://api.snowtrace.io/api",
            ),
            network(
                "goerli",
                "Goerli Testnet",
                5,
                "https://goerli.infura.io/v3/{INFURA_API_KEY}",
                GasPricePolicy::Fixed(20_000_000_000),
                1,
                "https://goerli.etherscan.io",
                "https://api-goerli.etherscan.io/api",
            ),
            network(
                "sepolia",
                "Sepolia Testnet",
                11155111,
                "https://sepolia.infura.io/v3/{INFURA_API_KEY}",
                GasPricePolicy::Fixed(20_000_000_000),
                1,
                "https://sepolia.etherscan.io",
                "https://api-sepolia.etherscan.io/api",
            ),
            network(
                "mumbai",
                "Polygon Mumbai",
                80001,
                "https://rpc-mumbai.maticvigil.com",
                GasPricePolicy::Fixed(20_000_000_000),
                2,
                "https://mumbai.polygonscan.com",
                "https://api-testnet.polygonscan.com/api",
            ),
        ])
    }

    /// 查找网络
    pub fn lookup(&self, id: &str) -> Result<&NetworkEnvironment, UnknownNetworkError> {
        self.index
            .get(id)
            .map(|&i| &self.networks[i])
            .ok_or_else(|| UnknownNetworkError(id.to_string()))
    }

    /// 是否包含指定网络
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// 按注册顺序返回所有网络
    pub fn list(&self) -> &[NetworkEnvironment] {
        &self.networks
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn network(
    id: &str,
    name: &str,
    chain_id: u64,
    rpc_url: &str,
    gas_price: GasPricePolicy,
    confirmations: u32,
    block_explorer: &str,
    explorer_api: &str,
) -> NetworkEnvironment {
    NetworkEnvironment {
        id: id.to_string(),
        name: name.to_string(),
        chain_id,
        rpc_url: rpc_url.to_string(),
        gas_price,
        confirmations,
        block_explorer: block_explorer.to_string(),
        explorer_api: explorer_api.to_string(),
    }
}
