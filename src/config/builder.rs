//! 部署任务构建
//!
//! 解析原始配置并做全量校验：所有问题收集完毕后一次性返回，
//! 校验失败时不会触发任何部署

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::config::registry::NetworkRegistry;
use crate::config::settings::CoordinatorSettings;
use crate::domain::job::{DeployStrategy, DeploymentJob, TargetSpec};
use crate::error::{CoordinatorError, ValidationError};

/// 原始部署配置（JSON 文件结构）
#[derive(Clone, Debug, Deserialize)]
pub struct RawDeploymentConfig {
    pub deployment: RawDeploymentSection,
    /// 网络标识 -> 网络设置，保留文件中的顺序
    #[serde(default)]
    pub networks: serde_json::Map<String, Value>,
}

/// deployment 配置段
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeploymentSection {
    /// 合约名称
    pub contract: String,
    #[serde(default)]
    pub constructor_args: Vec<String>,
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// 重试间隔（毫秒）
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,
    #[serde(default = "default_true")]
    pub verification_enabled: bool,
}

/// 单个网络的配置段
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNetworkSettings {
    pub enabled: bool,
    /// 优先级，数值越小越先部署
    pub priority: i64,
    pub custom_gas_price: Option<u64>,
    /// 部署超时（毫秒）
    pub custom_timeout: Option<u64>,
    pub skip_verification: bool,
    pub dependencies: Vec<String>,
}

impl Default for RawNetworkSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: 1,
            custom_gas_price: None,
            custom_timeout: None,
            skip_verification: false,
            dependencies: Vec::new(),
        }
    }
}

fn default_strategy() -> String {
    "simultaneous".to_string()
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

impl RawDeploymentConfig {
    /// 从 JSON 文件加载
    pub fn from_file(path: &Path) -> Result<Self, CoordinatorError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// 从命令行参数构造，所有网络使用默认设置
    pub fn from_parts(
        networks: &[String],
        contract: &str,
        strategy: Option<&str>,
        constructor_args: Vec<String>,
    ) -> Self {
        let mut network_map = serde_json::Map::new();
        for id in networks {
            network_map.insert(id.clone(), Value::Object(serde_json::Map::new()));
        }

        Self {
            deployment: RawDeploymentSection {
                contract: contract.to_string(),
                constructor_args,
                strategy: strategy.unwrap_or("simultaneous").to_string(),
                retry_attempts: default_retry_attempts(),
                retry_delay: default_retry_delay(),
                verification_enabled: true,
            },
            networks: network_map,
        }
    }
}

/// 部署任务构建器
pub struct DeploymentConfigBuilder<'a> {
    registry: &'a NetworkRegistry,
    settings: &'a CoordinatorSettings,
}

impl<'a> DeploymentConfigBuilder<'a> {
    pub fn new(registry: &'a NetworkRegistry, settings: &'a CoordinatorSettings) -> Self {
        Self { registry, settings }
    }

    /// 校验原始配置并构建任务
    pub fn build(&self, raw: RawDeploymentConfig) -> Result<DeploymentJob, ValidationError> {
        let mut problems = Vec::new();
        let mut targets = Vec::new();
        let mut enabled_count = 0usize;

        let strategy = match raw.deployment.strategy.parse::<DeployStrategy>() {
            Ok(strategy) => strategy,
            Err(problem) => {
                problems.push(problem);
                // 占位值，problems 非空时不会被使用
                DeployStrategy::Simultaneous
            }
        };

        if raw.deployment.contract.trim().is_empty() {
            problems.push("contract name must not be empty".to_string());
        }

        for (id, value) in &raw.networks {
            let settings: RawNetworkSettings = match serde_json::from_value(value.clone()) {
                Ok(settings) => settings,
                Err(e) => {
                    problems.push(format!("network '{}': invalid settings: {}", id, e));
                    continue;
                }
            };

            if !settings.enabled {
                continue;
            }
            enabled_count += 1;

            if !self.registry.contains(id) {
                problems.push(format!("unknown network: {}", id));
                continue;
            }

            if settings.priority < 0 {
                problems.push(format!(
                    "network '{}': priority must be non-negative, got {}",
                    id, settings.priority
                ));
            }

            if settings.custom_timeout == Some(0) {
                problems.push(format!("network '{}': timeout must be positive", id));
            }

            let timeout = settings
                .custom_timeout
                .filter(|&ms| ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(self.settings.default_timeout);

            targets.push(TargetSpec {
                network: id.clone(),
                priority: settings.priority.max(0) as u32,
                gas_price_override: settings.custom_gas_price,
                timeout,
                skip_verification: settings.skip_verification,
                dependencies: settings.dependencies,
            });
        }

        if enabled_count == 0 {
            problems.push("no enabled target networks".to_string());
        }

        let known: HashSet<&str> = targets.iter().map(|t| t.network.as_str()).collect();
        for target in &targets {
            for dep in &target.dependencies {
                if !known.contains(dep.as_str()) {
                    problems.push(format!(
                        "network '{}': dependency '{}' is not a target of this job",
                        target.network, dep
                    ));
                }
            }
        }

        if !problems.is_empty() {
            return Err(ValidationError { problems });
        }

        Ok(DeploymentJob {
            id: Uuid::new_v4().to_string(),
            artifact: raw.deployment.contract,
            constructor_args: raw.deployment.constructor_args,
            strategy,
            retry_attempts: raw.deployment.retry_attempts,
            retry_delay: Duration::from_millis(raw.deployment.retry_delay),
            verification_enabled: raw.deployment.verification_enabled,
            targets,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawDeploymentConfig {
        serde_json::from_value(value).unwrap()
    }

    fn build(value: serde_json::Value) -> Result<DeploymentJob, ValidationError> {
        let registry = NetworkRegistry::builtin();
        let settings = CoordinatorSettings::default();
        DeploymentConfigBuilder::new(&registry, &settings).build(raw(value))
    }

    #[test]
    fn test_build_valid_config() {
        let job = build(json!({
            "deployment": {
                "contract": "Token",
                "constructorArgs": ["1000000"],
                "strategy": "coordinated",
                "retryAttempts": 2,
                "retryDelay": 100,
                "verificationEnabled": true
            },
            "networks": {
                "polygon": { "priority": 2, "customTimeout": 60000 },
                "ethereum": { "priority": 1, "customGasPrice": 30000000000u64 },
                "bsc": { "enabled": false }
            }
        }))
        .unwrap();

        assert_eq!(job.artifact, "Token");
        assert_eq!(job.strategy, DeployStrategy::Coordinated);
        assert_eq!(job.retry_attempts, 2);
        assert_eq!(job.retry_delay, Duration::from_millis(100));
        // 配置顺序保留，禁用的网络被剔除
        assert_eq!(job.network_ids(), vec!["polygon", "ethereum"]);

        let polygon = job.target("polygon").unwrap();
        assert_eq!(polygon.timeout, Duration::from_secs(60));
        let ethereum = job.target("ethereum").unwrap();
        assert_eq!(ethereum.timeout, Duration::from_secs(300));
        assert_eq!(ethereum.gas_price_override, Some(30_000_000_000));
    }

    #[test]
    fn test_defaults_applied() {
        let job = build(json!({
            "deployment": { "contract": "Token" },
            "networks": { "sepolia": {} }
        }))
        .unwrap();

        assert_eq!(job.strategy, DeployStrategy::Simultaneous);
        assert_eq!(job.retry_attempts, 3);
        assert_eq!(job.retry_delay, Duration::from_millis(5000));
        assert!(job.verification_enabled);
        let target = job.target("sepolia").unwrap();
        assert_eq!(target.priority, 1);
        assert!(!target.skip_verification);
    }

    #[test]
    fn test_collects_all_problems() {
        let err = build(json!({
            "deployment": { "contract": "Token", "strategy": "parallel" },
            "networks": {
                "fantom": {},
                "ethereum": { "priority": -1, "customTimeout": 0 }
            }
        }))
        .unwrap_err();

        assert_eq!(err.problems.len(), 4);
        assert!(err.problems.iter().any(|p| p.contains("unknown deployment strategy")));
        assert!(err.problems.iter().any(|p| p.contains("unknown network: fantom")));
        assert!(err.problems.iter().any(|p| p.contains("priority must be non-negative")));
        assert!(err.problems.iter().any(|p| p.contains("timeout must be positive")));
    }

    #[test]
    fn test_rejects_empty_target_set() {
        let err = build(json!({
            "deployment": { "contract": "Token" },
            "networks": {}
        }))
        .unwrap_err();
        assert!(err.problems.iter().any(|p| p.contains("no enabled target networks")));

        let err = build(json!({
            "deployment": { "contract": "Token" },
            "networks": { "ethereum": { "enabled": false } }
        }))
        .unwrap_err();
        assert!(err.problems.iter().any(|p| p.contains("no enabled target networks")));
    }

    #[test]
    fn test_rejects_unknown_dependency() {
        let err = build(json!({
            "deployment": { "contract": "Token" },
            "networks": {
                "ethereum": { "dependencies": ["polygon"] }
            }
        }))
        .unwrap_err();
        assert!(err
            .problems
            .iter()
            .any(|p| p.contains("dependency 'polygon' is not a target of this job")));
    }

    #[test]
    fn test_malformed_network_settings_collected() {
        let err = build(json!({
            "deployment": { "contract": "Token" },
            "networks": {
                "ethereum": { "priority": "high" },
                "fantom": {}
            }
        }))
        .unwrap_err();

        assert!(err.problems.iter().any(|p| p.contains("network 'ethereum': invalid settings")));
        assert!(err.problems.iter().any(|p| p.contains("unknown network: fantom")));
    }

    #[test]
    fn test_from_parts() {
        let raw = RawDeploymentConfig::from_parts(
            &["ethereum".to_string(), "polygon".to_string()],
            "Token",
            Some("sequential"),
            vec!["arg0".to_string()],
        );
        let registry = NetworkRegistry::builtin();
        let settings = CoordinatorSettings::default();
        let job = DeploymentConfigBuilder::new(&registry, &settings)
            .build(raw)
            .unwrap();

        assert_eq!(job.strategy, DeployStrategy::Sequential);
        assert_eq!(job.network_ids(), vec!["ethereum", "polygon"]);
        assert_eq!(job.constructor_args, vec!["arg0"]);
    }
}
