//! 配置模块
//!
//! 网络注册表、部署任务构建与运行参数

pub mod builder;
pub mod registry;
pub mod settings;

pub use builder::{DeploymentConfigBuilder, RawDeploymentConfig};
pub use registry::NetworkRegistry;
pub use settings::CoordinatorSettings;
