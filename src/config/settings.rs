//! 运行参数
//!
//! 显式配置对象，传入构建器、引擎与聚合器，不使用进程级全局状态

use std::path::PathBuf;
use std::time::Duration;

/// 协调器运行参数
#[derive(Clone, Debug)]
pub struct CoordinatorSettings {
    /// simultaneous 阶段的最大并发数
    pub max_parallel: usize,
    /// sequential 相邻目标之间的间隔
    pub step_delay: Duration,
    /// coordinated 批次之间的固定等待，等区块确认落定
    pub barrier_delay: Duration,
    /// 未配置 customTimeout 时的默认部署超时
    pub default_timeout: Duration,
    /// 合约验证超时
    pub verify_timeout: Duration,
    /// 报告输出目录
    pub reports_dir: PathBuf,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            max_parallel: 5,
            step_delay: Duration::from_secs(2),
            barrier_delay: Duration::from_secs(10),
            default_timeout: Duration::from_secs(300),
            verify_timeout: Duration::from_secs(120),
            reports_dir: PathBuf::from("reports"),
        }
    }
}
