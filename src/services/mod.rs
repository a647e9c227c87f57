//! 服务层模块
//!
//! 部署协调核心：执行、调度与聚合

pub mod aggregator;
pub mod collaborators;
pub mod engine;
pub mod executor;
pub mod output;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::registry::NetworkRegistry;
use crate::config::settings::CoordinatorSettings;
use crate::domain::job::DeploymentJob;
use crate::domain::network::NetworkEnvironment;
use crate::domain::report::DeploymentReport;
use crate::error::CoordinatorError;

use self::aggregator::ResultAggregator;
use self::collaborators::{ContinuationPolicy, DeployAction, ReportStore, Verifier};
use self::engine::CoordinationEngine;
use self::executor::DeploymentExecutor;

/// 部署协调器
///
/// 对外入口：submit 阻塞到所有目标到达终态，返回聚合报告
pub struct Coordinator {
    registry: Arc<NetworkRegistry>,
    engine: CoordinationEngine,
    store: Arc<dyn ReportStore>,
}

impl Coordinator {
    pub fn new(
        registry: Arc<NetworkRegistry>,
        deployer: Arc<dyn DeployAction>,
        verifier: Arc<dyn Verifier>,
        store: Arc<dyn ReportStore>,
        continuation: Arc<dyn ContinuationPolicy>,
        settings: CoordinatorSettings,
    ) -> Self {
        let executor = Arc::new(DeploymentExecutor::new(deployer, verifier));
        let engine = CoordinationEngine::new(registry.clone(), executor, continuation, settings);
        Self {
            registry,
            engine,
            store,
        }
    }

    /// 运行部署任务并返回聚合报告
    ///
    /// 报告持久化失败只记录日志，不吞掉已经完成的结果
    pub async fn submit(&self, job: DeploymentJob) -> Result<DeploymentReport, CoordinatorError> {
        let job = Arc::new(job);
        let attempts = self.engine.run(&job).await;
        let report = ResultAggregator::aggregate(&job, &attempts)?;

        info!(
            job_id = %job.id,
            successful = report.successful,
            failed = report.failed,
            skipped = report.skipped,
            total = report.total_networks,
            "deployment run finished"
        );

        match self.store.store(&report).await {
            Ok(location) => info!(location = %location, "deployment report stored"),
            Err(e) => warn!(error = %e, "failed to store deployment report"),
        }

        Ok(report)
    }

    /// 按注册顺序列出已知网络
    pub fn list_networks(&self) -> &[NetworkEnvironment] {
        self.registry.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::job::DeployStrategy;
    use crate::services::collaborators::AlwaysContinue;
    use crate::services::testing::{
        target, test_job, test_registry, MemoryStore, MockDeployer, MockVerifier,
    };

    fn coordinator(store: Arc<MemoryStore>) -> Coordinator {
        Coordinator::new(
            Arc::new(test_registry(&["alpha", "beta"])),
            Arc::new(MockDeployer::new()),
            Arc::new(MockVerifier::ok()),
            store,
            Arc::new(AlwaysContinue),
            CoordinatorSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_submit_returns_complete_report_and_stores_it() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(store.clone());
        let job = test_job(
            DeployStrategy::Simultaneous,
            vec![target("alpha", 1), target("beta", 1)],
        );

        let report = coordinator.submit(job).await.unwrap();

        assert_eq!(report.total_networks, 2);
        assert_eq!(report.successful, 2);
        assert_eq!(store.stored.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_does_not_lose_report() {
        let store = Arc::new(MemoryStore::failing());
        let coordinator = coordinator(store);
        let job = test_job(DeployStrategy::Simultaneous, vec![target("alpha", 1)]);

        let report = coordinator.submit(job).await.unwrap();
        assert_eq!(report.successful, 1);
    }

    #[tokio::test]
    async fn test_list_networks_in_registration_order() {
        let store = Arc::new(MemoryStore::new());
        let coordinator = coordinator(store);
        let ids: Vec<&str> = coordinator
            .list_networks()
            .iter()
            .map(|n| n.id.as_str())
            .collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
    }
}
