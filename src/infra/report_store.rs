//! 报告持久化
//!
//! 写入结构化 JSON 报告，并可同时生成 Markdown 摘要

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::attempt::AttemptStatus;
use crate::domain::report::DeploymentReport;
use crate::error::StoreError;
use crate::services::collaborators::ReportStore;

/// 文件系统报告存储
pub struct FsReportStore {
    reports_dir: PathBuf,
    /// 是否同时生成 Markdown 摘要
    render_markdown: bool,
}

impl FsReportStore {
    pub fn new(reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            reports_dir: reports_dir.into(),
            render_markdown: true,
        }
    }

    pub fn json_only(mut self) -> Self {
        self.render_markdown = false;
        self
    }
}

#[async_trait]
impl ReportStore for FsReportStore {
    async fn store(&self, report: &DeploymentReport) -> Result<String, StoreError> {
        tokio::fs::create_dir_all(&self.reports_dir).await?;

        let stamp = report.generated_at.format("%Y%m%d_%H%M%S");
        let json_path = self
            .reports_dir
            .join(format!("deployment_report_{}.json", stamp));
        let json = serde_json::to_string_pretty(report)?;
        tokio::fs::write(&json_path, json).await?;

        if self.render_markdown {
            let md_path = self
                .reports_dir
                .join(format!("deployment_report_{}.md", stamp));
            tokio::fs::write(&md_path, render_markdown(report)).await?;
        }

        Ok(json_path.display().to_string())
    }
}

/// 渲染 Markdown 摘要
pub fn render_markdown(report: &DeploymentReport) -> String {
    let mut md = String::new();
    md.push_str("# Multi-Chain Deployment Report\n\n");
    md.push_str("## Summary\n\n");
    md.push_str(&format!("- **Contract**: {}\n", report.artifact));
    md.push_str(&format!("- **Strategy**: {}\n", report.strategy));
    md.push_str(&format!("- **Total Networks**: {}\n", report.total_networks));
    md.push_str(&format!("- **Successful**: {}\n", report.successful));
    md.push_str(&format!("- **Failed**: {}\n", report.failed));
    if report.skipped > 0 {
        md.push_str(&format!("- **Skipped**: {}\n", report.skipped));
    }
    match report.success_rate {
        Some(rate) => md.push_str(&format!("- **Success Rate**: {:.1}%\n", rate)),
        None => md.push_str("- **Success Rate**: n/a\n"),
    }
    md.push_str(&format!(
        "- **Generated**: {}\n",
        report.generated_at.to_rfc3339()
    ));

    md.push_str("\n## Network Results\n\n");
    md.push_str(
        "| Network | Status | Contract Address | Transaction Hash | Gas Used | Verification |\n",
    );
    md.push_str(
        "|---------|--------|------------------|------------------|----------|--------------|\n",
    );

    for outcome in &report.networks {
        let address = outcome.contract_address.as_deref().unwrap_or("N/A");
        let tx_hash = outcome.transaction_hash.as_deref().unwrap_or("N/A");
        let gas = outcome
            .gas_used
            .map(|g| g.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let verification = match &outcome.verification {
            Some(v) if v.success => "verified",
            Some(_) => "failed",
            None => "N/A",
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            outcome.network,
            outcome.status.as_str(),
            address,
            tx_hash,
            gas,
            verification
        ));
    }

    let failed: Vec<_> = report
        .networks
        .iter()
        .filter(|n| matches!(n.status, AttemptStatus::Failed | AttemptStatus::TimedOut))
        .collect();
    if !failed.is_empty() {
        md.push_str("\n## Failed Deployments\n\n");
        for outcome in failed {
            md.push_str(&format!("### {}\n", outcome.network));
            md.push_str(&format!(
                "**Error**: {}\n\n",
                outcome.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    md
}
