//! 交互式继续决策
//!
//! 顺序部署中途失败时询问操作者是否继续；输入在阻塞线程中读取

use std::io::{self, BufRead, Write};

use async_trait::async_trait;

use crate::domain::attempt::DeploymentAttempt;
use crate::domain::network::NetworkEnvironment;
use crate::services::collaborators::ContinuationPolicy;

/// 终端询问策略，默认回答为否
pub struct PromptPolicy;

#[async_trait]
impl ContinuationPolicy for PromptPolicy {
    async fn should_continue_after_failure(
        &self,
        network: &NetworkEnvironment,
        _attempt: &DeploymentAttempt,
    ) -> bool {
        let question = format!(
            "Deployment to {} failed. Continue with remaining networks? (y/N): ",
            network.id
        );

        tokio::task::spawn_blocking(move || {
            let mut stdout = io::stdout();
            let _ = write!(stdout, "{}", question);
            let _ = stdout.flush();

            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line).is_err() {
                return false;
            }
            line.trim().eq_ignore_ascii_case("y")
        })
        .await
        .unwrap_or(false)
    }
}
