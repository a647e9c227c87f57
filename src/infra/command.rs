//! 命令执行器
//!
//! 运行外部部署工具进程，支持：
//! - 输出捕获
//! - 超时控制
//! - 取消支持
//! - 环境变量注入

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

/// 命令执行错误
#[derive(Debug, Error)]
pub enum CommandError {
    /// 命令启动失败
    #[error("failed to spawn command: {0}")]
    SpawnFailed(std::io::Error),
    /// 命令超时
    #[error("command timed out")]
    Timeout,
    /// 命令被取消
    #[error("command was cancelled")]
    Cancelled,
}

/// 命令执行器
pub struct CommandRunner;

impl CommandRunner {
    /// 执行命令并捕获输出
    ///
    /// 超时或取消时子进程被终止
    pub async fn run_captured(
        program: &str,
        args: &[&str],
        work_dir: &Path,
        envs: &[(String, String)],
        cancel: &CancellationToken,
        timeout: Duration,
    ) -> Result<Output, CommandError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(work_dir)
            .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true);

        tokio::select! {
            result = command.output() => {
                result.map_err(CommandError::SpawnFailed)
            }
            _ = tokio::time::sleep(timeout) => {
                error!(program, "command timed out after {:?}", timeout);
                Err(CommandError::Timeout)
            }
            _ = cancel.cancelled() => {
                warn!(program, "command cancelled, killing process");
                Err(CommandError::Cancelled)
            }
        }
    }
}
