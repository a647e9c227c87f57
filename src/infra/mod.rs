//! 基础设施模块
//!
//! 外部协作方的具体实现（命令执行、hardhat 调用、报告落盘）

pub mod command;
pub mod hardhat;
pub mod prompt;
pub mod report_store;

pub use command::{CommandError, CommandRunner};
pub use hardhat::HardhatCli;
pub use prompt::PromptPolicy;
pub use report_store::FsReportStore;
