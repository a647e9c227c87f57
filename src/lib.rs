//! Multi-Chain Deployment Coordinator - 多链合约部署协调器
//!
//! 把单个合约部署到多个目标网络，独立跟踪每个目标的结果并生成聚合报告

pub mod error;
pub mod domain;
pub mod config;
pub mod infra;
pub mod services;
