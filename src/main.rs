//! Multi-Chain Deployment Coordinator - 多链合约部署协调器
//!
//! Usage:
//! - From config file: `multichain-deployer --config deployment_config.json`
//! - Ad hoc: `multichain-deployer --networks ethereum,polygon --contract Token`
//! - With strategy: `multichain-deployer --networks sepolia,mumbai --contract Token --strategy coordinated`
//! - List networks: `multichain-deployer --list-networks`

use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use multichain_deployer::config::builder::{DeploymentConfigBuilder, RawDeploymentConfig};
use multichain_deployer::config::registry::NetworkRegistry;
use multichain_deployer::config::settings::CoordinatorSettings;
use multichain_deployer::domain::attempt::AttemptStatus;
use multichain_deployer::domain::report::DeploymentReport;
use multichain_deployer::error::CoordinatorError;
use multichain_deployer::infra::{FsReportStore, HardhatCli, PromptPolicy};
use multichain_deployer::services::collaborators::{AlwaysContinue, ContinuationPolicy};
use multichain_deployer::services::Coordinator;

/// 命令行参数
#[derive(Default)]
struct CliArgs {
    config: Option<PathBuf>,
    networks: Vec<String>,
    contract: Option<String>,
    strategy: Option<String>,
    constructor_args: Vec<String>,
    list_networks: bool,
    /// 失败后不询问，直接继续
    assume_yes: bool,
}

/// 解析命令行参数
fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                cli.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--networks" if i + 1 < args.len() => {
                cli.networks = args[i + 1]
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                i += 2;
            }
            "--contract" if i + 1 < args.len() => {
                cli.contract = Some(args[i + 1].clone());
                i += 2;
            }
            "--strategy" if i + 1 < args.len() => {
                cli.strategy = Some(args[i + 1].clone());
                i += 2;
            }
            "--constructor-args" if i + 1 < args.len() => {
                cli.constructor_args = args[i + 1]
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
                i += 2;
            }
            "--list-networks" => {
                cli.list_networks = true;
                i += 1;
            }
            "--yes" | "-y" => {
                cli.assume_yes = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    cli
}

fn print_help() {
    println!("Multi-Chain Deployment Coordinator");
    println!();
    println!("USAGE:");
    println!("    multichain-deployer [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <FILE>            Deployment configuration file (JSON)");
    println!("    --networks <LIST>          Comma-separated target networks");
    println!("    --contract <NAME>          Contract name to deploy");
    println!("    --strategy <STRATEGY>      simultaneous | sequential | coordinated");
    println!("    --constructor-args <LIST>  Comma-separated constructor arguments");
    println!("    --list-networks            List available networks");
    println!("    -y, --yes                  Continue after failures without asking");
    println!("    -h, --help                 Print help information");
    println!();
    println!("EXAMPLES:");
    println!("    multichain-deployer --config deployment_config.json");
    println!("    multichain-deployer --networks ethereum,polygon --contract Token");
    println!("    multichain-deployer --networks sepolia,mumbai --contract Token --strategy coordinated");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = parse_args();
    let registry = Arc::new(NetworkRegistry::builtin());

    if args.list_networks {
        println!("Available networks:");
        for network in registry.list() {
            println!(
                "  {}: {} (Chain ID: {})",
                network.id, network.name, network.chain_id
            );
        }
        return;
    }

    let raw = if let Some(path) = &args.config {
        match RawDeploymentConfig::from_file(path) {
            Ok(raw) => raw,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else if !args.networks.is_empty() && args.contract.is_some() {
        RawDeploymentConfig::from_parts(
            &args.networks,
            args.contract.as_deref().unwrap_or_default(),
            args.strategy.as_deref(),
            args.constructor_args.clone(),
        )
    } else {
        eprintln!("Error: provide --config <file>, or --networks and --contract");
        println!();
        print_help();
        std::process::exit(1);
    };

    let settings = CoordinatorSettings::default();
    let builder = DeploymentConfigBuilder::new(&registry, &settings);
    let job = match builder.build(raw) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("Invalid deployment configuration:");
            for problem in &e.problems {
                eprintln!("  - {}", problem);
            }
            std::process::exit(1);
        }
    };

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    let result = rt.block_on(run(job, registry, settings, args.assume_yes));

    match result {
        Ok(report) => print_summary(&report),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run(
    job: multichain_deployer::domain::job::DeploymentJob,
    registry: Arc<NetworkRegistry>,
    settings: CoordinatorSettings,
    assume_yes: bool,
) -> Result<DeploymentReport, CoordinatorError> {
    // Ctrl-C 终止进行中的子进程
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("interrupt received, cancelling in-flight deployments");
                cancel.cancel();
            }
        });
    }

    let project_dir = std::env::current_dir()?;
    let hardhat = Arc::new(
        HardhatCli::new(project_dir)
            .with_verify_timeout(settings.verify_timeout)
            .with_cancel(cancel),
    );
    let store = Arc::new(FsReportStore::new(settings.reports_dir.clone()));
    let continuation: Arc<dyn ContinuationPolicy> = if assume_yes {
        Arc::new(AlwaysContinue)
    } else {
        Arc::new(PromptPolicy)
    };

    let coordinator = Coordinator::new(
        registry,
        hardhat.clone(),
        hardhat,
        store,
        continuation,
        settings,
    );
    coordinator.submit(job).await
}

fn print_summary(report: &DeploymentReport) {
    println!();
    println!("============================================================");
    println!("DEPLOYMENT SUMMARY");
    println!("============================================================");
    println!("Contract: {}", report.artifact);
    println!("Strategy: {}", report.strategy);
    match report.success_rate {
        Some(rate) => println!(
            "Success Rate: {}/{} ({:.1}%)",
            report.successful, report.total_networks, rate
        ),
        None => println!("Success Rate: n/a"),
    }
    println!();

    for outcome in &report.networks {
        match outcome.status {
            AttemptStatus::Succeeded => println!(
                "  {}: {}",
                outcome.network,
                outcome.contract_address.as_deref().unwrap_or("unknown address")
            ),
            AttemptStatus::Skipped => println!("  {}: skipped", outcome.network),
            _ => println!(
                "  {}: {}",
                outcome.network,
                outcome.error.as_deref().unwrap_or("failed")
            ),
        }
    }
    println!("============================================================");
}
