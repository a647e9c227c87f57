//! Deploy output interpretation
//!
//! Extracts the contract address, transaction hash and gas usage from the
//! deploy tool's raw text output.

use std::sync::OnceLock;

use regex::Regex;

static ADDRESS_RE: OnceLock<Regex> = OnceLock::new();
static TX_HASH_RE: OnceLock<Regex> = OnceLock::new();
static GAS_USED_RE: OnceLock<Regex> = OnceLock::new();

// 词边界保证 40 位地址不会落在 64 位交易哈希内部
fn address_re() -> &'static Regex {
    ADDRESS_RE.get_or_init(|| Regex::new(r"\b0x[a-fA-F0-9]{40}\b").unwrap())
}

fn tx_hash_re() -> &'static Regex {
    TX_HASH_RE.get_or_init(|| Regex::new(r"\b0x[a-fA-F0-9]{64}\b").unwrap())
}

fn gas_used_re() -> &'static Regex {
    GAS_USED_RE.get_or_init(|| Regex::new(r"Gas used:\s*(\d+)").unwrap())
}

/// Which address token to take when scanning the whole output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddressPick {
    First,
    /// Deploy logs conventionally end with the address of the contract
    /// just created.
    Last,
}

/// Fields recovered from a deploy run's output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedDeployOutput {
    pub contract_address: Option<String>,
    pub transaction_hash: Option<String>,
    pub gas_used: Option<u64>,
}

/// Interpreter for deploy tool output.
///
/// Labeled lines (`Contract address:` / `deployed to:` / `Transaction hash:`)
/// take precedence; when none name an address, the whole output is scanned
/// and the pick strategy decides which token wins.
#[derive(Clone, Copy, Debug)]
pub struct OutputInterpreter {
    address_pick: AddressPick,
}

impl Default for OutputInterpreter {
    fn default() -> Self {
        Self {
            address_pick: AddressPick::Last,
        }
    }
}

impl OutputInterpreter {
    pub fn new(address_pick: AddressPick) -> Self {
        Self { address_pick }
    }

    /// 解析部署输出
    pub fn parse(&self, output: &str) -> ParsedDeployOutput {
        let mut parsed = ParsedDeployOutput::default();

        for line in output.lines() {
            if line.contains("Contract address:") || line.contains("deployed to:") {
                if let Some(m) = address_re().find(line) {
                    parsed.contract_address = Some(m.as_str().to_string());
                }
            } else if line.contains("Transaction hash:") {
                if let Some(m) = tx_hash_re().find(line) {
                    parsed.transaction_hash = Some(m.as_str().to_string());
                }
            } else if let Some(caps) = gas_used_re().captures(line) {
                parsed.gas_used = caps[1].parse().ok();
            }
        }

        if parsed.contract_address.is_none() {
            let mut matches = address_re().find_iter(output);
            let pick = match self.address_pick {
                AddressPick::First => matches.next(),
                AddressPick::Last => matches.last(),
            };
            parsed.contract_address = pick.map(|m| m.as_str().to_string());
        }

        parsed
    }
}
