use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hashledger_core::{ChainSnapshot, MineReport, Submission, Transaction};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "hashledger-cli")]
#[command(about = "CLI client for the hashledger node")]
struct Cli {
    /// Node base URL
    #[arg(long, global = true, default_value = "http://127.0.0.1:4544")]
    node: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit a transaction
    Submit {
        #[arg(long)]
        sender: String,
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        amount: u64,
    },
    /// Mine the pending transactions into a block
    Mine,
    /// Print the whole chain
    Chain,
    /// Submit and mine repeatedly, reporting the time each block took
    Simulate {
        /// Blocks to mine
        #[arg(long, default_value_t = 15)]
        blocks: u32,
        /// Transactions submitted before each block
        #[arg(long, default_value_t = 8)]
        tx_per_block: u32,
        /// Amount carried by every transaction
        #[arg(long, default_value_t = 200)]
        amount: u64,
        #[arg(long, default_value = "sender")]
        sender: String,
        #[arg(long, default_value = "recipient")]
        recipient: String,
        /// Append each block's mining time in nanoseconds to this file
        #[arg(long)]
        results: Option<PathBuf>,
    },
}

struct NodeClient {
    http: Client,
    base: String,
}

impl NodeClient {
    fn new(base: &str) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    async fn submit(&self, tx: &Transaction) -> Result<Submission> {
        let res = self
            .http
            .post(format!("{}/tx/new", self.base))
            .json(tx)
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }

    async fn mine(&self) -> Result<MineReport> {
        let res = self.http.get(format!("{}/mine", self.base)).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            anyhow::bail!("mining failed ({status}): {body}");
        }
        Ok(res.json().await?)
    }

    async fn chain(&self) -> Result<ChainSnapshot> {
        let res = self
            .http
            .get(format!("{}/chain", self.base))
            .send()
            .await?
            .error_for_status()?;
        Ok(res.json().await?)
    }
}

async fn append_result(path: &Path, elapsed_time_ns: u64) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await?;
    }
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("opening {}", path.display()))?;
    file.write_all(format!("{elapsed_time_ns}\n").as_bytes()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .pretty()
        .init();

    let cli = Cli::parse();
    let node = NodeClient::new(&cli.node);
    match cli.cmd {
        Command::Submit {
            sender,
            recipient,
            amount,
        } => {
            let submission = node.submit(&Transaction::new(sender, recipient, amount)).await?;
            println!("{}", serde_json::to_string_pretty(&submission)?);
        }
        Command::Mine => {
            let report = node.mine().await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Chain => {
            let chain = node.chain().await?;
            println!("{}", serde_json::to_string_pretty(&chain)?);
        }
        Command::Simulate {
            blocks,
            tx_per_block,
            amount,
            sender,
            recipient,
            results,
        } => {
            info!(blocks, tx_per_block, "starting simulation against {}", cli.node);
            let tx = Transaction::new(sender, recipient, amount);
            for round in 1..=blocks {
                for _ in 0..tx_per_block {
                    if let Err(err) = node.submit(&tx).await {
                        warn!(error = %err, "transaction rejected");
                    }
                }
                match node.mine().await {
                    Ok(report) => {
                        println!(
                            "block {} mined in {} ns (nonce {})",
                            report.index, report.elapsed_time_ns, report.nonce
                        );
                        if let Some(path) = &results {
                            append_result(path, report.elapsed_time_ns).await?;
                        }
                    }
                    Err(err) => warn!(round, error = %err, "mining request failed"),
                }
            }
        }
    }
    Ok(())
}
