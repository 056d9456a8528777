mod constants;
mod routes;

use clap::Parser;
use hashledger_core::{HashAlgorithm, LedgerConfig, LedgerService};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing::{info, Level};

use crate::constants::DEFAULT_LISTEN;

#[derive(Parser, Debug)]
struct Args {
    /// Address to listen on, e.g. 127.0.0.1:4544
    #[arg(long, default_value = DEFAULT_LISTEN)]
    listen: String,

    /// TOML file with `hash`, `puzzle` and `miner_id`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Digest used for block hashes, proofs and merkle roots
    #[arg(long)]
    hash: Option<HashAlgorithm>,

    /// Leading zero hex characters required of a proof
    #[arg(long)]
    puzzle: Option<usize>,

    /// Recipient of mining rewards
    #[arg(long)]
    miner_id: Option<String>,
}

impl Args {
    fn ledger_config(&self) -> anyhow::Result<LedgerConfig> {
        let mut config = match &self.config {
            Some(path) => LedgerConfig::load(path)?,
            None => LedgerConfig::default(),
        };
        if let Some(hash) = self.hash {
            config.hash = hash;
        }
        if let Some(puzzle) = self.puzzle {
            config.puzzle = puzzle;
        }
        if let Some(miner_id) = &self.miner_id {
            config.miner_id = miner_id.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = args.ledger_config()?;
    let service = Arc::new(LedgerService::new(&config)?);
    info!(
        hash = %config.hash,
        puzzle = config.puzzle,
        miner_id = %config.miner_id,
        "ledger ready"
    );

    let app = routes::router(service);

    let addr: SocketAddr = args.listen.parse()?;
    info!("hashledger-node listening on http://{addr}");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
