pub(crate) const DEFAULT_LISTEN: &str = "127.0.0.1:4544";

pub(crate) const HEALTH_PATH: &str = "/health";
pub(crate) const TX_PATH: &str = "/tx/new";
pub(crate) const MINE_PATH: &str = "/mine";
pub(crate) const CHAIN_PATH: &str = "/chain";
