use clickhouse::Client as ClickHouseClient;

use crate::config::ServerConfig;

// App state - Shared across handlers
pub struct AppState {
    pub nats: async_nats::Client,
    pub clickhouse: ClickHouseClient,
    pub config: ServerConfig,
}
