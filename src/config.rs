use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub default_workspace_id: i64,
    pub default_workspace_name: String,
    pub templates_per_page: i64,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://quire.db?mode=rwc".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let server_port = parse_port(
            &env::var("SERVER_PORT").unwrap_or_else(|_| "3000".to_string()),
            ConfigError::InvalidPort,
        )?;

        let default_workspace_id = env::var("DEFAULT_WORKSPACE_ID")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or(ConfigError::InvalidWorkspaceId)?;

        let default_workspace_name =
            env::var("DEFAULT_WORKSPACE_NAME").unwrap_or_else(|_| "Default".to_string());

        let templates_per_page = env::var("TEMPLATES_PER_PAGE")
            .unwrap_or_else(|_| "25".to_string())
            .parse::<i64>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidPageSize)?;

        let otel_exporter_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

        let service_name = env::var("SERVICE_NAME").unwrap_or_else(|_| "quire".to_string());

        let metrics_port = parse_port(
            &env::var("METRICS_PORT").unwrap_or_else(|_| "9000".to_string()),
            ConfigError::InvalidMetricsPort,
        )?;

        Ok(Config {
            database_url,
            server_host,
            server_port,
            default_workspace_id,
            default_workspace_name,
            templates_per_page,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_port(value: &str, error: ConfigError) -> Result<u16, ConfigError> {
    value.trim().parse().map_err(|_| error)
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("METRICS_PORT must be a valid port number")]
    InvalidMetricsPort,

    #[error("DEFAULT_WORKSPACE_ID must be a positive integer")]
    InvalidWorkspaceId,

    #[error("TEMPLATES_PER_PAGE must be a positive integer")]
    InvalidPageSize,
}
