use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,
    /// Directory to store documents
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables:
    /// - `SHOPDRAFT_SERVER_PORT` (default: 8080)
    /// - `SHOPDRAFT_SERVER_DATA_DIR` (default: platform data dir + /shopdraft-server)
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("SHOPDRAFT_SERVER_PORT").ok(),
            std::env::var("SHOPDRAFT_SERVER_DATA_DIR").ok(),
        )
    }

    fn from_vars(port: Option<String>, data_dir: Option<String>) -> Self {
        let port = port.and_then(|p| p.parse().ok()).unwrap_or(8080);

        let data_dir = data_dir.map(PathBuf::from).unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("shopdraft-server")
        });

        Self { port, data_dir }
    }
}
