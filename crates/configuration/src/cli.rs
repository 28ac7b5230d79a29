use crate::settings::Settings;
use std::path::PathBuf;

/// Command-line overrides, applied on top of file and environment sources.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct Overrides {
    /// Path to a TOML configuration file (defaults to ./config.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Interface to bind the HTTP server to.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Port to bind the HTTP server to.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Connection URL of the sample database.
    #[arg(long, global = true)]
    pub database_url: Option<String>,
}

impl Overrides {
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.server.host = host.clone();
        }
        if let Some(port) = self.port {
            settings.server.port = port;
        }
        if let Some(url) = &self.database_url {
            settings.database.url = url.clone();
        }
    }
}
