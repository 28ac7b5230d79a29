use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
#[cfg(feature = "clap")]
pub mod cli;
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    DatabaseSettings, IdChecks, IdRoute, LogFormat, LoggingSettings, ServerSettings,
    Settings, ValidationSettings,
};

/// Prefix of the environment variables overriding file settings,
/// e.g. `SAMPLE_API__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "SAMPLE_API";

/// Loads the application configuration.
///
/// Sources are layered lowest to highest: struct defaults, the TOML file
/// (`config.toml` in the working directory when `path` is `None`, optional in
/// that case), `SAMPLE_API__*` environment variables, then `DATABASE_URL` for
/// an otherwise empty database URL. The result is not validated here so that
/// callers can apply command-line overrides first.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let mut settings = builder.try_deserialize::<Settings>()?;
    settings.apply_env_fallbacks();

    Ok(settings)
}
