// This main function is the entry point when running `cargo run -p web-server`.
// It loads settings from ./config.toml and the environment, then serves.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let settings = configuration::load_settings(None)?;
    settings.validate()?;
    let _log_guard = configuration::init_tracing(&settings.logging)?;
    web_server::run_server(settings).await
}
