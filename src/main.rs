use toque_sync::{
    config::Config,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("toque-sync".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    let config = Config::new()?;

    let application = Application::build(config).await?;

    tracing::info!(
        "Started at http://{}:{}",
        application.host(),
        application.port()
    );

    application.run_until_stopped().await?;

    Ok(())
}
