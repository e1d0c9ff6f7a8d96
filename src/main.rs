use std::{env, error::Error};

use ember::{
    config::{EmberConfig, EmberConfigLoadError},
    server::Server,
    utils::leak,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = dotenvy::dotenv();
    #[cfg(debug_assertions)]
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();
    #[cfg(not(debug_assertions))]
    env_logger::init();

    let current_dir = env::current_dir()?;
    let config_file = current_dir.join("settings.toml");

    let config = match EmberConfig::load(&config_file) {
        Ok(config) => {
            // Save config to fill missing fields
            let _ = config.save(&config_file);
            Ok(config)
        }
        Err(error) => match error {
            EmberConfigLoadError::Io(_) => {
                // If config loading fails we generate a default config
                let default_config = EmberConfig::default();
                let _ = default_config.save(&config_file);
                Ok(default_config)
            }
            EmberConfigLoadError::Parse(parse_error) => Err(parse_error),
        },
    }?;

    let server = leak(Server::new(config));

    tokio::select! {
        result = server.start() => result?,
        result = wait_for_signal() => {
            result?;
            log::info!("Received signal, stopping...");
            server.close().await;
        }
    }
    Ok(())
}

async fn wait_for_signal() -> std::io::Result<()> {
    use futures::future::{FutureExt, select_all};
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    let sigint_fut = sigint.recv().boxed();
    let sigterm_fut = sigterm.recv().boxed();

    let _ = select_all([sigint_fut, sigterm_fut]).await;
    Ok(())
}
