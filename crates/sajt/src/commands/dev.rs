//! Rebuild loop with the development server running beside it.

use std::time::Duration;

use anyhow::Result;
use sajt_server::{DevServer, ServerError};
use sajt_static::BuildConfig;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::RunSettings;

/// Rebuild every interval until a build fails or the process is interrupted.
pub async fn run(settings: RunSettings) -> Result<()> {
    let (result, server_task) = rebuild_beside_server(settings).await;

    if !server_task.is_finished() {
        if let Ok(Err(e)) = server_task.await {
            tracing::warn!("Dev server: {}", e);
        }
    }

    result
}

/// Run the rebuild loop and the dev server side by side. Once either ends,
/// the server is told to shut down and its task is handed back.
async fn rebuild_beside_server(
    settings: RunSettings,
) -> (Result<()>, JoinHandle<Result<(), ServerError>>) {
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = DevServer::new(settings.server);
    let mut server_task = tokio::spawn(server.start(async {
        let _ = stop_rx.await;
    }));

    let result = tokio::select! {
        result = rebuild_loop(&settings.build, settings.interval) => result,
        joined = &mut server_task => match joined {
            Ok(result) => result.map_err(Into::into),
            Err(e) => Err(e.into()),
        },
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted");
            Ok(())
        }
    };

    let _ = stop_tx.send(());
    (result, server_task)
}

async fn rebuild_loop(config: &BuildConfig, interval: Duration) -> Result<()> {
    loop {
        super::build::run(config.clone()).await?;

        tracing::info!(
            "Waiting {} seconds until next rebuild...",
            interval.as_secs()
        );
        tokio::time::sleep(interval).await;
    }
}
