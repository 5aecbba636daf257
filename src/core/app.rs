use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::camera::{DisplaySurface, GstCamera, PreviewWindow};
use crate::capture::{AlbumSink, CaptureSink};
use crate::config::{CameraSource, JawFrameConfig};
use crate::core::permission::{DeviceGate, PortalGate};
use crate::session::{Event, Session};
use crate::session::state::SessionSettings;

/// Depth of the session event queue; streaming threads drop events beyond it
const EVENT_QUEUE_DEPTH: usize = 64;

pub(crate) fn run() -> Result<()> {
    let config = JawFrameConfig::load();
    log::debug!("Loaded config: {:?}", config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build async runtime")?;

    runtime.block_on(run_session(config))
}

async fn run_session(config: JawFrameConfig) -> Result<()> {
    let (tx, rx) = mpsc::channel(EVENT_QUEUE_DEPTH);

    let preview = PreviewWindow::new(&config, tx.clone())?;
    preview.start()?;

    let sink: Arc<dyn CaptureSink> = Arc::new(AlbumSink::in_home()?);
    let surface: Arc<dyn DisplaySurface> = preview.clone();
    let session = Session::new(
        SessionSettings::from(&config),
        GstCamera::new(),
        surface,
        sink,
        tx.clone(),
    );

    let quit = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("Interrupted");
            let _ = quit.send(Event::Quit).await;
        }
    });
    drop(tx);

    match &config.camera_source {
        CameraSource::Portal => session.run(rx, PortalGate).await,
        CameraSource::Device(path) => session.run(rx, DeviceGate::new(path.clone())).await,
    }

    preview.stop();
    Ok(())
}
