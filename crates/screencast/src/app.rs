use crate::{
    AppError, AppResult, CliCommand, RecordArgs,
    config::Config,
    report::{CatalogReport, PlanReport},
};

use std::{fs, io, panic::Location, path::PathBuf, sync::Arc};

use error_location::ErrorLocation;
use screencast_core::{
    CaptureBackend, DeviceDiscovery, EnumerationStrategy, RecorderSettings, RecorderState,
    ScreenRecorder, SystemDiscovery, backend_for, native_backend, probe_encoder,
    temp_recording_path,
};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, instrument, warn};

/// Drives one command against a single recorder.
pub struct App {
    pub(crate) config: Config,
    pub(crate) backend: Arc<dyn CaptureBackend>,
}

impl App {
    /// Creates the app for `strategy`, or the native backend when `None`.
    pub(crate) fn new(config: Config, strategy: Option<EnumerationStrategy>) -> Self {
        let backend = strategy.map_or_else(native_backend, backend_for);
        Self { config, backend }
    }

    /// Run one command to completion.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub(crate) async fn run(self, command: CliCommand) -> AppResult<()> {
        match command {
            CliCommand::Devices => self.list_devices().await,
            CliCommand::Plan(args) => self.show_plan(&args).await,
            CliCommand::Record(args) => self.record(&args).await,
            CliCommand::Config => self.show_config(),
        }
    }

    fn discovery(&self) -> SystemDiscovery {
        SystemDiscovery::new(self.backend.capabilities().enumeration, self.config.encoder.path.clone())
            .with_microphone_label(self.config.capture.microphone_label.clone())
    }

    fn settings(&self, args: &RecordArgs) -> RecorderSettings {
        let mut settings = self.config.recorder_settings();
        settings.capture_desktop_audio &= !args.no_desktop_audio;
        settings.capture_microphone_audio &= !args.no_microphone;
        settings
    }

    fn recorder(&self, args: &RecordArgs) -> ScreenRecorder {
        ScreenRecorder::new(
            self.settings(args),
            Arc::clone(&self.backend),
            Arc::new(self.discovery()),
        )
    }

    async fn report_encoder(&self) {
        let path = &self.config.encoder.path;
        match probe_encoder(path).await {
            Ok(version) => println!("Encoder: {} (version {version})", path.display()),
            Err(e) => warn!(error = %e, "Encoder probe failed, recording will not work"),
        }
    }

    #[instrument(skip(self))]
    async fn list_devices(&self) -> AppResult<()> {
        self.report_encoder().await;

        let discovery = self.discovery();
        info!(strategy = ?discovery.strategy(), "Discovering devices");
        let catalog = tokio::task::spawn_blocking(move || discovery.discover())
            .await
            .map_err(|e| AppError::IoError {
                source: io::Error::other(e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        print!("{}", CatalogReport(&catalog));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn show_plan(&self, args: &RecordArgs) -> AppResult<()> {
        let plan = self.recorder(args).plan(args.target()).await?;
        print!("{}", PlanReport(&plan));
        Ok(())
    }

    fn output_path(&self, args: &RecordArgs) -> PathBuf {
        args.output.clone().unwrap_or_else(|| {
            let settings = self.config.recorder_settings();
            temp_recording_path(&self.config.output.resolved_directory(), &settings.file_extension)
        })
    }

    #[instrument(skip(self))]
    async fn record(&self, args: &RecordArgs) -> AppResult<()> {
        self.report_encoder().await;

        let recorder = self.recorder(args);
        let output = self.output_path(args);
        let mut changes = recorder.subscribe();

        recorder.start(args.target()).await?;
        println!("Recording to {}. Press Ctrl+C to stop.", output.display());

        let limit = args.duration();
        let deadline = async {
            match limit {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                signal = tokio::signal::ctrl_c() => {
                    if let Err(e) = signal {
                        error!(error = %e, "Failed to listen for Ctrl+C");
                    }
                    info!("Interrupted, stopping");
                    break;
                }
                _ = &mut deadline => {
                    info!(seconds = ?limit.map(|d| d.as_secs()), "Duration reached, stopping");
                    break;
                }
                change = changes.recv() => match change {
                    Ok(change) => {
                        info!(from = %change.from, to = %change.to, "Recorder state changed");
                        if !change.to.has_active_encoder() {
                            warn!(state = %change.to, "Encoder exited on its own");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "Missed state notifications"),
                    Err(RecvError::Closed) => break,
                },
            }
        }

        recorder.stop().await?;

        match recorder.state() {
            RecorderState::Stopped => {
                recorder.save(&output).await?;
                println!("Saved {}", output.display());
                Ok(())
            }
            state => Err(AppError::EncoderExitedEarly {
                reason: format!("recorder is {state}, nothing to save"),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }

    fn show_config(&self) -> AppResult<()> {
        let path = Config::config_path()?;
        println!("# {}", path.display());
        if path.exists() {
            print!("{}", fs::read_to_string(&path)?);
        }
        Ok(())
    }
}
