use crate::{
    CoreResult, RecorderError,
    devices::{AudioDevice, DeviceCatalog, DeviceDirection, Display, Screen},
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

const STEREO_MIX: &str = "stereo mix";
const MICROPHONE: &str = "microphone";
const DEFAULT_LABEL_PREFIX: &str = "Default - ";

/// How a backend recognises a loopback (desktop audio) source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopbackRule {
    /// Monitor sources of output sinks (PulseAudio).
    MonitorSource,
    /// Sources whose name contains one of these driver names, case-insensitively.
    DriverNames(&'static [&'static str]),
    /// The platform offers no loopback capture.
    Unsupported,
}

impl LoopbackRule {
    fn matches(&self, device: &AudioDevice) -> bool {
        match self {
            LoopbackRule::MonitorSource => {
                device.is_monitor() && device.direction() == DeviceDirection::Output
            }
            LoopbackRule::DriverNames(names) => {
                let name = device.name.to_lowercase();
                names.iter().any(|driver| name.contains(driver))
            }
            LoopbackRule::Unsupported => false,
        }
    }
}

/// Picks concrete devices out of a catalog with ordered fallback chains.
///
/// Missing audio devices are not errors; the recording simply has fewer sources.
#[derive(Debug, Clone, Copy)]
pub struct DeviceResolver {
    loopback: LoopbackRule,
}

impl DeviceResolver {
    /// Creates a resolver recognising loopback sources with `loopback`.
    pub fn new(loopback: LoopbackRule) -> Self {
        Self { loopback }
    }

    /// Desktop audio: a loopback source, then a "stereo mix" source, then none.
    #[instrument(skip_all)]
    pub fn resolve_desktop_audio<'a>(&self, catalog: &'a DeviceCatalog) -> Option<&'a AudioDevice> {
        if self.loopback == LoopbackRule::Unsupported {
            debug!("Backend has no loopback capture, desktop audio disabled");
            return None;
        }

        let found = catalog
            .audio_devices
            .iter()
            .find(|d| self.loopback.matches(d))
            .or_else(|| {
                catalog
                    .audio_devices
                    .iter()
                    .find(|d| d.name.to_lowercase().contains(STEREO_MIX))
            });

        match found {
            Some(device) => debug!(device = %device.name, "Resolved desktop audio source"),
            None => warn!("No desktop audio source found, desktop audio disabled"),
        }

        found
    }

    /// Microphone: the OS default input (by label), then a name containing
    /// "microphone", then none.
    #[instrument(skip_all)]
    pub fn resolve_microphone<'a>(&self, catalog: &'a DeviceCatalog) -> Option<&'a AudioDevice> {
        let by_label = catalog.default_input_label.as_deref().and_then(|label| {
            let label = label.strip_prefix(DEFAULT_LABEL_PREFIX).unwrap_or(label).trim();
            catalog.audio_devices.iter().find(|d| d.name == label)
        });

        let found = by_label.or_else(|| {
            catalog
                .audio_devices
                .iter()
                .find(|d| d.name.to_lowercase().contains(MICROPHONE))
        });

        match found {
            Some(device) => debug!(device = %device.name, "Resolved microphone source"),
            None => warn!("No microphone source found, microphone audio disabled"),
        }

        found
    }

    /// The first display and its default screen.
    ///
    /// Falls back to the display's first screen when no default was reported.
    ///
    /// # Errors
    ///
    /// Returns `NoDisplayFound` if the catalog has no display or the first
    /// display has no screens.
    #[track_caller]
    pub fn resolve_default_display<'a>(
        &self,
        catalog: &'a DeviceCatalog,
    ) -> CoreResult<(&'a Display, &'a Screen)> {
        let location = Location::caller();
        let not_found = || RecorderError::NoDisplayFound {
            location: ErrorLocation::from(location),
        };

        let display = catalog.displays.first().ok_or_else(not_found)?;

        let screen = match display.default_screen() {
            Some(screen) => screen,
            None => {
                let screen = display.screens.first().ok_or_else(not_found)?;
                let display_id = &display.id;
                warn!(
                    display = %display_id,
                    screen = %screen.id,
                    "Display reports no default screen, using its first screen"
                );
                screen
            }
        };

        Ok((display, screen))
    }
}
