//! Human-readable listings printed by the `devices` and `plan` commands.

use std::fmt;

use screencast_core::{AudioDevice, DeviceCatalog, RecordingPlan};

/// Lists everything discovery found.
pub struct CatalogReport<'a>(pub &'a DeviceCatalog);

impl fmt::Display for CatalogReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let catalog = self.0;

        writeln!(f, "Displays:")?;
        if catalog.displays.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for display in &catalog.displays {
            writeln!(f, "  {}", display.id)?;
            for screen in &display.screens {
                let marker = if display.default_screen_id.as_deref() == Some(screen.id.as_str()) {
                    " (default)"
                } else {
                    ""
                };
                writeln!(f, "    screen {}: {}x{}{marker}", screen.id, screen.width, screen.height)?;
                for monitor in &screen.monitors {
                    writeln!(
                        f,
                        "      {} {}x{}+{}+{}{}",
                        monitor.name,
                        monitor.width,
                        monitor.height,
                        monitor.x,
                        monitor.y,
                        if monitor.is_primary { " primary" } else { "" }
                    )?;
                }
            }
        }

        writeln!(f, "Audio sources:")?;
        if catalog.audio_devices.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for device in &catalog.audio_devices {
            writeln!(f, "  {}", AudioLine(device))?;
        }

        if !catalog.video_devices.is_empty() {
            writeln!(f, "Video devices:")?;
            for device in &catalog.video_devices {
                writeln!(f, "  [{}] {}", device.index, device.name)?;
            }
        }

        if let Some(label) = &catalog.default_input_label {
            writeln!(f, "Default input: {label}")?;
        }

        Ok(())
    }
}

struct AudioLine<'a>(&'a AudioDevice);

impl fmt::Display for AudioLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let device = self.0;
        write!(f, "[{}] {} ({}", device.id, device.name, device.direction())?;
        if device.is_monitor() {
            write!(f, ", monitor")?;
        }
        if device.is_default {
            write!(f, ", default")?;
        }
        if let Some(spec) = device.sample_spec {
            write!(f, ", {}ch {}Hz", spec.channels, spec.sample_rate)?;
        }
        write!(f, ")")
    }
}

/// Shows the devices a recording would use and the encoder command line.
pub struct PlanReport<'a>(pub &'a RecordingPlan);

impl fmt::Display for PlanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let devices = &self.0.devices;
        writeln!(
            f,
            "Display:       {} screen {} ({}x{})",
            devices.display.id, devices.screen.id, devices.screen.width, devices.screen.height
        )?;
        match &devices.desktop_audio {
            Some(device) => writeln!(f, "Desktop audio: {}", AudioLine(device))?,
            None => writeln!(f, "Desktop audio: (none)")?,
        }
        match &devices.microphone {
            Some(device) => writeln!(f, "Microphone:    {}", AudioLine(device))?,
            None => writeln!(f, "Microphone:    (none)")?,
        }
        writeln!(f, "Command:")?;
        writeln!(f, "  {}", self.0.command)
    }
}
