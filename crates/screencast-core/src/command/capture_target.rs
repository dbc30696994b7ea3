use crate::{CoreResult, RecorderError};

use std::{fmt, panic::Location};

use error_location::ErrorLocation;

/// The region a recording covers.
///
/// Area geometry is relative to the resolved default display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureTarget {
    /// The whole default screen.
    EntireDisplay,
    /// A pixel rectangle on the default screen.
    Area {
        /// Left edge.
        x: u32,
        /// Top edge.
        y: u32,
        /// Width in pixels, must be positive.
        width: u32,
        /// Height in pixels, must be positive.
        height: u32,
    },
    /// A top-level window addressed by its title.
    Window {
        /// Window title.
        name: String,
    },
}

impl CaptureTarget {
    /// Checks the target's own geometry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCaptureTarget` for an area with a zero dimension or a
    /// window with an empty title.
    #[track_caller]
    pub fn validate(&self) -> CoreResult<()> {
        match self {
            CaptureTarget::Area { width, height, .. } if *width == 0 || *height == 0 => {
                Err(RecorderError::InvalidCaptureTarget {
                    reason: format!("area must have a positive size, got {width}x{height}"),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            CaptureTarget::Window { name } if name.trim().is_empty() => {
                Err(RecorderError::InvalidCaptureTarget {
                    reason: "window title is empty".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for CaptureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureTarget::EntireDisplay => write!(f, "entire display"),
            CaptureTarget::Area {
                x,
                y,
                width,
                height,
            } => write!(f, "area {width}x{height} at {x},{y}"),
            CaptureTarget::Window { name } => write!(f, "window \"{name}\""),
        }
    }
}
