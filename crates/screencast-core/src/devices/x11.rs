use crate::devices::{Display, Monitor, Screen, group, line_pattern};

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

static DISPLAY_ID: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^name\sof\sdisplay:\s+(.*)"));
static DEFAULT_SCREEN_ID: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"^default\sscreen\snumber:\s+(.*)"));
static SCREEN_ID: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^screen\s#(.*):"));
static SCREEN_DIMENSIONS: LazyLock<Regex> =
    LazyLock::new(|| line_pattern(r"^\s+dimensions:\s+([0-9]+)x([0-9]+)\spixels"));

static XRANDR_SCREEN_ID: LazyLock<Regex> = LazyLock::new(|| line_pattern(r"^Screen\s([0-9]+):"));
static CONNECTED_MONITOR: LazyLock<Regex> = LazyLock::new(|| {
    line_pattern(r"^([\w'-]+)\sconnected(?:\s(primary))?\s([0-9]+)x([0-9]+)\+([0-9]+)\+([0-9]+)")
});

/// Cursor state for display enumeration text.
///
/// Every annotation attaches to the most recently opened record. A line whose
/// parent record has not been opened yet is dropped.
#[derive(Debug, Default)]
struct DisplayParser {
    displays: Vec<Display>,
    current_display: Option<usize>,
    current_screen: Option<usize>,
}

impl DisplayParser {
    fn open_display(&mut self, id: &str) {
        self.displays.push(Display::new(id));
        self.current_display = Some(self.displays.len() - 1);
        self.current_screen = None;
    }

    fn display_mut(&mut self) -> Option<&mut Display> {
        self.current_display.and_then(|i| self.displays.get_mut(i))
    }

    fn set_default_screen(&mut self, id: &str) {
        match self.display_mut() {
            Some(display) => display.default_screen_id = Some(id.to_string()),
            None => trace!(screen_id = id, "Default screen line without display, dropped"),
        }
    }

    fn open_screen(&mut self, id: &str) {
        let Some(display) = self.display_mut() else {
            trace!(screen_id = id, "Screen line without display, dropped");
            return;
        };
        display.screens.push(Screen::new(id));
        let index = display.screens.len() - 1;
        self.current_screen = Some(index);
    }

    fn set_dimensions(&mut self, width: u32, height: u32) {
        let screen_index = self.current_screen;
        let screen = self
            .display_mut()
            .and_then(|display| screen_index.and_then(|i| display.screens.get_mut(i)));

        match screen {
            Some(screen) => {
                screen.width = width;
                screen.height = height;
            }
            None => trace!(width, height, "Dimensions line without screen, dropped"),
        }
    }

    fn finish(mut self) -> Vec<Display> {
        // A default screen that was never enumerated cannot be referenced.
        for display in &mut self.displays {
            if display.default_screen().is_none() {
                display.default_screen_id = None;
            }
        }
        self.displays
    }
}

/// Parses `xdpyinfo` output into displays and their screens.
///
/// Never fails: unrecognised lines are skipped and the result may be empty.
pub fn parse_xdpyinfo(input: &str) -> Vec<Display> {
    let mut parser = DisplayParser::default();

    for line in input.lines() {
        if let Some(caps) = DISPLAY_ID.captures(line) {
            parser.open_display(group(&caps, 1).trim());
        } else if let Some(caps) = DEFAULT_SCREEN_ID.captures(line) {
            parser.set_default_screen(group(&caps, 1).trim());
        } else if let Some(caps) = SCREEN_ID.captures(line) {
            parser.open_screen(group(&caps, 1).trim());
        } else if let Some(caps) = SCREEN_DIMENSIONS.captures(line) {
            if let (Ok(width), Ok(height)) = (group(&caps, 1).parse(), group(&caps, 2).parse()) {
                parser.set_dimensions(width, height);
            }
        }
    }

    parser.finish()
}

/// Overlays `xrandr` monitor records onto screens already found by [`parse_xdpyinfo`].
///
/// A `Screen N:` line re-opens the first enumerated screen with that id across
/// all displays. Monitor lines while no known screen is open are dropped, so the
/// number of displays and screens never changes.
pub fn parse_xrandr(input: &str, displays: &mut [Display]) {
    let mut current_screen: Option<(usize, usize)> = None;

    for line in input.lines() {
        if let Some(caps) = XRANDR_SCREEN_ID.captures(line) {
            let id = group(&caps, 1);
            current_screen = displays.iter().enumerate().find_map(|(d, display)| {
                display
                    .screens
                    .iter()
                    .position(|screen| screen.id == id)
                    .map(|s| (d, s))
            });
            if current_screen.is_none() {
                trace!(screen_id = id, "xrandr screen not in catalog");
            }
        } else if let Some(caps) = CONNECTED_MONITOR.captures(line) {
            let Some(monitor) = monitor_from(&caps) else {
                continue;
            };
            let screen = current_screen
                .and_then(|(d, s)| displays.get_mut(d).and_then(|display| display.screens.get_mut(s)));
            match screen {
                Some(screen) => screen.monitors.push(monitor),
                None => trace!(monitor = %monitor.name, "Monitor line without screen, dropped"),
            }
        }
    }
}

fn monitor_from(caps: &regex::Captures<'_>) -> Option<Monitor> {
    Some(Monitor {
        name: group(caps, 1).to_string(),
        is_primary: caps.get(2).is_some(),
        width: group(caps, 3).parse().ok()?,
        height: group(caps, 4).parse().ok()?,
        x: group(caps, 5).parse().ok()?,
        y: group(caps, 6).parse().ok()?,
    })
}
