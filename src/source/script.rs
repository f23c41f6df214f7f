//! JSONL navigation script format.
//!
//! One event per line, tagged by `event`, each with `at_ms` relative to the
//! start of the script:
//!
//! ```text
//! {"event":"route","at_ms":0,"pattern":"/list","skeleton":"list"}
//! {"event":"navigate","at_ms":0,"to":"/list"}
//! {"event":"settle","at_ms":30}
//! {"event":"tick","at_ms":250}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use crate::model::{NavigationAction, NavigationState, RouteKey, ScriptError};
use serde::Deserialize;

fn default_page_height() -> f64 {
    2000.0
}

fn default_viewport_height() -> f64 {
    600.0
}

fn default_skeleton_lines() -> usize {
    3
}

/// One script step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// Declare metadata and page geometry for a route pattern.
    Route {
        at_ms: u64,
        pattern: String,
        #[serde(default)]
        no_scroll: bool,
        #[serde(default)]
        scroll_restoration: Option<f64>,
        #[serde(default)]
        skeleton: Option<String>,
        #[serde(default = "default_skeleton_lines")]
        skeleton_lines: usize,
        /// Content height of the page's main region.
        #[serde(default = "default_page_height")]
        page_height: f64,
        /// Visible height of the page's main region.
        #[serde(default = "default_viewport_height")]
        viewport_height: f64,
    },
    Navigate {
        at_ms: u64,
        to: RouteKey,
        #[serde(default)]
        action: NavigationAction,
    },
    RouterState {
        at_ms: u64,
        state: NavigationState,
    },
    /// Router finished loading `to`; defaults to the current destination.
    Settle {
        at_ms: u64,
        #[serde(default)]
        to: Option<RouteKey>,
    },
    /// User scrolled the mounted page to `offset`.
    Scroll {
        at_ms: u64,
        offset: f64,
    },
    PageLoading {
        at_ms: u64,
        route: RouteKey,
        loading: bool,
    },
    /// Make the named skeleton's next `count` renders fail.
    SkeletonFailures {
        at_ms: u64,
        skeleton: String,
        count: u32,
    },
    Tick {
        at_ms: u64,
    },
}

impl ScriptEvent {
    pub fn at_ms(&self) -> u64 {
        match self {
            ScriptEvent::Route { at_ms, .. }
            | ScriptEvent::Navigate { at_ms, .. }
            | ScriptEvent::RouterState { at_ms, .. }
            | ScriptEvent::Settle { at_ms, .. }
            | ScriptEvent::Scroll { at_ms, .. }
            | ScriptEvent::PageLoading { at_ms, .. }
            | ScriptEvent::SkeletonFailures { at_ms, .. }
            | ScriptEvent::Tick { at_ms } => *at_ms,
        }
    }
}

/// Parse one line. `Ok(None)` for blank and comment lines.
///
/// # Errors
///
/// Returns `ScriptError::InvalidEvent` carrying `line_number` (1-based).
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<ScriptEvent>, ScriptError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| ScriptError::InvalidEvent {
            line: line_number,
            message: e.to_string(),
        })
}

/// Parse every line, collecting events and per-line errors separately.
pub fn parse_script<S: AsRef<str>>(lines: &[S]) -> (Vec<ScriptEvent>, Vec<ScriptError>) {
    let mut events = Vec::new();
    let mut errors = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        match parse_line(line.as_ref(), idx + 1) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(error) => errors.push(error),
        }
    }
    (events, errors)
}
