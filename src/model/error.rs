//! Error types for navshell.
//!
//! This module defines the error taxonomy using `thiserror`. Nothing in the
//! navigation core propagates these to its caller: every core operation matches
//! on them, logs, and degrades. Only the binary's input layer returns errors
//! upward.
//!
//! # Error Hierarchy
//!
//! - [`DomError`] - Failures touching the page's element tree (style lookup, scrolling)
//! - [`RenderError`] - A skeleton component failed to produce a placeholder
//! - [`InputError`] - Navigation script reading failures (file not found, IO)
//! - [`ScriptError`] - A single malformed script line (non-fatal, skipped)
//!
//! # Recovery Strategy
//!
//! - **DomError**: restoration skipped for the current navigation, logged at `warn`
//! - **RenderError**: walk the fallback ladder, never surfaced to the user
//! - **InputError**: fatal for the binary only
//! - **ScriptError**: reported with its line number, the line is skipped

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`DomNode`](crate::dom::DomNode) implementation.
///
/// These model the exceptions a browser DOM throws for detached nodes or a
/// disposed document. The locator treats any of them as "not scrollable" and
/// keeps searching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomError {
    /// Computed style could not be read for the node.
    ///
    /// **When this occurs**: node detached from its document, document torn
    /// down mid-navigation.
    #[error("Computed style unavailable for <{node}>: {reason}")]
    StyleUnavailable {
        /// Debug label of the node.
        node: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// The node is no longer attached to a live document.
    #[error("Node <{node}> is detached")]
    Detached {
        /// Debug label of the node.
        node: String,
    },

    /// Scrolling the node failed.
    #[error("Failed to scroll <{node}> to {offset}: {reason}")]
    ScrollFailed {
        /// Debug label of the node.
        node: String,
        /// Requested offset.
        offset: f64,
        /// Why the scroll failed.
        reason: String,
    },
}

/// A skeleton component failed to render.
///
/// Always recoverable: the resilient renderer answers it by stepping down its
/// strategy ladder, then by falling back to the built-in static placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The component returned an error while rendering.
    #[error("Skeleton {skeleton} failed to render: {reason}")]
    Component {
        /// Id of the failing skeleton.
        skeleton: String,
        /// Failure reason reported by the component.
        reason: String,
    },

    /// A render callback signalled failure after a render appeared to succeed.
    #[error("Skeleton {skeleton} reported a render failure")]
    Signalled {
        /// Id of the failing skeleton.
        skeleton: String,
    },
}

/// Errors encountered when opening the navigation script input.
///
/// # Recovery Patterns
///
/// - **FileNotFound**: display error and exit (user provided invalid path)
/// - **NoInput**: display usage - user must provide a file path or pipe stdin
/// - **Io**: permissions, disk errors - display and exit
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified script file does not exist.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided.
    ///
    /// ```
    /// use navshell::model::error::InputError;
    ///
    /// let err = InputError::NoInput;
    /// assert!(err.to_string().contains("file path or pipe data to stdin"));
    /// ```
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single navigation script line could not be parsed.
///
/// Non-fatal: the runner reports the line and continues with the next one.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Line is not valid JSON or does not match any event shape.
    #[error("Line {line}: {message}")]
    InvalidEvent {
        /// 1-based line number in the script.
        line: usize,
        /// Parser message.
        message: String,
    },
}
