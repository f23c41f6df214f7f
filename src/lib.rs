//! navshell
//!
//! Navigation resilience layer for a client-rendered app shell: per-route
//! scroll restoration, a route transition state machine, skeleton visibility
//! and a placeholder renderer that always shows something.
//!
//! The core (`scroll`, `transition`, `skeleton`, `shell`) is pure state driven
//! by explicit `now: Instant` arguments; `source`, `config`, `logging` and the
//! binary form the impure shell around it.

pub mod announce;
pub mod config;
pub mod dom;
pub mod logging;
pub mod model;
pub mod runner;
pub mod scroll;
pub mod shell;
pub mod skeleton;
pub mod source;
pub mod transition;
