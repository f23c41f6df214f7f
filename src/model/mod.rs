//! Domain model types (pure).
//!
//! Route identity, router signals and per-route metadata.

pub mod error;
pub mod navigation;
pub mod route_key;
pub mod route_meta;

// Re-export for convenience
pub use error::{DomError, InputError, RenderError, ScriptError};
pub use navigation::{NavigationAction, NavigationState, RouterEvent};
pub use route_key::{InvalidRouteKey, RouteKey};
pub use route_meta::{RouteMeta, RouteMetadataProvider, RouteTable};
