//! vidgate: embedded-player sandbox for a streaming catalog client
//!
//! The hard part of hosting third-party video players inside a web view is
//! not loading them, it is surviving them. This crate is the host-side
//! machinery for that: it classifies every URL the hosted page touches,
//! gates each navigation through an ordered allow/block policy, injects
//! script that neutralizes popups and redirects while harvesting raw media
//! URLs from the page's own traffic, and runs the per-screen session state
//! machine that ties server selection, season/episode selection, captured
//! links and screen-chrome lifecycle together.
//!
//! Around that core sit the thin collaborators the sandbox needs: a client
//! for the catalog metadata service (reached through a key-injecting proxy
//! backend), keyed JSON persistence for the user's lists, and the remote
//! feature-gate check.

pub mod bridge;
pub mod catalog;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod gate;
pub mod inject;
pub mod models;
pub mod policy;
pub mod servers;
pub mod session;
pub mod storage;

pub use config::SandboxConfig;
pub use errors::SandboxError;
pub use models::{MediaKind, NavigationDecision, PlaybackRequest};
pub use policy::{NavigationPolicy, ScreenProfile};
pub use servers::Server;
pub use session::{PlaybackController, SessionState};
