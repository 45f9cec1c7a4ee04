//! Agent tools for the Knot card-switch and session API.
//!
//! Exposes `list_merchants`, `switch_card`, `create_session` and
//! `extend_session` as tools. Each call validates loosely typed arguments
//! into a typed payload, performs one backend request, and resolves to the
//! backend's JSON or a kind-tagged error envelope.
//!
//! # Quick Start
//!
//! ```no_run
//! use knot_tools::prelude::*;
//!
//! # async fn example() -> knot_tools::error::Result<()> {
//! let registry = ToolRegistry::from_config(KnotConfig::from_env()?)?;
//! let envelope = registry
//!     .dispatch("list_merchants", serde_json::json!({ "type": "card_switcher" }))
//!     .await;
//! println!("{envelope}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod prelude;
pub mod schema;
pub mod tools;

#[cfg(feature = "cli")]
pub mod cli;
