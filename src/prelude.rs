//! Convenience re-exports for common use.

pub use crate::client::{Backend, BackendClient, BackendExt};
pub use crate::config::{BasicCredentials, KnotConfig};
pub use crate::error::{ErrorKind, KnotError, Result};
pub use crate::schema::{FromArguments, ProductType};
pub use crate::tools::{
    CreateSessionArgs, ExtendSessionArgs, KnotTools, ListMerchantsArgs, SwitchCardArgs, Tool,
    ToolArguments, ToolRegistry,
};
