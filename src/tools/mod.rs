//! Tool dispatcher: argument handling, schemas, the knot operations and the
//! registry that exposes them by name.

pub mod arguments;
pub mod builtin;
pub mod operations;
pub mod registry;
pub mod tool;
pub mod types;
pub mod validation;

pub use arguments::ToolArguments;
pub use operations::{
    CreateSessionArgs, ExtendSessionArgs, KnotTools, ListMerchantsArgs, SwitchCardArgs,
};
pub use registry::ToolRegistry;
pub use tool::{AgentTool, Tool};
pub use types::{ToolDefinition, ToolParameters};
