//! The knot tools exposed to an agent: `list_merchants`, `switch_card`,
//! `create_session` and `extend_session`.
//!
//! Each tool is an [`AgentTool`] that validates its arguments into the typed
//! argument struct and delegates to [`KnotTools`].
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use knot_tools::config::KnotConfig;
//! use knot_tools::tools::{builtin::all_tools, KnotTools};
//!
//! # fn example() -> knot_tools::error::Result<()> {
//! let ops = Arc::new(KnotTools::from_config(KnotConfig::default())?);
//! assert_eq!(all_tools(ops).len(), 4);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::json;
use strum::VariantNames;

use crate::schema::{FromArguments, ProductType};
use crate::tools::operations::{
    CreateSessionArgs, ExtendSessionArgs, KnotTools, ListMerchantsArgs, SwitchCardArgs,
};
use crate::tools::tool::{AgentTool, Tool};
use crate::tools::types::ToolParameters;

pub const LIST_MERCHANTS: &str = "list_merchants";
pub const SWITCH_CARD: &str = "switch_card";
pub const CREATE_SESSION: &str = "create_session";
pub const EXTEND_SESSION: &str = "extend_session";

/// Create the `list_merchants` tool.
pub fn list_merchants_tool(ops: Arc<KnotTools>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        LIST_MERCHANTS,
        "List merchants available to the user for card switching or transaction linking",
        ToolParameters::object()
            .string_enum_with_default(
                "type",
                "Type of merchant list request",
                ProductType::VARIANTS,
                "card_switcher",
            )
            .string("user_agent", "User agent of the requesting client", false)
            .build(),
        move |args| {
            let ops = ops.clone();
            async move { ops.list_merchants(ListMerchantsArgs::from_arguments(&args)?).await }
        },
    ))
}

/// Create the `switch_card` tool.
pub fn switch_card_tool(ops: Arc<KnotTools>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        SWITCH_CARD,
        "Switch the user's card on file at a merchant for a card-switch task",
        ToolParameters::object()
            .string("task_id", "Task the switch belongs to", true)
            .string("card_number", "New card number", true)
            .string("card_expiration", "New card expiration (MM/YY)", true)
            .string("card_cvv", "New card CVV", true)
            .property("user", user_schema(), false)
            .build(),
        move |args| {
            let ops = ops.clone();
            async move { ops.switch_card(SwitchCardArgs::from_arguments(&args)?).await }
        },
    ))
}

/// Create the `create_session` tool.
pub fn create_session_tool(ops: Arc<KnotTools>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        CREATE_SESSION,
        "Create a session for a product and user",
        ToolParameters::object()
            .string_enum("session_type", "Product the session is for", ProductType::VARIANTS)
            .string("external_user_id", "Your identifier for the user", false)
            .build(),
        move |args| {
            let ops = ops.clone();
            async move { ops.create_session(CreateSessionArgs::from_arguments(&args)?).await }
        },
    ))
}

/// Create the `extend_session` tool.
pub fn extend_session_tool(ops: Arc<KnotTools>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new(
        EXTEND_SESSION,
        "Extend an existing session",
        ToolParameters::object()
            .string("session_id", "Session to extend", true)
            .build(),
        move |args| {
            let ops = ops.clone();
            async move { ops.extend_session(ExtendSessionArgs::from_arguments(&args)?).await }
        },
    ))
}

/// All four tools, in the order they are advertised.
pub fn all_tools(ops: Arc<KnotTools>) -> Vec<Arc<dyn Tool>> {
    vec![
        list_merchants_tool(ops.clone()),
        switch_card_tool(ops.clone()),
        create_session_tool(ops.clone()),
        extend_session_tool(ops),
    ]
}

fn user_schema() -> serde_json::Value {
    let string = json!({ "type": "string" });
    json!({
        "type": "object",
        "description": "Cardholder; the configured default cardholder is used when omitted",
        "properties": {
            "name": {
                "type": "object",
                "properties": { "first_name": string, "last_name": string },
                "required": ["first_name", "last_name"],
            },
            "phone_number": string,
            "address": {
                "type": "object",
                "properties": {
                    "street": string,
                    "street2": string,
                    "city": string,
                    "region": string,
                    "postal_code": string,
                    "country": string,
                },
                "required": ["street", "city", "region", "postal_code", "country"],
            },
        },
        "required": ["name", "phone_number", "address"],
    })
}
