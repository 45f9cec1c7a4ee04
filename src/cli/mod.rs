//! CLI entry point for knot-tools.

pub mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use crate::config::KnotConfig;
use crate::error::{into_envelope, KnotError, Result};
use crate::mcp::McpServer;
use crate::tools::builtin::{CREATE_SESSION, EXTEND_SESSION, LIST_MERCHANTS, SWITCH_CARD};
use crate::tools::ToolRegistry;

/// Knot API tools for agents
#[derive(Parser, Debug)]
#[command(name = "knot-tools", version, about = "Knot API tools for agents")]
pub struct Cli {
    /// Backend base URL (overrides KNOT_BASE_URL and the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// TOML config file (defaults to KNOT_CONFIG when set)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the tools over MCP on stdio
    Serve,
    /// Print the tool definitions as JSON
    Tools,
    /// List merchants
    ListMerchants {
        /// card_switcher or transaction_link
        #[arg(long = "type", default_value = "card_switcher")]
        product_type: String,
        #[arg(long)]
        user_agent: Option<String>,
    },
    /// Switch a card at merchants
    SwitchCard {
        #[arg(long)]
        task_id: String,
        #[arg(long)]
        card_number: String,
        #[arg(long)]
        card_expiration: String,
        #[arg(long)]
        card_cvv: String,
        /// Cardholder as a JSON object
        #[arg(long)]
        user: Option<String>,
    },
    /// Create a session
    CreateSession {
        /// card_switcher or transaction_link
        #[arg(long)]
        session_type: String,
        #[arg(long)]
        external_user_id: Option<String>,
    },
    /// Extend a session
    ExtendSession {
        #[arg(long)]
        session_id: String,
    },
    /// Call any tool with JSON arguments
    Call {
        name: String,
        /// Arguments as a JSON object
        #[arg(default_value = "{}")]
        arguments: String,
    },
}

impl Commands {
    /// The tool name and raw arguments for one-shot commands.
    pub fn tool_call(&self) -> Result<Option<(String, Value)>> {
        let call = match self {
            Self::Serve | Self::Tools => return Ok(None),
            Self::ListMerchants {
                product_type,
                user_agent,
            } => (
                LIST_MERCHANTS.to_string(),
                json!({ "type": product_type, "user_agent": user_agent }),
            ),
            Self::SwitchCard {
                task_id,
                card_number,
                card_expiration,
                card_cvv,
                user,
            } => {
                let user = user
                    .as_deref()
                    .map(|raw| parse_json_arg("user", raw))
                    .transpose()?;
                (
                    SWITCH_CARD.to_string(),
                    json!({
                        "task_id": task_id,
                        "card_number": card_number,
                        "card_expiration": card_expiration,
                        "card_cvv": card_cvv,
                        "user": user,
                    }),
                )
            }
            Self::CreateSession {
                session_type,
                external_user_id,
            } => (
                CREATE_SESSION.to_string(),
                json!({ "session_type": session_type, "external_user_id": external_user_id }),
            ),
            Self::ExtendSession { session_id } => (
                EXTEND_SESSION.to_string(),
                json!({ "session_id": session_id }),
            ),
            Self::Call { name, arguments } => {
                (name.clone(), parse_json_arg("arguments", arguments)?)
            }
        };
        Ok(Some(call))
    }
}

fn parse_json_arg(field: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|e| KnotError::validation(field, format!("not valid JSON: {e}")))
}

/// Load configuration with CLI overrides applied last.
pub fn load_config(cli: &Cli) -> Result<KnotConfig> {
    let config = KnotConfig::load(cli.config.as_deref())?;
    match &cli.base_url {
        Some(url) => config.with_base_url(url),
        None => Ok(config),
    }
}

/// Run a parsed command line.
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;
    let registry = ToolRegistry::from_config(config)?;

    match cli.command.tool_call().transpose() {
        None if matches!(cli.command, Commands::Serve) => {
            McpServer::new(registry).serve_stdio().await?;
            Ok(ExitCode::SUCCESS)
        }
        None => {
            print_json(&serde_json::to_value(registry.definitions())?)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(call) => {
            let (envelope, ok) = invoke(&registry, call).await;
            print_json(&envelope)?;
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

/// Run a one-shot call. Argument errors become envelopes like any tool error.
async fn invoke(registry: &ToolRegistry, call: Result<(String, Value)>) -> (Value, bool) {
    let result = match call {
        Ok((name, args)) => registry.call(&name, args).await,
        Err(e) => Err(e),
    };
    let ok = result.is_ok();
    (into_envelope(result), ok)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn list_merchants_defaults_type() {
        let cli = Cli::try_parse_from(["knot-tools", "list-merchants"]).unwrap();
        let (name, args) = cli.command.tool_call().unwrap().unwrap();
        assert_eq!(name, "list_merchants");
        assert_eq!(args["type"], "card_switcher");
        assert!(args["user_agent"].is_null());
    }

    #[test]
    fn switch_card_parses_user_json() {
        let cli = Cli::try_parse_from([
            "knot-tools",
            "switch-card",
            "--task-id",
            "t1",
            "--card-number",
            "4111",
            "--card-expiration",
            "12/25",
            "--card-cvv",
            "123",
            "--user",
            r#"{"phone_number":"1"}"#,
        ])
        .unwrap();
        let (name, args) = cli.command.tool_call().unwrap().unwrap();
        assert_eq!(name, "switch_card");
        assert_eq!(args["user"]["phone_number"], "1");
    }

    #[test]
    fn bad_user_json_is_a_validation_error() {
        let cli = Cli::try_parse_from([
            "knot-tools",
            "switch-card",
            "--task-id",
            "t1",
            "--card-number",
            "4111",
            "--card-expiration",
            "12/25",
            "--card-cvv",
            "123",
            "--user",
            "{",
        ])
        .unwrap();
        let err = cli.command.tool_call().unwrap_err();
        assert!(err.to_string().starts_with("invalid user: not valid JSON"));
    }

    #[test]
    fn global_flags_work_after_subcommand() {
        let cli = Cli::try_parse_from([
            "knot-tools",
            "extend-session",
            "--session-id",
            "s-1",
            "--base-url",
            "http://localhost:9000",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:9000"));
        let (_, args) = cli.command.tool_call().unwrap().unwrap();
        assert_eq!(args, json!({ "session_id": "s-1" }));
    }

    #[test]
    fn call_defaults_to_empty_arguments() {
        let cli = Cli::try_parse_from(["knot-tools", "call", "list_merchants"]).unwrap();
        let (name, args) = cli.command.tool_call().unwrap().unwrap();
        assert_eq!(name, "list_merchants");
        assert_eq!(args, json!({}));
    }

    #[tokio::test]
    async fn malformed_call_arguments_yield_an_error_envelope() {
        let registry = ToolRegistry::from_config(KnotConfig::default()).unwrap();
        let cli = Cli::try_parse_from(["knot-tools", "call", "extend_session", "{oops"]).unwrap();
        let call = cli.command.tool_call().transpose().unwrap();

        let (envelope, ok) = invoke(&registry, call).await;
        assert!(!ok);
        assert_eq!(envelope["kind"], "validation");
        assert!(envelope["error"]
            .as_str()
            .unwrap()
            .starts_with("invalid arguments: not valid JSON"));
    }

    #[test]
    fn serve_and_tools_are_not_tool_calls() {
        let cli = Cli::try_parse_from(["knot-tools", "serve"]).unwrap();
        assert!(cli.command.tool_call().unwrap().is_none());
        let cli = Cli::try_parse_from(["knot-tools", "tools"]).unwrap();
        assert!(cli.command.tool_call().unwrap().is_none());
    }

    #[test]
    fn missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["knot-tools"]).is_err());
    }

    #[test]
    fn create_session_requires_type() {
        assert!(Cli::try_parse_from(["knot-tools", "create-session"]).is_err());
    }
}
