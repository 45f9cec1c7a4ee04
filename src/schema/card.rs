//! Card details and the card-switch payload.

use serde::{Deserialize, Serialize};

use super::{FromArguments, User};
use crate::error::Result;
use crate::tools::ToolArguments;

/// A payment card. `blocked` and `has_funds` are only present when the
/// status is known.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub number: String,
    pub expiration: String,
    pub cvv: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_funds: Option<bool>,
}

impl Card {
    /// Last four digits of the card number, for logging.
    pub fn last4(&self) -> &str {
        let start = self
            .number
            .char_indices()
            .rev()
            .nth(3)
            .map_or(0, |(i, _)| i);
        &self.number[start..]
    }
}

impl std::fmt::Debug for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Card")
            .field("number", &format_args!("****{}", self.last4()))
            .field("expiration", &self.expiration)
            .field("cvv", &"***")
            .field("blocked", &self.blocked)
            .field("has_funds", &self.has_funds)
            .finish()
    }
}

impl FromArguments for Card {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            number: args.get_str("number")?.to_string(),
            expiration: args.get_str("expiration")?.to_string(),
            cvv: args.get_str("cvv")?.to_string(),
            blocked: args.get_bool_opt("blocked")?,
            has_funds: args.get_bool_opt("has_funds")?,
        })
    }
}

/// Payload for `POST /card`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub task_id: String,
    pub user: User,
    pub card: Card,
}

impl FromArguments for CardData {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            task_id: args.get_str("task_id")?.to_string(),
            user: User::from_arguments(&args.get_object("user")?)?,
            card: Card::from_arguments(&args.get_object("card")?)?,
        })
    }
}

/// Encrypted card payload delivered for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JweData {
    pub task_id: String,
    pub jwe: String,
}

impl FromArguments for JweData {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            task_id: args.get_str("task_id")?.to_string(),
            jwe: args.get_str("jwe")?.to_string(),
        })
    }
}
