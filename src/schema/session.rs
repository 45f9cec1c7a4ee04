//! Session creation and extension payloads.

use bon::Builder;
use serde::{Deserialize, Serialize};

use super::{Card, FromArguments, ProductType};
use crate::error::Result;
use crate::tools::ToolArguments;

/// Payload for `POST /session/create`.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(rename = "type")]
    pub session_type: ProductType,
    #[builder(into)]
    pub external_user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub card_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub processor_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,
}

impl FromArguments for SessionData {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        let opt = |key: &str| -> Result<Option<String>> {
            Ok(args.get_str_opt(key)?.map(str::to_string))
        };
        let card = match args.get_object_opt("card")? {
            Some(card) => Some(Card::from_arguments(&card)?),
            None => None,
        };
        Ok(Self {
            session_type: ProductType::from_field(args, "type")?,
            external_user_id: args.get_str("external_user_id")?.to_string(),
            card_id: opt("card_id")?,
            phone_number: opt("phone_number")?,
            email: opt("email")?,
            processor_token: opt("processor_token")?,
            card,
        })
    }
}

/// Payload for `POST /session/extend`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionExtensionRequest {
    pub session_id: String,
}

impl FromArguments for SessionExtensionRequest {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            session_id: args.get_str("session_id")?.to_string(),
        })
    }
}

/// Success body of the session endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
}

pub type SessionExtensionResponse = Session;
