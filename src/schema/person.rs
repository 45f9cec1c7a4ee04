//! Cardholder identity: name, address and user.

use serde::{Deserialize, Serialize};

use super::FromArguments;
use crate::error::Result;
use crate::tools::ToolArguments;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub first_name: String,
    pub last_name: String,
}

impl FromArguments for Name {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            first_name: args.get_str("first_name")?.to_string(),
            last_name: args.get_str("last_name")?.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
}

impl FromArguments for Address {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            street: args.get_str("street")?.to_string(),
            street2: args.get_str_opt("street2")?.map(str::to_string),
            city: args.get_str("city")?.to_string(),
            region: args.get_str("region")?.to_string(),
            postal_code: args.get_str("postal_code")?.to_string(),
            country: args.get_str("country")?.to_string(),
        })
    }
}

/// The cardholder a card switch is performed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: Name,
    pub phone_number: String,
    pub address: Address,
}

impl FromArguments for User {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            name: Name::from_arguments(&args.get_object("name")?)?,
            phone_number: args.get_str("phone_number")?.to_string(),
            address: Address::from_arguments(&args.get_object("address")?)?,
        })
    }
}
