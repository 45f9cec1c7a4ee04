//! Domain objects and per-operation payloads.
//!
//! Every type here can be built from loosely typed caller arguments through
//! [`FromArguments`], which either yields a fully validated value or a
//! [`KnotError::Validation`](crate::error::KnotError::Validation) naming the
//! offending field. Optional fields stay `None` when absent and are omitted
//! from serialized payloads. Nothing in this module performs I/O.

pub mod card;
pub mod merchant;
pub mod person;
pub mod session;

pub use card::{Card, CardData, JweData};
pub use merchant::{
    ListMerchantsResponse, Merchant, MerchantListRequest, ProductType, UnlinkMerchant,
};
pub use person::{Address, Name, User};
pub use session::{Session, SessionData, SessionExtensionRequest, SessionExtensionResponse};

use crate::error::Result;
use crate::tools::ToolArguments;

/// Construct a validated value from raw caller arguments.
pub trait FromArguments: Sized {
    fn from_arguments(args: &ToolArguments) -> Result<Self>;

    /// Validate a raw JSON value.
    fn from_value(value: serde_json::Value) -> Result<Self> {
        Self::from_arguments(&ToolArguments::new(value))
    }
}
