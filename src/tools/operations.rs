//! The four backend operations, as typed async methods.
//!
//! Each operation takes a validated argument struct, builds the outbound
//! payload and performs exactly one backend call. Results are returned
//! unchanged: the backend's JSON, a `{"response": ...}` wrapper for non-JSON
//! bodies, or a [`KnotError`](crate::error::KnotError).

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::client::{Backend, BackendClient, BackendExt};
use crate::config::KnotConfig;
use crate::error::Result;
use crate::schema::{
    Card, CardData, FromArguments, MerchantListRequest, ProductType, SessionData,
    SessionExtensionRequest, User,
};
use crate::tools::ToolArguments;

pub const MERCHANT_LIST_ENDPOINT: &str = "/merchant/list";
pub const CARD_SWITCH_ENDPOINT: &str = "/card";
pub const SESSION_CREATE_ENDPOINT: &str = "/session/create";
pub const SESSION_EXTEND_ENDPOINT: &str = "/session/extend";

/// Arguments of `list_merchants`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListMerchantsArgs {
    pub product_type: ProductType,
    pub user_agent: Option<String>,
}

impl FromArguments for ListMerchantsArgs {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        let product_type = match args.get_str_opt("type")? {
            Some(raw) => ProductType::parse_field(&args.field("type"), raw)?,
            None => ProductType::default(),
        };
        Ok(Self {
            product_type,
            user_agent: args.get_str_opt("user_agent")?.map(str::to_string),
        })
    }
}

/// Arguments of `switch_card`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchCardArgs {
    pub task_id: String,
    pub card_number: String,
    pub card_expiration: String,
    pub card_cvv: String,
    /// Cardholder; the configured default user when `None`.
    pub user: Option<User>,
}

impl FromArguments for SwitchCardArgs {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        let user = match args.get_object_opt("user")? {
            Some(user) => Some(User::from_arguments(&user)?),
            None => None,
        };
        Ok(Self {
            task_id: args.get_str("task_id")?.to_string(),
            card_number: args.get_str("card_number")?.to_string(),
            card_expiration: args.get_str("card_expiration")?.to_string(),
            card_cvv: args.get_str("card_cvv")?.to_string(),
            user,
        })
    }
}

/// Arguments of `create_session`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionArgs {
    pub session_type: ProductType,
    pub external_user_id: Option<String>,
}

impl FromArguments for CreateSessionArgs {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            session_type: ProductType::from_field(args, "session_type")?,
            external_user_id: args.get_str_opt("external_user_id")?.map(str::to_string),
        })
    }
}

/// Arguments of `extend_session`.
pub type ExtendSessionArgs = SessionExtensionRequest;

/// Typed entry points for every backend operation.
pub struct KnotTools {
    backend: Arc<dyn Backend>,
    config: KnotConfig,
}

impl KnotTools {
    pub fn new(backend: Arc<dyn Backend>, config: KnotConfig) -> Self {
        Self { backend, config }
    }

    /// Build an HTTP-backed instance from configuration.
    pub fn from_config(config: KnotConfig) -> Result<Self> {
        let client = BackendClient::new(&config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    pub fn config(&self) -> &KnotConfig {
        &self.config
    }

    /// List merchants available for a product.
    pub async fn list_merchants(&self, args: ListMerchantsArgs) -> Result<Value> {
        info!(
            product_type = %args.product_type,
            user_agent = args.user_agent.as_deref(),
            "list_merchants"
        );
        let request = MerchantListRequest::builder()
            .product_type(args.product_type)
            .user_agent(
                args.user_agent
                    .unwrap_or_else(|| self.config.default_user_agent.clone()),
            )
            .external_user_id(self.config.default_external_user_id.clone())
            .status(self.config.default_merchant_status.clone())
            .search("")
            .build();
        self.backend.call(MERCHANT_LIST_ENDPOINT, &request).await
    }

    /// Switch a user's card at merchants for a task.
    pub async fn switch_card(&self, args: SwitchCardArgs) -> Result<Value> {
        let user = match args.user {
            Some(user) => user,
            None => {
                warn!(
                    task_id = %args.task_id,
                    "switch_card called without a user; using the configured default cardholder"
                );
                self.config.default_user.clone()
            }
        };
        let payload = CardData {
            task_id: args.task_id,
            user,
            card: Card {
                number: args.card_number,
                expiration: args.card_expiration,
                cvv: args.card_cvv,
                blocked: None,
                has_funds: None,
            },
        };
        info!(task_id = %payload.task_id, card = %payload.card.last4(), "switch_card");
        self.backend.call(CARD_SWITCH_ENDPOINT, &payload).await
    }

    /// Create a backend session.
    pub async fn create_session(&self, args: CreateSessionArgs) -> Result<Value> {
        let payload = SessionData::builder()
            .session_type(args.session_type)
            .external_user_id(
                args.external_user_id
                    .unwrap_or_else(|| self.config.default_external_user_id.clone()),
            )
            .build();
        info!(
            session_type = %payload.session_type,
            external_user_id = %payload.external_user_id,
            "create_session"
        );
        self.backend.call(SESSION_CREATE_ENDPOINT, &payload).await
    }

    /// Extend an existing session.
    pub async fn extend_session(&self, args: ExtendSessionArgs) -> Result<Value> {
        info!(session_id = %args.session_id, "extend_session");
        self.backend.call(SESSION_EXTEND_ENDPOINT, &args).await
    }
}

impl std::fmt::Debug for KnotTools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnotTools")
            .field("config", &self.config)
            .finish()
    }
}
