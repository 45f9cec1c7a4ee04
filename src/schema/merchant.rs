//! Merchants and the merchant-listing payloads.

use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString, VariantNames};

use super::FromArguments;
use crate::error::{KnotError, Result};
use crate::tools::ToolArguments;

/// Product a merchant list or session is requested for.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProductType {
    #[default]
    CardSwitcher,
    TransactionLink,
}

impl ProductType {
    /// Read a required product type field.
    pub(crate) fn from_field(args: &ToolArguments, key: &str) -> Result<Self> {
        let raw = args.get_str(key)?;
        Self::parse_field(&args.field(key), raw)
    }

    /// Parse `raw`, reporting failures against `field`.
    pub fn parse_field(field: &str, raw: &str) -> Result<Self> {
        raw.parse().map_err(|_| {
            KnotError::validation(
                field,
                format!("expected one of {}, got '{raw}'", Self::VARIANTS.join(", ")),
            )
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    pub name: String,
    pub external_merchant_id: String,
    pub card_id: String,
}

impl FromArguments for Merchant {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            name: args.get_str("name")?.to_string(),
            external_merchant_id: args.get_str("external_merchant_id")?.to_string(),
            card_id: args.get_str("card_id")?.to_string(),
        })
    }
}

/// Payload for `POST /merchant/list`.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct MerchantListRequest {
    #[serde(rename = "type")]
    pub product_type: ProductType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub external_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub status: Option<String>,
}

impl FromArguments for MerchantListRequest {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        let opt = |key: &str| -> Result<Option<String>> {
            Ok(args.get_str_opt(key)?.map(str::to_string))
        };
        Ok(Self {
            product_type: ProductType::from_field(args, "type")?,
            platform: opt("platform")?,
            user_agent: opt("user_agent")?,
            search: opt("search")?,
            external_user_id: opt("external_user_id")?,
            status: opt("status")?,
        })
    }
}

/// Success body of `POST /merchant/list`. Order is the backend's.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ListMerchantsResponse {
    pub merchants: Vec<Merchant>,
}

impl FromArguments for ListMerchantsResponse {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        let merchants = args
            .get_object_array("merchants")?
            .iter()
            .map(Merchant::from_arguments)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { merchants })
    }
}

/// Request to unlink a merchant from a user.
///
/// `merchant_id` accepts an integer or a string of ASCII digits; anything
/// else fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct UnlinkMerchant {
    pub external_user_id: String,
    pub merchant_id: i64,
}

impl FromArguments for UnlinkMerchant {
    fn from_arguments(args: &ToolArguments) -> Result<Self> {
        Ok(Self {
            external_user_id: args.get_str("external_user_id")?.to_string(),
            merchant_id: coerce_merchant_id(args, "merchant_id")?,
        })
    }
}

impl TryFrom<Value> for UnlinkMerchant {
    type Error = KnotError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

fn coerce_merchant_id(args: &ToolArguments, key: &str) -> Result<i64> {
    let field = args.field(key);
    match args.raw().get(key) {
        None => Err(KnotError::validation(field, "field required")),
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s
            .parse()
            .map_err(|_| KnotError::validation(field, format!("'{s}' is out of range"))),
        Some(Value::Number(n)) if n.is_i64() => n
            .as_i64()
            .ok_or_else(|| KnotError::validation(field, "merchant_id must be an integer")),
        Some(_) => Err(KnotError::validation(field, "merchant_id must be an integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn unlink(merchant_id: Value) -> Result<UnlinkMerchant> {
        UnlinkMerchant::from_value(json!({ "external_user_id": "u1", "merchant_id": merchant_id }))
    }

    #[test]
    fn product_type_round_trips_snake_case() {
        assert_eq!(ProductType::CardSwitcher.to_string(), "card_switcher");
        assert_eq!(
            "transaction_link".parse::<ProductType>().unwrap(),
            ProductType::TransactionLink
        );
        assert_eq!(ProductType::default(), ProductType::CardSwitcher);
    }

    #[test]
    fn unknown_product_type_is_rejected() {
        let err = MerchantListRequest::from_value(json!({ "type": "vault" })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid type: expected one of card_switcher, transaction_link, got 'vault'"
        );
    }

    #[test]
    fn list_request_keeps_absent_filters_absent() {
        let request = MerchantListRequest::from_value(json!({
            "type": "transaction_link",
            "search": ""
        }))
        .unwrap();
        assert_eq!(request.search.as_deref(), Some(""));
        assert_eq!(request.platform, None);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "type": "transaction_link", "search": "" })
        );
    }

    #[test]
    fn list_request_builder_accepts_str() {
        let request = MerchantListRequest::builder()
            .product_type(ProductType::CardSwitcher)
            .user_agent("mcp-client")
            .build();
        assert_eq!(request.user_agent.as_deref(), Some("mcp-client"));
    }

    #[test]
    fn list_response_preserves_order_and_duplicates() {
        let merchant = json!({ "name": "Target", "external_merchant_id": "target", "card_id": "card_102" });
        let response = ListMerchantsResponse::from_value(json!({
            "merchants": [
                { "name": "Walmart", "external_merchant_id": "walmart", "card_id": "card_101" },
                merchant.clone(),
                merchant
            ]
        }))
        .unwrap();
        let names: Vec<&str> = response.merchants.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Walmart", "Target", "Target"]);
    }

    #[test]
    fn list_response_names_bad_merchant_index() {
        let err = ListMerchantsResponse::from_value(json!({
            "merchants": [{ "name": "Amazon", "external_merchant_id": "amazon" }]
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "invalid merchants[0].card_id: field required");
    }

    #[test]
    fn merchant_id_digit_string_is_parsed() {
        assert_eq!(unlink(json!("42")).unwrap().merchant_id, 42);
    }

    #[test]
    fn merchant_id_integer_passes_through() {
        assert_eq!(unlink(json!(42)).unwrap().merchant_id, 42);
    }

    #[test]
    fn merchant_id_rejects_other_forms() {
        for bad in [json!("abc"), json!(4.2), json!(null), json!(""), json!("-1"), json!(true)] {
            let err = unlink(bad.clone()).unwrap_err();
            assert_eq!(
                err.to_string(),
                "invalid merchant_id: merchant_id must be an integer",
                "input {bad}"
            );
        }
    }

    #[test]
    fn merchant_id_missing_is_required() {
        let err = UnlinkMerchant::from_value(json!({ "external_user_id": "u1" })).unwrap_err();
        assert_eq!(err.to_string(), "invalid merchant_id: field required");
    }

    #[test]
    fn unlink_merchant_deserialize_applies_coercion() {
        let parsed: UnlinkMerchant =
            serde_json::from_value(json!({ "external_user_id": "u1", "merchant_id": "7" })).unwrap();
        assert_eq!(parsed.merchant_id, 7);
        assert!(serde_json::from_value::<UnlinkMerchant>(
            json!({ "external_user_id": "u1", "merchant_id": "x" })
        )
        .is_err());
    }
}
