//! Click conversion payloads and the wire records built from them.
//!
//! A `ClickConversionPayload` is what the mapping engine resolved out of one
//! event; `build_click_conversion` turns it into the `ClickConversion` wire
//! record the upload endpoint expects. Building is pure: all remote lookups
//! happen before, all I/O after.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Number;

use crate::error::ConnectorError;
use crate::identifiers;
use crate::variables::VariableCache;

/// Consent states accepted by the conversion upload API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsentState {
    Granted,
    Denied,
}

/// Mapped fields for one click conversion, as resolved by the mapping
/// engine. Monetary and id fields are decoded leniently because mapping
/// output preserves whatever type the event property had.
#[derive(Debug, Clone, Deserialize)]
pub struct ClickConversionPayload {
    pub conversion_action: String,
    pub conversion_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub gclid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: Option<Number>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub products: Option<Vec<Product>>,
    #[serde(default)]
    pub custom_variables: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub ad_user_data_consent_state: Option<ConsentState>,
    #[serde(default)]
    pub ad_personalization_consent_state: Option<ConsentState>,
}

/// One cart line item from the mapped event.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<Number>,
}

/// A hashed identifier as embedded in a conversion record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UserIdentifier {
    HashedEmail(String),
    HashedPhoneNumber(String),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Number>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartData {
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_user_data: Option<ConsentState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ad_personalization: Option<ConsentState>,
}

/// A custom variable bound to its account resource name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomVariableBinding {
    pub conversion_custom_variable: String,
    pub value: String,
}

/// One conversion record as sent to the upload endpoint.
///
/// `user_identifiers` is serialized even when empty; the other optional
/// envelope keys are omitted entirely when absent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickConversion {
    pub conversion_action: String,
    pub conversion_date_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gclid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversion_value: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_data: Option<CartData>,
    pub user_identifiers: Vec<UserIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_variables: Option<Vec<CustomVariableBinding>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent: Option<Consent>,
}

/// Request envelope for `:uploadClickConversions`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickConversionBatch {
    pub conversions: Vec<ClickConversion>,
    /// Always true: valid records in the batch are still processed when
    /// others are rejected.
    pub partial_failure: bool,
}

impl ClickConversionBatch {
    pub fn new(conversions: Vec<ClickConversion>) -> Self {
        Self {
            conversions,
            partial_failure: true,
        }
    }
}

/// The exact date-time shape the upload API requires, always UTC.
const CONVERSION_DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

pub fn format_conversion_date_time(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(CONVERSION_DATE_TIME_FORMAT).to_string()
}

/// Build the wire record for one payload. `variables` must already hold the
/// resolution results for this invocation.
pub fn build_click_conversion(
    customer_id: &str,
    payload: &ClickConversionPayload,
    variables: &VariableCache,
) -> Result<ClickConversion, ConnectorError> {
    let mut user_identifiers = Vec::new();
    // Identifier order is fixed: email first, then phone.
    if let Some(email) = &payload.email {
        user_identifiers.push(UserIdentifier::HashedEmail(identifiers::smart_hash(
            email,
            identifiers::normalize_email,
        )?));
    }
    if let Some(phone) = &payload.phone {
        user_identifiers.push(UserIdentifier::HashedPhoneNumber(identifiers::smart_hash(
            phone,
            identifiers::normalize_phone,
        )?));
    }

    let cart_data = payload.products.as_ref().map(|products| CartData {
        items: products
            .iter()
            .map(|product| CartItem {
                product_id: product.product_id.clone(),
                quantity: product.quantity,
                unit_price: product.price.clone(),
            })
            .collect(),
    });

    // The key is present (even if every name was dropped) whenever the
    // mapping asked for custom variables, and absent otherwise.
    let custom_variables = match &payload.custom_variables {
        Some(requested) if !requested.is_empty() => Some(variables.bind(requested)),
        _ => None,
    };

    let consent = if payload.ad_user_data_consent_state.is_some()
        || payload.ad_personalization_consent_state.is_some()
    {
        Some(Consent {
            ad_user_data: payload.ad_user_data_consent_state,
            ad_personalization: payload.ad_personalization_consent_state,
        })
    } else {
        None
    };

    Ok(ClickConversion {
        conversion_action: format!(
            "customers/{}/conversionActions/{}",
            customer_id, payload.conversion_action
        ),
        conversion_date_time: format_conversion_date_time(&payload.conversion_timestamp),
        gclid: payload.gclid.clone(),
        order_id: payload.order_id.clone(),
        conversion_value: payload.value.clone(),
        currency_code: payload.currency.clone(),
        cart_data,
        user_identifiers,
        custom_variables,
        consent,
    })
}

/// Accept a string where the mapping engine produced a number (order ids
/// are a common case).
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(Number),
    }

    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|value| match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}

/// Accept a number where the mapping engine produced a numeric string, and
/// keep it a JSON number so integral values stay integral on the wire.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(Number),
        String(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => serde_json::from_str::<Number>(s.trim())
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
