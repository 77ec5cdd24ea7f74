//! Response shapes
//!
//! Every provider returns its own JSON schema. A [`ResponseShape`] says where the
//! interesting numbers live (as JSON pointers) so one client can serve them all.

use super::types::{CurrencyCode, CurrencyCodeList, CurrencyRates, MetalPrices, Payload, UpstreamError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How to turn an upstream JSON body into a [`Payload`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseShape {
    /// Pass the body through untouched
    #[default]
    Raw,
    /// An object of `code -> rate`
    Rates {
        #[serde(default = "default_rates_pointer")]
        pointer: String,
    },
    /// Gold and silver prices at two locations in the body
    Metals { gold: String, silver: String },
    /// A list of currency codes in one of the common layouts
    Codes {
        #[serde(default)]
        pointer: String,
    },
}

fn default_rates_pointer() -> String {
    "/rates".to_string()
}

impl ResponseShape {
    /// Parse a JSON body according to this shape
    pub fn parse(&self, endpoint: &str, body: Value) -> Result<Payload, UpstreamError> {
        match self {
            ResponseShape::Raw => Ok(Payload::Raw(body)),
            ResponseShape::Rates { pointer } => {
                parse_rates(endpoint, locate(endpoint, &body, pointer)?).map(Payload::Rates)
            }
            ResponseShape::Metals { gold, silver } => {
                let gold = price_at(endpoint, &body, gold)?;
                let silver = price_at(endpoint, &body, silver)?;
                Ok(Payload::Metals(MetalPrices { gold, silver }))
            }
            ResponseShape::Codes { pointer } => {
                parse_codes(endpoint, locate(endpoint, &body, pointer)?).map(Payload::Codes)
            }
        }
    }
}

fn locate<'a>(endpoint: &str, body: &'a Value, pointer: &str) -> Result<&'a Value, UpstreamError> {
    body.pointer(pointer)
        .ok_or_else(|| UpstreamError::malformed(endpoint, format!("nothing at {pointer:?}")))
}

/// Providers disagree on whether prices are numbers or numeric strings
fn as_price(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    price.filter(|p| p.is_finite())
}

fn price_at(endpoint: &str, body: &Value, pointer: &str) -> Result<f64, UpstreamError> {
    let value = locate(endpoint, body, pointer)?;
    as_price(value)
        .ok_or_else(|| UpstreamError::malformed(endpoint, format!("{pointer:?} is not a price: {value}")))
}

fn parse_rates(endpoint: &str, value: &Value) -> Result<CurrencyRates, UpstreamError> {
    let object = value
        .as_object()
        .ok_or_else(|| UpstreamError::malformed(endpoint, "rates are not an object"))?;

    object
        .iter()
        .map(|(code, rate)| {
            as_price(rate)
                .map(|rate| (code.clone(), rate))
                .ok_or_else(|| {
                    UpstreamError::malformed(endpoint, format!("rate for {code} is not a number: {rate}"))
                })
        })
        .collect()
}

fn parse_codes(endpoint: &str, value: &Value) -> Result<CurrencyCodeList, UpstreamError> {
    let supported_codes = match value {
        // {"supported_codes": [...]} or {"codes": [...]} wrappers
        Value::Object(map) if map.contains_key("supported_codes") || map.contains_key("codes") => {
            let inner = map.get("supported_codes").or_else(|| map.get("codes"));
            return parse_codes(endpoint, inner.unwrap_or(&Value::Null));
        }
        // {"USD": "US Dollar", ...}
        Value::Object(map) => map
            .iter()
            .map(|(code, name)| match name {
                Value::String(name) => Ok(CurrencyCode {
                    code: code.clone(),
                    name: name.clone(),
                }),
                _ => Err(UpstreamError::malformed(
                    endpoint,
                    format!("name for {code} is not a string"),
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        // [["USD", "US Dollar"], ...] or [{"code": "USD", "name": "US Dollar"}, ...]
        Value::Array(items) => items
            .iter()
            .map(|item| code_entry(item).ok_or_else(|| {
                UpstreamError::malformed(endpoint, format!("unrecognized currency entry: {item}"))
            }))
            .collect::<Result<Vec<_>, _>>()?,
        other => {
            return Err(UpstreamError::malformed(
                endpoint,
                format!("currency codes are neither a list nor a map: {other}"),
            ))
        }
    };

    Ok(CurrencyCodeList { supported_codes })
}

fn code_entry(item: &Value) -> Option<CurrencyCode> {
    match item {
        Value::Array(pair) => Some(CurrencyCode {
            code: pair.first()?.as_str()?.to_string(),
            name: pair.get(1)?.as_str()?.to_string(),
        }),
        Value::Object(_) => Some(CurrencyCode {
            code: item.get("code")?.as_str()?.to_string(),
            name: item.get("name")?.as_str()?.to_string(),
        }),
        _ => None,
    }
}
