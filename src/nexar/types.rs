//! Wire types for the Nexar Supply API and the normalised output record.
//!
//! The response types mirror the GraphQL selection in
//! [`client`](super::client). Every nested field is optional: the upstream
//! API omits fields freely and a missing branch must degrade to defaults,
//! never to a decode failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OAuth2 token response from the identity endpoint.
///
/// `access_token` is deliberately non-optional: its absence is an upstream
/// contract violation and surfaces as a decode error.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// The opaque bearer token.
    pub access_token: String,
}

/// Top-level GraphQL search response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    /// The data payload, absent when the query failed outright.
    pub data: Option<SearchData>,
    /// GraphQL error list; presence means the query failed.
    pub errors: Option<Vec<GraphqlError>>,
}

/// A single GraphQL error entry.
#[derive(Debug, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
}

/// The `data` branch of the search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchData {
    /// The `supSearch` field.
    pub sup_search: Option<SupSearch>,
}

/// The `supSearch` result container.
#[derive(Debug, Deserialize)]
pub struct SupSearch {
    /// Matched results in upstream relevance order.
    pub results: Option<Vec<SearchResult>>,
}

/// One search result wrapping an optional part payload.
#[derive(Debug, Deserialize)]
pub struct SearchResult {
    /// The part record; results without one are skipped.
    pub part: Option<RawPart>,
}

/// A part record as returned by the catalog, prior to normalisation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPart {
    /// Manufacturer part number.
    pub mpn: Option<String>,
    /// Manufacturer reference.
    pub manufacturer: Option<Manufacturer>,
    /// Short human-readable description.
    pub short_description: Option<String>,
    /// Median price at 1000-unit quantity.
    pub median_price_1000: Option<PricePoint>,
    /// Attribute/value specification pairs.
    pub specs: Option<Vec<Spec>>,
    /// Best available datasheet reference.
    pub best_datasheet: Option<Datasheet>,
}

/// Manufacturer reference.
#[derive(Debug, Deserialize)]
pub struct Manufacturer {
    /// Manufacturer name.
    pub name: Option<String>,
}

/// A price observation.
#[derive(Debug, Deserialize)]
pub struct PricePoint {
    /// Price value. Upstream sometimes serialises this as a string, so it
    /// is held raw and parsed during normalisation.
    pub price: Option<Value>,
    /// ISO currency code.
    pub currency: Option<String>,
}

/// One specification attribute/value pair.
#[derive(Debug, Deserialize)]
pub struct Spec {
    /// The attribute descriptor.
    pub attribute: Option<SpecAttribute>,
    /// The attribute value.
    pub value: Option<SpecValue>,
}

/// Specification attribute descriptor.
#[derive(Debug, Deserialize)]
pub struct SpecAttribute {
    /// Short attribute name used for classification.
    pub shortname: Option<String>,
}

/// Specification value.
#[derive(Debug, Deserialize)]
pub struct SpecValue {
    /// Textual value.
    pub text: Option<String>,
}

/// Datasheet reference.
#[derive(Debug, Deserialize)]
pub struct Datasheet {
    /// Datasheet URL.
    pub url: Option<String>,
}

/// A normalised component record, the tool's output shape.
///
/// Optional fields are omitted from the serialised output when absent,
/// never emitted as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    /// Manufacturer part number (empty string when the source omits it).
    pub mpn: String,
    /// Manufacturer name (empty string when the source omits it).
    pub manufacturer: String,
    /// Description; falls back to `"{manufacturer} {mpn}"`.
    pub description: String,
    /// Median price at 1000 units; `0.0` when absent or unparseable.
    pub price: f64,
    /// ISO currency code, defaulting to `"USD"`.
    pub currency: String,
    /// Default BOM quantity, always `1`. Not an availability figure.
    pub quantity: u32,
    /// Operating/supply voltage, free-form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<String>,
    /// Package/case designator, free-form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Supported interfaces in source order, not deduplicated.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
    /// Datasheet URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasheet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_full_search_response() {
        let json = r#"{
            "data": {
                "supSearch": {
                    "results": [
                        {
                            "part": {
                                "mpn": "ESP32-WROOM-32",
                                "manufacturer": {"name": "Espressif"},
                                "shortDescription": "WiFi+BT module",
                                "medianPrice1000": {"price": 2.5, "currency": "USD"},
                                "specs": [
                                    {
                                        "attribute": {"shortname": "Supply Voltage"},
                                        "value": {"text": "3.0V ~ 3.6V"}
                                    }
                                ],
                                "bestDatasheet": {"url": "https://example.com/ds.pdf"}
                            }
                        }
                    ]
                }
            }
        }"#;

        let decoded: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(decoded.errors.is_none());
        let results = decoded.data.unwrap().sup_search.unwrap().results.unwrap();
        let part = results[0].part.as_ref().unwrap();
        assert_eq!(part.mpn.as_deref(), Some("ESP32-WROOM-32"));
        assert_eq!(
            part.manufacturer.as_ref().unwrap().name.as_deref(),
            Some("Espressif")
        );
    }

    #[test]
    fn decode_tolerates_missing_branches() {
        let decoded: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(decoded.data.is_none());
        assert!(decoded.errors.is_none());

        let decoded: SearchResponse =
            serde_json::from_str(r#"{"data": {"supSearch": null}}"#).unwrap();
        assert!(decoded.data.unwrap().sup_search.is_none());
    }

    #[test]
    fn decode_error_payload() {
        let json = r#"{"errors": [{"message": "bad query"}]}"#;
        let decoded: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.errors.unwrap()[0].message, "bad query");
    }

    #[test]
    fn part_serialisation_omits_absent_optionals() {
        let part = Part {
            mpn: "X1".to_string(),
            manufacturer: "Acme".to_string(),
            description: "Acme X1".to_string(),
            price: 0.0,
            currency: "USD".to_string(),
            quantity: 1,
            voltage: None,
            package: None,
            interfaces: Vec::new(),
            datasheet: None,
        };

        let json = serde_json::to_string(&part).unwrap();
        assert!(!json.contains("voltage"));
        assert!(!json.contains("package"));
        assert!(!json.contains("interfaces"));
        assert!(!json.contains("datasheet"));
        assert!(json.contains(r#""quantity":1"#));
    }

    #[test]
    fn token_response_requires_access_token() {
        assert!(serde_json::from_str::<TokenResponse>(r#"{"token_type":"Bearer"}"#).is_err());
    }
}
