//! Flattening of Nexar search responses into [`Part`] records.
//!
//! Classification of specification attributes is by case-insensitive
//! substring match on the attribute's short name, evaluated per spec entry
//! in source order:
//!
//! - `voltage` / `vdd` → sets [`Part::voltage`] (last match wins)
//! - `package` / `case` → sets [`Part::package`] (last match wins)
//! - `interface` / `protocol` / `communication` → value split on commas,
//!   tokens trimmed, empties dropped, appended in order (no deduplication)
//!
//! Last-write-wins for voltage/package and ordered accumulation for
//! interfaces are deliberate and match the upstream consumer's
//! expectations; do not "fix" this into first-match-wins. An empty value in
//! a later matching entry still clobbers an earlier one; empty strings are
//! dropped at record assembly, so the field ends up absent rather than `""`.

use serde_json::Value;

use super::types::{Part, RawPart, SearchResponse, Spec};

/// Flattens a decoded search response into normalised parts.
///
/// Results without a part payload are skipped. Upstream relevance order is
/// preserved; the list is never re-sorted.
#[must_use]
pub fn parts_from_response(response: SearchResponse) -> Vec<Part> {
    let results = response
        .data
        .and_then(|d| d.sup_search)
        .and_then(|s| s.results)
        .unwrap_or_default();

    results
        .into_iter()
        .filter_map(|result| result.part)
        .map(normalize_part)
        .collect()
}

/// Normalises one raw part record.
fn normalize_part(raw: RawPart) -> Part {
    let mpn = raw.mpn.unwrap_or_default();
    let manufacturer = raw
        .manufacturer
        .and_then(|m| m.name)
        .unwrap_or_default();

    let description = match raw.short_description {
        Some(desc) if !desc.is_empty() => desc,
        _ => format!("{manufacturer} {mpn}"),
    };

    let (price, currency) = raw.median_price_1000.map_or_else(
        || (0.0, "USD".to_string()),
        |point| {
            (
                point.price.as_ref().map_or(0.0, parse_price),
                point.currency.unwrap_or_else(|| "USD".to_string()),
            )
        },
    );

    let mut voltage = None;
    let mut package = None;
    let mut interfaces = Vec::new();

    for spec in raw.specs.unwrap_or_default() {
        classify_spec(&spec, &mut voltage, &mut package, &mut interfaces);
    }

    let datasheet = raw.best_datasheet.and_then(|d| d.url);

    // Optional fields are emitted only with a non-empty value.
    Part {
        mpn,
        manufacturer,
        description,
        price,
        currency,
        quantity: 1,
        voltage: voltage.filter(|v| !v.is_empty()),
        package: package.filter(|p| !p.is_empty()),
        interfaces,
        datasheet: datasheet.filter(|url| !url.is_empty()),
    }
}

/// Applies the ordered classification rules to one spec entry.
fn classify_spec(
    spec: &Spec,
    voltage: &mut Option<String>,
    package: &mut Option<String>,
    interfaces: &mut Vec<String>,
) {
    let attr_name = spec
        .attribute
        .as_ref()
        .and_then(|a| a.shortname.as_deref())
        .unwrap_or_default()
        .to_lowercase();
    let value = spec
        .value
        .as_ref()
        .and_then(|v| v.text.as_deref())
        .unwrap_or_default();

    if attr_name.contains("voltage") || attr_name.contains("vdd") {
        *voltage = Some(value.to_string());
    } else if attr_name.contains("package") || attr_name.contains("case") {
        *package = Some(value.to_string());
    } else if attr_name.contains("interface")
        || attr_name.contains("protocol")
        || attr_name.contains("communication")
    {
        interfaces.extend(
            value
                .split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(ToString::to_string),
        );
    }
}

/// Parses a price value that may be a JSON number or a numeric string.
///
/// Unparseable values default to `0.0`.
fn parse_price(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
