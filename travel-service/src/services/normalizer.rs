//! Map the loose shapes the model returns onto the canonical output types.

use crate::error::TravelError;
use crate::models::destination::USD_MARKER;
use crate::models::{
    CostEntry, Destination, DestinationDetails, ExpenseCategory, ExpenseMap, PriceTiers, Transport,
};
use serde_json::{Map, Value};

pub const PLACEHOLDER_IMAGES: [&str; 6] = [
    "https://images.unsplash.com/photo-1582145641536-5f85e4c3beec?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1482938289607-e9573fc25ebb?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1469474968028-56623f02e42e?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1569418042459-b21419b1a05e?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1500375592092-40eb2168fd21?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1475066392170-59d55d96fe51?auto=format&fit=crop&w=800&q=80",
];

/// Round-robin placeholder image for the destination at `index`.
pub fn pick_image(index: usize) -> &'static str {
    PLACEHOLDER_IMAGES[index % PLACEHOLDER_IMAGES.len()]
}

/// Part of the payload that was dropped instead of failing the request.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationWarning {
    pub field: String,
    pub detail: String,
}

/// Strict cost normalization: the first unrecognised transport shape fails.
pub fn normalize_cost(raw: &Value) -> Result<CostEntry, TravelError> {
    let mut entry = CostEntry::default();

    let map = match raw {
        Value::Null => return Ok(entry),
        Value::Object(map) => map,
        other => {
            return Err(TravelError::InvalidCostShape {
                transport: "cost".to_string(),
                raw: other.clone(),
            })
        }
    };

    for transport in Transport::ALL {
        if let Some(value) = map.get(transport.key()) {
            if let Some(usd) = normalize_transport_cost(transport, value)? {
                entry.set(transport, usd);
            }
        }
    }

    Ok(entry)
}

/// Like [`normalize_cost`], but drops offending transports and reports them.
pub fn normalize_cost_lenient(raw: &Value) -> (CostEntry, Vec<TravelError>) {
    let mut entry = CostEntry::default();
    let mut errors = Vec::new();

    let map = match raw {
        Value::Null => return (entry, errors),
        Value::Object(map) => map,
        other => {
            errors.push(TravelError::InvalidCostShape {
                transport: "cost".to_string(),
                raw: other.clone(),
            });
            return (entry, errors);
        }
    };

    for transport in Transport::ALL {
        let Some(value) = map.get(transport.key()) else {
            continue;
        };
        match normalize_transport_cost(transport, value) {
            Ok(Some(usd)) => entry.set(transport, usd),
            Ok(None) => {}
            Err(e) => errors.push(e),
        }
    }

    (entry, errors)
}

/// `null` means absent; numbers pass through; `{min,max}` becomes the
/// midpoint; `{value,currency}` yields `value` unconverted.
fn normalize_transport_cost(transport: Transport, value: &Value) -> Result<Option<f64>, TravelError> {
    let invalid = || TravelError::InvalidCostShape {
        transport: transport.key().to_string(),
        raw: value.clone(),
    };

    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n.as_f64().map(Some).ok_or_else(invalid),
        Value::Object(map) if map.contains_key("min") || map.contains_key("max") => {
            let min = optional_number(map, "min").map_err(|_| invalid())?;
            let max = optional_number(map, "max").map_err(|_| invalid())?;
            match (min, max) {
                (Some(min), Some(max)) => Ok(Some((min + max) / 2.0)),
                (Some(only), None) | (None, Some(only)) => Ok(Some(only)),
                (None, None) => Err(invalid()),
            }
        }
        Value::Object(map) if map.contains_key("value") => map
            .get("value")
            .and_then(Value::as_f64)
            .map(Some)
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// `Ok(None)` when the key is absent or null, `Err` when present but not numeric.
fn optional_number(map: &Map<String, Value>, key: &str) -> Result<Option<f64>, ()> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or(()),
        Some(_) => Err(()),
    }
}

/// Numbers, or numeric strings with an optional trailing `%`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Fill each expense category from `raw`, falling back to its default share.
pub fn normalize_expenses(raw: &Value) -> ExpenseMap {
    let mut expenses = ExpenseMap::default();

    if let Value::Object(map) = raw {
        for category in ExpenseCategory::ALL {
            if let Some(value) = map.get(category.key()).and_then(coerce_number) {
                expenses.set(category, value);
            }
        }
    }

    expenses
}

fn text_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Normalize the recommendations array.
///
/// Elements that are not objects or have no name are dropped; images are
/// assigned by position in the model's array so they stay stable when an
/// earlier element is dropped.
pub fn normalize_destinations(raw: &Value) -> (Vec<Destination>, Vec<NormalizationWarning>) {
    let mut destinations = Vec::new();
    let mut warnings = Vec::new();

    let Some(items) = raw.as_array() else {
        warnings.push(NormalizationWarning {
            field: "destinations".to_string(),
            detail: "expected a JSON array".to_string(),
        });
        return (destinations, warnings);
    };

    for (index, item) in items.iter().enumerate() {
        let Some(map) = item.as_object() else {
            warnings.push(NormalizationWarning {
                field: format!("destinations[{index}]"),
                detail: format!("not an object: {item}"),
            });
            continue;
        };

        let name = match text_of(map.get("name")) {
            Some(name) if !name.is_empty() => name,
            _ => {
                warnings.push(NormalizationWarning {
                    field: format!("destinations[{index}].name"),
                    detail: "missing destination name".to_string(),
                });
                continue;
            }
        };

        let (cost, cost_errors) = normalize_cost_lenient(map.get("cost").unwrap_or(&Value::Null));
        warnings.extend(cost_errors.into_iter().map(|e| NormalizationWarning {
            field: match &e {
                TravelError::InvalidCostShape { transport, .. } => {
                    format!("destinations[{index}].cost.{transport}")
                }
                _ => format!("destinations[{index}].cost"),
            },
            detail: e.to_string(),
        }));

        destinations.push(Destination {
            id: text_of(map.get("id"))
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| (index + 1).to_string()),
            name,
            description: text_of(map.get("description")).unwrap_or_default(),
            cost,
            currency: USD_MARKER.to_string(),
            distance: map.get("distance").and_then(coerce_number).unwrap_or(0.0),
            travel_time: text_of(map.get("travelTime")).unwrap_or_default(),
            image: pick_image(index).to_string(),
        });
    }

    (destinations, warnings)
}

fn price_tiers(raw: Option<&Value>) -> PriceTiers {
    let Some(Value::Object(map)) = raw else {
        return PriceTiers::default();
    };

    PriceTiers {
        budget: text_of(map.get("budget")).unwrap_or_default(),
        mid: text_of(map.get("mid")).unwrap_or_default(),
        luxury: text_of(map.get("luxury")).unwrap_or_default(),
    }
}

/// Normalize the destination details object.
pub fn normalize_details(raw: &Value) -> DestinationDetails {
    let empty = Map::new();
    let map = raw.as_object().unwrap_or(&empty);

    let attractions = map
        .get("attractions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => text_of(obj.get("name")),
                    other => text_of(Some(other)),
                })
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    DestinationDetails {
        attractions,
        accommodation: price_tiers(map.get("accommodation")),
        food: price_tiers(map.get("food")),
        best_time_to_visit: text_of(map.get("bestTimeToVisit")).unwrap_or_default(),
        local_tips: text_of(map.get("localTips")).unwrap_or_default(),
        expenses: normalize_expenses(map.get("expenses").unwrap_or(&Value::Null)),
    }
}
