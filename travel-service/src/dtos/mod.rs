//! Inbound request bodies.

use crate::error::TravelError;
use crate::models::Budget;
use crate::services::{DestinationQuery, TravelQuery};
use serde::Deserialize;
use validator::Validate;

/// Budget as sent by clients: a bare USD number or an amount with currency.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BudgetInput {
    Amount(f64),
    Priced { value: f64, currency: String },
}

impl From<BudgetInput> for Budget {
    fn from(input: BudgetInput) -> Self {
        match input {
            BudgetInput::Amount(amount) => Budget::Usd(amount),
            BudgetInput::Priced { value, currency } => Budget::Foreign {
                amount: value,
                code: currency,
            },
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationsRequest {
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    pub budget: BudgetInput,
}

impl RecommendationsRequest {
    /// Resolve into a pipeline query with the budget in USD.
    pub fn into_query(self) -> Result<TravelQuery, TravelError> {
        let location = self.location.trim();
        if location.is_empty() {
            return Err(TravelError::Validation("Location is required".to_string()));
        }

        let budget_usd = Budget::from(self.budget).to_usd()?;

        Ok(TravelQuery {
            location: location.to_string(),
            budget_usd,
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DestinationRef {
    #[validate(length(min = 1, message = "Destination name is required"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Distance cannot be negative"))]
    pub distance: Option<f64>,
}

impl DestinationRef {
    pub fn into_query(self) -> Result<DestinationQuery, TravelError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(TravelError::Validation(
                "Destination name is required".to_string(),
            ));
        }

        Ok(DestinationQuery {
            name: name.to_string(),
            distance: self.distance,
        })
    }
}

/// Accepts `{"name": ..}` or the wrapped `{"destination": {"name": ..}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DestinationDetailsRequest {
    Wrapped { destination: DestinationRef },
    Bare(DestinationRef),
}

impl DestinationDetailsRequest {
    pub fn into_destination(self) -> DestinationRef {
        match self {
            DestinationDetailsRequest::Wrapped { destination } => destination,
            DestinationDetailsRequest::Bare(destination) => destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_number_budget() {
        let request: RecommendationsRequest =
            serde_json::from_value(json!({"location": "Boston", "budget": 200})).unwrap();
        let query = request.into_query().unwrap();
        assert_eq!(query.location, "Boston");
        assert_eq!(query.budget_usd, 200.0);
    }

    #[test]
    fn structured_budget_is_converted() {
        let request: RecommendationsRequest = serde_json::from_value(json!({
            "location": "London",
            "budget": {"value": 78, "currency": "GBP"}
        }))
        .unwrap();
        let query = request.into_query().unwrap();
        assert!((query.budget_usd - 100.0).abs() < 1e-9);
    }

    #[test]
    fn blank_location_is_rejected() {
        let request: RecommendationsRequest =
            serde_json::from_value(json!({"location": "   ", "budget": 50})).unwrap();
        assert_eq!(request.into_query().unwrap_err().kind(), "validation");
    }

    #[test]
    fn empty_location_fails_validator() {
        let request: RecommendationsRequest =
            serde_json::from_value(json!({"location": "", "budget": 50})).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn string_budget_does_not_deserialize() {
        let parsed = serde_json::from_value::<RecommendationsRequest>(
            json!({"location": "Boston", "budget": "lots"}),
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn details_request_accepts_both_shapes() {
        let bare: DestinationDetailsRequest =
            serde_json::from_value(json!({"name": "Providence", "distance": 50})).unwrap();
        let wrapped: DestinationDetailsRequest =
            serde_json::from_value(json!({"destination": {"name": "Providence"}})).unwrap();

        assert_eq!(bare.into_destination().distance, Some(50.0));

        let query = wrapped.into_destination().into_query().unwrap();
        assert_eq!(query.name, "Providence");
        assert_eq!(query.distance, None);
    }

    #[test]
    fn negative_distance_fails_validator() {
        let destination = DestinationRef {
            name: "Providence".to_string(),
            distance: Some(-1.0),
        };
        assert!(destination.validate().is_err());
    }
}
