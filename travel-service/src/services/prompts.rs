//! Prompt templates.
//!
//! The model has no enforced output schema, so each prompt spells out the
//! exact JSON shape and asks for nothing else.

/// Render an amount without a trailing `.0` for whole numbers.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

pub fn build_recommendations_prompt(location: &str, budget_usd: f64) -> String {
    let budget = format_amount(budget_usd);

    format!(
        r#"Act as a travel expert. I am currently in {location} and have a budget of ${budget} USD.
I need recommendations for 6 destinations that I can travel to from my location within this budget.

The response should be a valid JSON array with exactly 6 destinations, each with the following properties:
- id: A unique string identifier
- name: The destination name
- description: A detailed 1-2 sentence description
- cost: Object with 'train' and/or 'bus' costs in USD as plain numbers (exclude a mode if not applicable)
- currency: '$'
- distance: Approximate distance from {location} in miles, as a number
- travelTime: Estimated travel time range as a string

Include only realistic destinations that can be reached within the ${budget} budget.
Return ONLY the JSON array, no other text."#
    )
}

pub fn build_details_prompt(destination_name: &str, distance: Option<f64>) -> String {
    let distance = match distance {
        Some(miles) => format!("{} miles", format_amount(miles)),
        None => "an unspecified distance".to_string(),
    };

    format!(
        r#"Act as a travel expert. I want to visit {destination_name} from {distance} away.
Provide detailed information in JSON format with the following structure:
{{
    "attractions": [List of 3-5 top attractions as strings],
    "accommodation": {{
        "budget": "Price range for budget accommodations in USD",
        "mid": "Price range for mid-range accommodations in USD",
        "luxury": "Price range for luxury accommodations in USD"
    }},
    "food": {{
        "budget": "Price range for budget food per day in USD",
        "mid": "Price range for mid-range food per day in USD",
        "luxury": "Price range for luxury food per day in USD"
    }},
    "bestTimeToVisit": "Best seasons or months to visit",
    "localTips": "Tips for travelers visiting this destination",
    "expenses": {{
        "transportation": Number (percentage of budget),
        "accommodation": Number (percentage of budget),
        "food": Number (percentage of budget),
        "activities": Number (percentage of budget),
        "other": Number (percentage of budget)
    }}
}}

IMPORTANT: All expense percentage values must be exact numbers, not objects, strings, or ranges. For example: "transportation": 30 (not "transportation": {{"min": 25, "max": 35}}).
Return ONLY the JSON object, no other text."#
    )
}
