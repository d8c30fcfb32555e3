use serde::{Deserialize, Serialize};

/// Price ranges per comfort tier, as free text (e.g. "$50-80 per night").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTiers {
    pub budget: String,
    pub mid: String,
    pub luxury: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseCategory {
    Transportation,
    Accommodation,
    Food,
    Activities,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Transportation,
        ExpenseCategory::Accommodation,
        ExpenseCategory::Food,
        ExpenseCategory::Activities,
        ExpenseCategory::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ExpenseCategory::Transportation => "transportation",
            ExpenseCategory::Accommodation => "accommodation",
            ExpenseCategory::Food => "food",
            ExpenseCategory::Activities => "activities",
            ExpenseCategory::Other => "other",
        }
    }

    /// Share used when the model gives nothing usable.
    pub fn default_share(&self) -> f64 {
        match self {
            ExpenseCategory::Transportation => 20.0,
            ExpenseCategory::Accommodation => 30.0,
            ExpenseCategory::Food => 25.0,
            ExpenseCategory::Activities => 15.0,
            ExpenseCategory::Other => 10.0,
        }
    }
}

/// Expense split by category. Values are not guaranteed to sum to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseMap {
    pub transportation: f64,
    pub accommodation: f64,
    pub food: f64,
    pub activities: f64,
    pub other: f64,
}

impl ExpenseMap {
    pub fn get(&self, category: ExpenseCategory) -> f64 {
        match category {
            ExpenseCategory::Transportation => self.transportation,
            ExpenseCategory::Accommodation => self.accommodation,
            ExpenseCategory::Food => self.food,
            ExpenseCategory::Activities => self.activities,
            ExpenseCategory::Other => self.other,
        }
    }

    pub fn set(&mut self, category: ExpenseCategory, value: f64) {
        match category {
            ExpenseCategory::Transportation => self.transportation = value,
            ExpenseCategory::Accommodation => self.accommodation = value,
            ExpenseCategory::Food => self.food = value,
            ExpenseCategory::Activities => self.activities = value,
            ExpenseCategory::Other => self.other = value,
        }
    }
}

impl Default for ExpenseMap {
    fn default() -> Self {
        Self {
            transportation: ExpenseCategory::Transportation.default_share(),
            accommodation: ExpenseCategory::Accommodation.default_share(),
            food: ExpenseCategory::Food.default_share(),
            activities: ExpenseCategory::Activities.default_share(),
            other: ExpenseCategory::Other.default_share(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationDetails {
    pub attractions: Vec<String>,
    pub accommodation: PriceTiers,
    pub food: PriceTiers,
    pub best_time_to_visit: String,
    pub local_tips: String,
    pub expenses: ExpenseMap,
}
