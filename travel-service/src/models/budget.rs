//! Travel budgets and the reference currency table.

use crate::error::TravelError;

/// A supported budget currency with its reference rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Currency {
    pub code: &'static str,
    pub symbol: &'static str,
    /// Units of this currency per 1 USD.
    pub rate: f64,
}

/// Fixed reference rates; these are not live market rates.
pub const CURRENCIES: &[Currency] = &[
    Currency { code: "USD", symbol: "$", rate: 1.0 },
    Currency { code: "EUR", symbol: "€", rate: 0.92 },
    Currency { code: "GBP", symbol: "£", rate: 0.78 },
    Currency { code: "JPY", symbol: "¥", rate: 150.14 },
    Currency { code: "INR", symbol: "₹", rate: 83.51 },
    Currency { code: "CAD", symbol: "C$", rate: 1.37 },
    Currency { code: "AUD", symbol: "A$", rate: 1.52 },
];

impl Currency {
    /// Look up by ISO code (case-insensitive) or exact symbol.
    pub fn find(code_or_symbol: &str) -> Option<&'static Currency> {
        let needle = code_or_symbol.trim();
        CURRENCIES
            .iter()
            .find(|c| c.code.eq_ignore_ascii_case(needle) || c.symbol == needle)
    }
}

/// Budget as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Budget {
    Usd(f64),
    Foreign { amount: f64, code: String },
}

impl Budget {
    /// Resolve to a positive USD amount.
    pub fn to_usd(&self) -> Result<f64, TravelError> {
        let usd = match self {
            Budget::Usd(amount) => *amount,
            Budget::Foreign { amount, code } => {
                let currency = Currency::find(code).ok_or_else(|| {
                    TravelError::Validation(format!("unsupported budget currency '{}'", code))
                })?;
                amount / currency.rate
            }
        };

        if !usd.is_finite() || usd <= 0.0 {
            return Err(TravelError::Validation(
                "budget must be a positive number".to_string(),
            ));
        }

        Ok(usd)
    }
}
