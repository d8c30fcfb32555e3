pub mod budget;
pub mod destination;
pub mod details;

pub use budget::{Budget, Currency};
pub use destination::{CostEntry, Destination, Transport};
pub use details::{DestinationDetails, ExpenseCategory, ExpenseMap, PriceTiers};
