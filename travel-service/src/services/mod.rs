pub mod extractor;
pub mod metrics;
pub mod model_resolver;
pub mod normalizer;
pub mod planner;
pub mod prompts;
pub mod providers;

pub use metrics::{get_metrics, init_metrics};
pub use model_resolver::{ModelResolver, ResolvedModel};
pub use planner::{DestinationQuery, TravelPlanner, TravelQuery};
