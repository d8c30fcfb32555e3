pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use error::{PipelineError, Stage, TravelError};
pub use startup::{router, AppState, Application};
