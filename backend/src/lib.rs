//! HTTP side of the recipe generator: validates requests, calls the model and
//! relays its stream as recipe events.

pub mod config;
pub mod error;
pub mod generate;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
