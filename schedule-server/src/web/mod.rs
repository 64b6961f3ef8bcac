//! Web layer for the schedule service.
//!
//! JSON endpoints for the station catalog, route search, carriers and
//! threads.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
