pub mod dto;
pub mod error;
pub mod handlers;
pub mod interpreter;
pub mod query;
pub mod repo;
pub mod repo_types;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::command_routes()
}
