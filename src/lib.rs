pub mod access;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;

pub use routes::create_app;
pub use state::AppState;
