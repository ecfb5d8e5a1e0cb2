pub mod client;
pub mod config_manager;
pub mod error;
pub mod handlers;
pub mod languages;
pub mod llm;
pub mod routes;
pub mod state;
pub mod translate;
