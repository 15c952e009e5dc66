pub mod config;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod registry;
pub mod routes;
pub mod state;
pub mod token;
