pub mod cli;
pub mod config;
pub mod router;
pub mod server;
pub mod stats;
