pub mod components;
pub mod config;
pub mod error;
pub mod mcp;
pub mod shutdown;
pub mod startup;
