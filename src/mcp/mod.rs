pub mod server;
pub mod types;

pub use server::{Exit, McpServer};
