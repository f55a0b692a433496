pub mod client;
pub mod config;
pub mod error;
pub mod harness;
pub mod linalg;
pub mod logging;
pub mod math;
pub mod numeric;
pub mod optimize;
pub mod server;
