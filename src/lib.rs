pub mod client;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod panel;

pub use error::{Error, Result};
