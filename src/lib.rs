#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;
pub use error::{Error, Result};
