pub mod collector;
pub mod common;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod flow_generator;
pub mod mysql;
pub mod utils;

pub use config::{Config, SortKey};
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
