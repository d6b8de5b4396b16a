pub mod cli;
pub mod config;
pub mod db;
pub mod embed;
pub mod error;
pub mod search;
mod server;
pub mod store;
pub mod utils;

pub use config::Opts;
pub use error::{Error, Result};
pub use store::{ImageStore, ImageStoreBuilder};
