mod config;
mod error;
mod listener;
mod service;


pub use config::*;
pub use error::*;
pub use listener::*;
pub use service::*;
