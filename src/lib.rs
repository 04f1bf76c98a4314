pub mod api;
pub mod config;
pub mod models;
pub mod utils;

pub use api::*;
pub use config::Config;
pub use models::*;
pub use utils::*;
