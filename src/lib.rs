pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod store;

pub use config::{MapSettings, Settings};
pub use error::{ApiError, StoreError};
pub use store::MapStore;
