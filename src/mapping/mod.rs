pub mod config;
pub mod execute;
pub mod host;
pub mod schema;
pub mod value;
