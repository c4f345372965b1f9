pub mod alias;
pub mod config;
pub mod loader;
pub mod paths;
pub mod store;
