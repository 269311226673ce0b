pub mod app;
pub mod database;
pub mod overlay;
pub mod pipeline;
pub mod sensor;
pub mod sim;
pub mod sink;
pub mod types;
