pub mod gateway;
pub mod log;
pub mod queries;
pub mod schema;
pub mod stats;
