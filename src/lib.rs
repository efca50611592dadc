pub mod auth;
pub mod engine;
pub mod holidays;
pub mod limits;
pub mod model;
pub mod observability;
pub mod sql;
pub mod tls;
pub mod wire;
