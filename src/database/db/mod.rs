pub mod connection;
pub mod convert;
pub mod migrate;
pub mod queries;
