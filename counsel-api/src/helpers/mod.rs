pub mod database;
pub mod serialization;
