mod repository;
pub mod schema;
pub mod seed;

pub use repository::{InsertReport, Repository};
