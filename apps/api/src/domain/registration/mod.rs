pub mod entity;
pub mod errors;
pub mod members;
pub mod repository;
pub mod schema;
pub mod uniqueness;
pub mod value_objects;
