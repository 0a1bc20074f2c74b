pub mod in_memory_registration_store;
pub mod sqlx_registration_store;

pub use in_memory_registration_store::{InMemoryRegistrationStore, StoreOperation};
pub use sqlx_registration_store::SqlxRegistrationStore;
