pub mod mongo;
pub mod mongo_store;
pub mod store;
