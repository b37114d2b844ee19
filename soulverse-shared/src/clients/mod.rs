pub mod store;
pub mod mongo;
pub mod memory;

pub use store::{decode, encode, DocumentStore, StoreError, UpdateOutcome};
pub use mongo::MongoStore;
pub use memory::MemoryStore;
