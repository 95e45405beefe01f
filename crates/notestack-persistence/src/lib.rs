pub mod serialization;
pub mod store;
pub mod traits;

pub use serialization::JsonSerializer;
pub use store::{AtomicWriter, JsonEnvelope, JsonFileStore, MemoryStore};
pub use traits::{PersistenceMetadata, Serializer, FORMAT_VERSION};
