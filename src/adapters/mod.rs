// Adapters layer: concrete implementations of the domain ports (http, storage, in-memory)

pub mod http;
pub mod memory;
pub mod storage;

pub use http::HttpContentProvider;
pub use memory::InMemoryContentStore;
pub use storage::LocalStorage;
