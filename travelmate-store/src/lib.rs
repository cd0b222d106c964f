pub mod app_config;
pub mod kv;
pub mod snapshot;
pub mod trip_store;
pub mod users;

pub use app_config::Config;
pub use kv::{FileStore, KvStore, KvStoreExt, MemoryStore, StoreError, StoreResult};
pub use snapshot::TripSnapshot;
pub use trip_store::TripStore;
pub use users::{FileUserStore, MemoryUserStore, Role, UserRecord, UserStore};
