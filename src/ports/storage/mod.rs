mod bucket;
mod object_store;

pub use bucket::{BucketError, BucketOperations};
pub use object_store::ObjectStore;
