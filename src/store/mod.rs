// Backing-store access: the record model and the paginated REST client.

pub mod client;
pub mod record;

pub use client::{RestClient, StoreClient, StoreError};
pub use record::CartRecord;
