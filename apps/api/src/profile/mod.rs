// Master profile persistence and history retrieval.
// Profile editing lives in the marketplace app; this service only reads
// profiles and appends to their resume history.

pub mod handlers;
pub mod store;

pub use store::{PgProfileStore, ProfileStore, ProfileStoreError};
