// Track store - the durable list of songs the user has added
// One SQLite table, one column, unique paths, insertion order

pub mod store;

pub use store::TrackStore;
