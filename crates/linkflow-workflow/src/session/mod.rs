/*
[INPUT]:  Session credentials produced by login
[OUTPUT]: A single durable session slot readable at process start
[POS]:    Session layer - storage contract and implementations
[UPDATE]: When the slot format or storage backends change
*/

pub mod file;
pub mod store;

pub use file::{FileSessionStore, default_session_path};
pub use store::{MemorySessionStore, Session, SessionStore, StoreError};
