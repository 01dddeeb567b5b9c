/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public linkflow transport surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod transport;
pub mod types;

// Re-export commonly used types from http
pub use http::{ClientConfig, Endpoints, LinkflowClient, Result, TransportError};
pub use http::client::DEFAULT_BASE_URL;

pub use transport::Transport;

// Re-export all types
pub use types::*;
