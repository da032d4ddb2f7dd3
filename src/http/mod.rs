//! RPC protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (loopback)
//!     → server.rs (Axum setup, routes)
//!     → request.rs (request ID)
//!     → provider::dispatch
//!     → JSON response
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, RpcServer};
