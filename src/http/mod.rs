//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID, tracing span)
//!     → handlers.rs (block number, submission, health)
//!     → docs.rs (OpenAPI + Swagger UI)
//!     → Send to client
//! ```

pub mod docs;
pub mod handlers;
pub mod request;
pub mod server;
pub mod tls;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
