//! Background worker for remote listing operations.
//!
//! The engine posts [`WorkerMessage`]s through actions; the worker executes
//! them against the transport and answers with [`WorkerResponse`]s, which the
//! embedding shim feeds back into the engine as events.
//!
//! - `messages`: request/response protocol types with fetch sequence tokens
//! - `handler`: worker implementation, debounce and cancellation logic

pub mod handler;
pub mod messages;

pub use handler::MarketWorker;
pub use messages::{WorkerMessage, WorkerResponse};
