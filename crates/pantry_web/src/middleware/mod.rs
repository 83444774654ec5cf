pub mod request_tracing;
pub mod session_gate;

pub use request_tracing::{request_tracing_middleware, REQUEST_ID_HEADER};
pub use session_gate::session_gate_middleware;
