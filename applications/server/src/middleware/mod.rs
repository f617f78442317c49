//! Middleware applied to every request
//!
//! Order, outermost first: correlation id, then request logging. Both wrap the
//! whole downstream stack, so their headers and log lines are produced for
//! error responses as well.

pub mod logging;
pub mod request_id;

pub use logging::{logging_middleware, PROCESS_TIME_HEADER};
pub use request_id::{request_id_middleware, RequestContext, RequestId, REQUEST_ID_HEADER};
