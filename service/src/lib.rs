//! SuggestTask HTTP service.
//!
//! `POST /suggestTask` validates the request, classifies the utterance, then
//! calls the simulated downstream dependency under a retry policy:
//!
//! - 200 `{"task", "timestamp"}` when the dependency answered
//! - 503 `{"error", "attempts"}` when every attempt failed
//! - 400 on malformed JSON, missing fields, a bad timestamp, or a bad
//!   `X-Failure-Probability` header

pub mod config;
pub mod error;
pub mod observe;
pub mod request;
pub mod server;
pub mod state;

pub use config::{DependencyConfig, RetryConfig, ServiceConfig};
pub use error::{ApiError, Error, Result};
pub use observe::TracingObserver;
pub use request::{SuggestTaskRequest, SuggestTaskResponse, ValidRequest, ValidationErrors};
pub use server::{parse_addr, router, serve, FAILURE_PROBABILITY_HEADER};
pub use state::{AppState, RngSource};
