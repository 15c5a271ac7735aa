//! camunda-client: transport to the engine REST API.
//!
//! [`EngineClient`] issues GET requests against `server/rest_prefix/path`,
//! applies basic auth, enforces a 5 second timeout, counts every response
//! by status code, and decodes `200` bodies as JSON. Anything else is a
//! [`ClientError`]; nothing is retried.
//!
//! The typed endpoint helpers in [`endpoints`] build the paths for each
//! resource the collectors read.

pub mod client;
pub mod endpoints;
pub mod error;

pub use client::{ClientConfig, EngineClient, HTTP_REQUESTS_TOTAL, REQUEST_TIMEOUT};
pub use error::{ClientError, ClientResult};
