//! Client-side helpers: endpoint URLs and named, long-lived client handles.

pub mod endpoint;
pub mod sessions;

pub use endpoint::{Endpoint, EndpointError, Host};
pub use sessions::{DEFAULT_SESSION, Session, Sessions};
