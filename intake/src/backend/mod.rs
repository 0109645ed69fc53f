//! Remote recommendation-service backends.
//!
//! [`traits::ScheduleBackend`] is the abstraction the wizard flows talk to;
//! [`http::HttpBackend`] speaks to the real service, [`mock::MockBackend`]
//! is the configurable test double.

pub mod http;
pub mod mock;
pub mod traits;

pub use traits::{BackendError, ScheduleBackend};
