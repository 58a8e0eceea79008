//! SellAuth API port: result shape, upstream models, and the gateway trait.

pub mod models;
pub mod port;
pub mod result;

pub use models::*;
pub use port::{require_id, CommerceApi};
pub use result::{ApiFailure, ApiResult, FailureKind};
