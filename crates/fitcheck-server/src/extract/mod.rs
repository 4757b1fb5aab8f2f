//! Enhanced HTTP request extractors with classified rejections.
//!
//! - [`Json`] - JSON deserialization whose rejections answer with the
//!   standard error body instead of axum's plain-text rejection.

mod enhanced_json;

pub use crate::extract::enhanced_json::Json;
