#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod mock;
#[cfg(test)]
mod pipeline;

pub use mock::{MockBehavior, MockCompletionProvider, mock_assessor};
