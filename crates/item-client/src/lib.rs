#![doc = include_str!("../README.md")]

mod classifier;
mod client;
mod error;
mod types;

pub use classifier::{canned_message, ExchangeResponse, ResponseClassifier};
pub use client::ItemClient;
pub use error::{ClassifiedFailure, ClassifyError, ClientError};
pub use types::*;
