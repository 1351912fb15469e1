#![deny(missing_docs)]
//! Courier API contains the module traits and the basic types required
//! to define the api of those traits.
//!
//! A courier dispatcher accepts "fetch this url and call me back"
//! requests, runs them on a bounded number of workers through a
//! [fetch::Fetcher], and hands the results back to the controlling
//! context, which invokes the callbacks.
//!
//! If you want a working dispatcher, please see the courier_core crate.

/// Boxed future type.
pub type BoxFut<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

pub mod builder;
pub mod config;
pub mod doc;
pub mod dispatch;
pub mod fetch;

mod error;
pub use error::*;

pub mod request;
pub use request::RequestDescriptor;

pub mod response;
pub use response::{status, ResponseEnvelope};
