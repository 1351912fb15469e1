#![deny(missing_docs)]
//! Courier bounded request dispatch.
//!
//! Requests are submitted from any context, run by at most a configured
//! number of workers, and their callbacks are invoked back on the
//! controlling context that drives the dispatcher.

use courier_api::{builder::Builder, config::Config};

/// Construct a production-ready default builder.
///
/// - `fetcher` - The default fetcher is [factories::UreqFetcherFactory].
/// - `dispatch` - The default dispatch module is
///   [factories::CoreDispatchFactory].
pub fn default_builder() -> Builder {
    Builder {
        config: Config::default(),
        fetcher: factories::UreqFetcherFactory::create(),
        dispatch: factories::CoreDispatchFactory::create(),
    }
}

/// Construct a default builder for use in tests.
///
/// - `fetcher` - The default fetcher is [factories::MemFetcherFactory].
/// - `dispatch` - The default dispatch module is
///   [factories::CoreDispatchFactory].
pub fn default_test_builder() -> Builder {
    Builder {
        config: Config::default(),
        fetcher: factories::MemFetcherFactory::create(),
        dispatch: factories::CoreDispatchFactory::create(),
    }
}

pub mod factories;

pub mod doc;
