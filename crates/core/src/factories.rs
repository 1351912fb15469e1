//! Factories for generating instances of courier modules.

pub mod core_dispatch;
pub use core_dispatch::{spawn_driver, CoreDispatch, CoreDispatchFactory};

pub mod ureq_fetcher;
pub use ureq_fetcher::{UreqFetcher, UreqFetcherFactory};

mod mem_fetcher;
pub use mem_fetcher::*;
