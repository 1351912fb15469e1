//! Builder-related types.

use crate::*;
use std::sync::Arc;

/// The general courier builder.
/// This contains both configuration and factory instances,
/// allowing construction of runtime module instances.
#[derive(Debug)]
pub struct Builder {
    /// The module configuration to be used when building modules.
    /// This can be loaded from disk or modified before freezing the builder.
    pub config: config::Config,

    /// The [fetch::FetcherFactory] to be used for creating
    /// [fetch::Fetcher] instances.
    pub fetcher: fetch::DynFetcherFactory,

    /// The [dispatch::DispatchFactory] to be used for creating
    /// [dispatch::Dispatch] instances.
    pub dispatch: dispatch::DynDispatchFactory,
}

impl Builder {
    /// Construct a default config given the configured module factories.
    /// Note, this should be called before freezing the Builder instance
    /// in an Arc<>.
    pub fn with_default_config(mut self) -> CourierResult<Self> {
        {
            let Self {
                config,
                fetcher,
                dispatch,
            } = &mut self;

            fetcher.default_config(config)?;
            dispatch.default_config(config)?;
        }

        Ok(self)
    }

    /// Construct the fetcher, then a dispatcher wrapping it.
    pub async fn build(self) -> CourierResult<dispatch::DynDispatch> {
        let builder = Arc::new(self);
        let fetcher = builder.fetcher.create(builder.clone()).await?;
        builder.dispatch.create(builder.clone(), fetcher).await
    }
}
