//! State

use std::sync::Arc;

use orders_app::context::AppContext;

use crate::observability::{Metrics, RequestSettings};

/// Name and version reported by the health endpoint.
#[derive(Debug, Clone)]
pub(crate) struct ServiceInfo {
    pub(crate) name: String,
    pub(crate) version: String,
}

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) metrics: Arc<Metrics>,
    pub(crate) settings: RequestSettings,
    pub(crate) service: ServiceInfo,
}

impl State {
    #[must_use]
    pub(crate) fn new(
        app: AppContext,
        metrics: Arc<Metrics>,
        settings: RequestSettings,
        service: ServiceInfo,
    ) -> Self {
        Self {
            app,
            metrics,
            settings,
            service,
        }
    }

    #[must_use]
    pub(crate) fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
