//! Shared application state

use casebrief_classifiers::RuleEngines;
use casebrief_core::RecordSink;
use casebrief_store::open_store;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::info;

use crate::config::ServerConfig;

/// State handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn RecordSink>,
    pub engines: RuleEngines,

    /// Present when a Prometheus recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(sink: Arc<dyn RecordSink>, engines: RuleEngines) -> Self {
        Self {
            sink,
            engines,
            metrics: None,
        }
    }

    /// Open the configured store and compile the configured rules
    pub fn from_config(config: &ServerConfig) -> casebrief_core::Result<Self> {
        let engines = RuleEngines::from_config(&config.rules()?)?;
        info!(?engines, "Rule engines ready");

        let sink = open_store(&config.store)?;
        Ok(Self::new(sink, engines))
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}
