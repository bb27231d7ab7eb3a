//! Assembles options, stores, sources and predictors from config and flags.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use ecu_compute::{
    CachedSource, DataSource, HttpDataSource, HttpPredictor, Predictor, StubPredictor,
    SyntheticGenerator, SyntheticSource, TelemetryAnalysisEngine,
};
use ecu_core::{Config, PanelOptions};
use ecu_rules::ThresholdStore;

use crate::cli::{Cli, OutputFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Synthetic,
    Http,
    CachedHttp,
}

pub struct AppContext {
    pub config: Config,
    pub format: OutputFormat,
    device: Option<String>,
}

impl AppContext {
    /// Flags win over the (profiled) environment.
    pub fn new(mut config: Config, cli: &Cli) -> Self {
        if cli.options.is_some() {
            config.store.options_file = cli.options.clone();
        }
        if cli.thresholds.is_some() {
            config.store.thresholds_file = cli.thresholds.clone();
        }
        Self {
            config,
            format: cli.format,
            device: cli.device.clone(),
        }
    }

    pub fn thresholds_path(&self) -> Option<&PathBuf> {
        self.config.store.thresholds_file.as_ref()
    }

    /// Options from file (or defaults) with the `--device` override, before
    /// threshold overrides.
    pub fn base_options(&self) -> Result<PanelOptions> {
        let options = match &self.config.store.options_file {
            Some(path) => {
                let opts = PanelOptions::load(path)
                    .with_context(|| format!("failed to load options from {}", path.display()))?;
                info!(path = %path.display(), "loaded panel options");
                opts
            }
            None => PanelOptions::default(),
        };
        Ok(match &self.device {
            Some(id) => options.with_device(id.clone()),
            None => options,
        })
    }

    /// The overrides store, loaded, if a file is configured.
    pub fn store(&self) -> Result<Option<ThresholdStore>> {
        let Some(path) = self.thresholds_path() else {
            return Ok(None);
        };
        let store = ThresholdStore::new(path.clone());
        store.load().with_context(|| {
            format!("failed to load threshold overrides from {}", path.display())
        })?;
        Ok(Some(store))
    }

    /// Base options with overrides applied.
    pub fn effective_options(&self) -> Result<(PanelOptions, Option<ThresholdStore>)> {
        let base = self.base_options()?;
        let store = self.store()?;
        let options = match &store {
            Some(s) => s.apply(&base),
            None => base,
        };
        Ok((options, store))
    }

    pub fn generator(seed: Option<u64>) -> SyntheticGenerator {
        match seed {
            Some(s) => SyntheticGenerator::seeded(s),
            None => SyntheticGenerator::from_entropy(),
        }
    }

    /// Which source [`source`](Self::source) builds for these options.
    pub fn source_kind(&self, options: &PanelOptions) -> SourceKind {
        match (&self.config.source.base_url, options.advanced.cache().enabled) {
            (None, _) => SourceKind::Synthetic,
            (Some(_), false) => SourceKind::Http,
            (Some(_), true) => SourceKind::CachedHttp,
        }
    }

    /// Live HTTP source when a base URL is configured, synthetic otherwise.
    /// Wrapped in a TTL cache when the options enable caching.
    pub fn source(
        &self,
        options: &PanelOptions,
        seed: Option<u64>,
    ) -> Result<Arc<dyn DataSource>> {
        let Some(base) = &self.config.source.base_url else {
            return Ok(Arc::new(SyntheticSource::new(Self::generator(seed))));
        };

        let timeout = Duration::from_secs(self.config.source.timeout_secs);
        let http = HttpDataSource::new(base, options.advanced.data_endpoint(), timeout)
            .context("invalid telemetry API URL")?;
        info!(url = %http.url(), "using live telemetry source");

        if self.source_kind(options) == SourceKind::CachedHttp {
            let ttl = options.advanced.cache().ttl;
            info!(ttl_secs = ttl, "caching telemetry responses");
            return Ok(Arc::new(CachedSource::new(
                Arc::new(http),
                Duration::from_secs(ttl),
            )));
        }
        Ok(Arc::new(http))
    }

    /// Full AI endpoint URL: the configured override, else the API base
    /// joined with the options' endpoint path. `None` means stub predictions.
    pub fn predictor_url(&self, options: &PanelOptions) -> Option<String> {
        match (&self.config.ai.endpoint_override, &self.config.source.base_url) {
            (Some(full), _) => Some(full.clone()),
            (None, Some(base)) => Some(format!(
                "{}{}",
                base.trim_end_matches('/'),
                options.effective_ai_endpoint()
            )),
            (None, None) => None,
        }
    }

    pub fn predictor(&self, options: &PanelOptions) -> Result<Arc<dyn Predictor>> {
        match self.predictor_url(options) {
            Some(url) => {
                let timeout = Duration::from_secs(self.config.source.timeout_secs);
                let predictor =
                    HttpPredictor::new(&url, timeout).context("invalid AI endpoint URL")?;
                info!(url = %predictor.url(), "using HTTP predictor");
                Ok(Arc::new(predictor))
            }
            None => Ok(Arc::new(StubPredictor)),
        }
    }

    pub fn engine(
        &self,
        options: PanelOptions,
        seed: Option<u64>,
    ) -> Result<TelemetryAnalysisEngine> {
        let source = self.source(&options, seed)?;
        let predictor = self.predictor(&options)?;
        Ok(
            TelemetryAnalysisEngine::new(Arc::new(options), source, predictor)
                .with_window_size(self.config.runner.window_size)
                .with_fallback(SyntheticSource::new(Self::generator(seed))),
        )
    }
}
