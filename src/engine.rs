//! Pipeline orchestration: dataset selection, parameter snapshots,
//! fetch/resolve/apply cycles, and staleness discarding.

use log::{debug, warn};

use crate::color::{ColorStrategy, LabelColorMap, RandomHex};
use crate::error::{ListError, LoadError};
use crate::feature::FeatureSet;
use crate::query::{AggregateClient, Label, QueryParams, synthetic_labels};
use crate::source::DatasetSource;
use crate::style::{Generation, Legend, RenderContext, StyledLayer, Synchronizer};

/// Result alias for fetch responses as delivered to the engine.
pub type FetchResult = Result<Vec<Label>, crate::error::QueryError>;

/// Binds a dataset source, an aggregate client, and a color strategy
/// into the full choropleth pipeline. Single-threaded and event-driven:
/// every operation runs to completion, and overlapping network requests
/// are reconciled through generation tokens — last request wins, stale
/// responses are discarded.
pub struct Engine {
    source: Box<dyn DatasetSource>,
    client: Box<dyn AggregateClient>,
    strategy: Box<dyn ColorStrategy>,
    params: QueryParams,
    sync: Synchronizer,
    ctx: RenderContext,
    /// `Some(n)`: substitute `n` synthetic labels when a fetch fails.
    fallback: Option<usize>,
}

impl Engine {
    pub fn new(source: Box<dyn DatasetSource>, client: Box<dyn AggregateClient>) -> Self {
        Self {
            source,
            client,
            strategy: Box::new(RandomHex::new()),
            params: QueryParams::default(),
            sync: Synchronizer::new(),
            ctx: RenderContext::new(),
            fallback: None,
        }
    }

    /// Replace the default random-hex coloring.
    pub fn with_strategy(mut self, strategy: Box<dyn ColorStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Enable the dev-mode synthetic fallback with `count` labels.
    pub fn with_synthetic_fallback(mut self, count: usize) -> Self {
        self.fallback = Some(count);
        self
    }

    /// Property keys appended to each feature tooltip.
    pub fn with_tooltip_fields(mut self, fields: Vec<String>) -> Self {
        self.sync = Synchronizer::with_tooltip_fields(fields);
        self
    }

    #[inline]
    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Current query configuration, for explicit user edits.
    #[inline]
    pub fn params_mut(&mut self) -> &mut QueryParams {
        &mut self.params
    }

    #[inline]
    pub fn layer(&self) -> Option<&StyledLayer> {
        self.ctx.layer()
    }

    #[inline]
    pub fn legend(&self) -> &Legend {
        self.ctx.legend()
    }

    /// Dataset names offered by the source.
    pub fn list_datasets(&self) -> Result<Vec<String>, ListError> {
        self.source.list()
    }

    /// Begin switching to dataset `name`. The current layer is detached
    /// first so two layers never render at once, and every outstanding
    /// load or fetch response is invalidated.
    pub fn begin_select(&mut self, name: &str) -> Generation {
        self.params.file_name = name.to_string();
        self.ctx.detach()
    }

    /// Deliver a load response. Stale responses are discarded; failures
    /// are logged and leave the (detached) state as is.
    pub fn complete_load(
        &mut self,
        token: Generation,
        result: Result<FeatureSet, LoadError>,
    ) -> bool {
        if !self.ctx.load_is_current(token) {
            debug!("discarding stale load response");
            return false;
        }
        match result {
            Ok(features) => {
                debug!("attaching {} features from {}", features.len(), features.name());
                self.sync.attach(&mut self.ctx, features);
                true
            }
            Err(err) => {
                warn!("dataset load failed: {err}");
                false
            }
        }
    }

    /// Blocking convenience: select `name` and load it in one step.
    pub fn select(&mut self, name: &str) -> Result<(), LoadError> {
        let token = self.begin_select(name);
        let features = FeatureSet::load(self.source.as_ref(), name)?;
        self.complete_load(token, Ok(features));
        Ok(())
    }

    /// Begin a fetch against the current parameter snapshot.
    pub fn begin_fetch(&mut self) -> (Generation, QueryParams) {
        (self.ctx.begin_fetch(), self.params.clone())
    }

    /// Deliver a fetch response: resolve colors and restyle the layer.
    /// Stale responses are discarded. On failure the synthetic fallback
    /// applies if enabled; otherwise the last good state stays in
    /// place. Returns whether styling was applied.
    pub fn complete_fetch(&mut self, token: Generation, result: FetchResult) -> bool {
        if !self.ctx.fetch_is_current(token) {
            debug!("discarding stale fetch response");
            return false;
        }

        let labels = match result {
            Ok(labels) => labels,
            Err(err) => {
                warn!("aggregate fetch failed: {err}");
                match self.fallback {
                    Some(count) => synthetic_labels(&mut rand::rng(), count),
                    None => return false,
                }
            }
        };

        let colors = LabelColorMap::resolve(&labels, self.strategy.as_mut());
        if let Err(err) = self.sync.apply(&mut self.ctx, &labels, &colors) {
            warn!("styling skipped: {err}");
            return false;
        }
        true
    }

    /// Blocking convenience: fetch with the current snapshot and apply
    /// the response. Returns whether styling was applied.
    pub fn fetch(&mut self) -> bool {
        let (token, params) = self.begin_fetch();
        let result = self.client.fetch(&params);
        self.complete_fetch(token, result)
    }

    /// Highlight the clicked feature, clearing any prior highlight.
    pub fn click(&mut self, index: usize) -> Result<(), crate::error::StyleError> {
        self.sync.click(&mut self.ctx, index)
    }
}
