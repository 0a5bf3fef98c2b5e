// Samples source port - the collaborator endpoint the widget fetches from
use crate::application::error::WidgetError;
use crate::domain::chart::ChartRequest;
use crate::domain::sample::Sample;
use async_trait::async_trait;

/// Query parameters of one samples request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplesQuery {
    /// Cache buster, epoch milliseconds.
    pub ts: i64,
    pub sample: String,
    pub resource: String,
    pub from: String,
    pub to: String,
}

impl SamplesQuery {
    pub fn new(ts: i64, request: &ChartRequest) -> Self {
        Self {
            ts,
            sample: request.meter.name.clone(),
            resource: request.resource.clone(),
            from: request.range.from_param(),
            to: request.range.to_param(),
        }
    }

    /// Pairs in the order they go on the wire.
    pub fn pairs(&self) -> [(&'static str, String); 5] {
        [
            ("ts", self.ts.to_string()),
            ("sample", self.sample.clone()),
            ("resource", self.resource.clone()),
            ("from", self.from.clone()),
            ("to", self.to.clone()),
        ]
    }
}

#[async_trait]
pub trait SamplesSource: Send + Sync {
    /// Fetch the samples of one meter/resource pair for the queried days.
    async fn fetch_samples(&self, query: &SamplesQuery) -> Result<Vec<Sample>, WidgetError>;
}
