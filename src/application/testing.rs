// Test doubles for the widget's ports
use crate::application::chart_renderer::ChartRenderer;
use crate::application::clock::Clock;
use crate::application::error::WidgetError;
use crate::application::samples_source::{SamplesQuery, SamplesSource};
use crate::domain::chart::ChartModel;
use crate::domain::sample::Sample;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
struct CannedResponse {
    delay: Duration,
    result: Result<Vec<Sample>, u16>,
}

/// Answers per resource id; unknown resources get an empty sample set.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<HashMap<String, CannedResponse>>,
    queries: Mutex<Vec<SamplesQuery>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, resource: &str, samples: Vec<Sample>) {
        self.respond_after(resource, Duration::ZERO, samples);
    }

    pub fn respond_after(&self, resource: &str, delay: Duration, samples: Vec<Sample>) {
        self.responses.lock().unwrap().insert(
            resource.to_string(),
            CannedResponse {
                delay,
                result: Ok(samples),
            },
        );
    }

    pub fn fail_with_status(&self, resource: &str, status: u16) {
        self.responses.lock().unwrap().insert(
            resource.to_string(),
            CannedResponse {
                delay: Duration::ZERO,
                result: Err(status),
            },
        );
    }

    pub fn queries(&self) -> Vec<SamplesQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl SamplesSource for FakeSource {
    async fn fetch_samples(&self, query: &SamplesQuery) -> Result<Vec<Sample>, WidgetError> {
        self.queries.lock().unwrap().push(query.clone());
        let canned = self.responses.lock().unwrap().get(&query.resource).cloned();
        let Some(canned) = canned else {
            return Ok(Vec::new());
        };
        if !canned.delay.is_zero() {
            tokio::time::sleep(canned.delay).await;
        }
        canned.result.map_err(|status| WidgetError::Status { status })
    }
}

/// Emits the title only, so tests can tell charts apart.
pub struct TitleRenderer;

impl ChartRenderer for TitleRenderer {
    fn render(&self, model: &ChartModel) -> Result<String, WidgetError> {
        Ok(format!("<svg><text>{}</text></svg>", model.title))
    }
}

pub struct FixedClock {
    pub today: NaiveDate,
    pub now_millis: i64,
}

impl FixedClock {
    pub fn on(today: &str) -> Self {
        Self {
            today: NaiveDate::parse_from_str(today, "%Y-%m-%d").unwrap(),
            now_millis: 1_704_067_200_000,
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now_millis(&self) -> i64 {
        self.now_millis
    }
}
