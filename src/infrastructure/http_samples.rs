// HTTP samples client - GET with query parameters, CSV payload
use crate::application::error::WidgetError;
use crate::application::samples_source::{SamplesQuery, SamplesSource};
use crate::domain::sample::Sample;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpSamplesSource {
    client: reqwest::Client,
    url: Url,
}

#[derive(Debug, Deserialize)]
struct SampleRow {
    date: String,
    value: String,
}

impl HttpSamplesSource {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, WidgetError> {
        let url = Url::parse(url).map_err(|e| WidgetError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url })
    }

    pub fn request_url(&self, query: &SamplesQuery) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .extend_pairs(query.pairs().iter().map(|(k, v)| (*k, v.as_str())));
        url
    }
}

#[async_trait]
impl SamplesSource for HttpSamplesSource {
    async fn fetch_samples(&self, query: &SamplesQuery) -> Result<Vec<Sample>, WidgetError> {
        let url = self.request_url(query);
        tracing::debug!(%url, "requesting samples");

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(WidgetError::Status {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        parse_samples_csv(&body)
    }
}

/// Parse a `date,value` table. Rows that do not parse are skipped.
pub fn parse_samples_csv(body: &str) -> Result<Vec<Sample>, WidgetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| WidgetError::Payload(e.to_string()))?;
    for column in ["date", "value"] {
        if !headers.iter().any(|h| h == column) {
            return Err(WidgetError::Payload(format!("missing column {column}")));
        }
    }

    let mut samples = Vec::new();
    let mut skipped = 0usize;
    for row in reader.deserialize::<SampleRow>() {
        match row.ok().and_then(|r| Sample::parse(&r.date, &r.value)) {
            Some(sample) => samples.push(sample),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, kept = samples.len(), "skipped malformed sample rows");
    }

    Ok(samples)
}
