// Chart widget - selection state, paired date pickers and fenced renders
use crate::application::chart_renderer::ChartRenderer;
use crate::application::chart_surface::{ChartSurface, Notice, RenderedChart};
use crate::application::clock::Clock;
use crate::application::error::WidgetError;
use crate::application::samples_source::{SamplesQuery, SamplesSource};
use crate::domain::chart::{ChartModel, ChartRequest};
use crate::domain::date_picker::{DatePickerPair, Focus, PickerEffect, PickerState};
use crate::domain::date_range::DateRange;
use crate::domain::meter::{find_meter, meter_names, resource_options, MeterDescriptor};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinHandle;

pub type RenderHandle = JoinHandle<RenderOutcome>;

/// User input the host forwards to the widget.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum WidgetEvent {
    MeterSelected(String),
    ResourceSelected(String),
    FromPickerOpened,
    ToPickerOpened,
    FromDatePicked(NaiveDate),
    ToDatePicked(NaiveDate),
    DisplayChart,
    /// Days back from today; `None` is the shortcut selector's blank entry.
    DateRangeShortcut(Option<u32>),
    DismissNotice,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Drawn { ticket: u64, samples: usize },
    /// A newer render was issued before this one finished.
    Stale { ticket: u64 },
    Failed { ticket: u64, message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct WidgetSnapshot {
    pub meters: Vec<String>,
    pub meter: Option<String>,
    pub resource_options: Vec<String>,
    pub resource: Option<String>,
    pub range: DateRange,
    pub from_picker: PickerState,
    pub to_picker: PickerState,
    pub focus: Focus,
    pub notice: Option<Notice>,
    pub chart_title: Option<String>,
}

pub struct ChartWidget {
    meters: Vec<MeterDescriptor>,
    meter: Option<String>,
    resource_options: Vec<String>,
    resource: Option<String>,
    pickers: DatePickerPair,
    default_days: u32,
    source: Arc<dyn SamplesSource>,
    renderer: Arc<dyn ChartRenderer>,
    clock: Arc<dyn Clock>,
    surface: ChartSurface,
}

impl ChartWidget {
    pub fn new(
        source: Arc<dyn SamplesSource>,
        renderer: Arc<dyn ChartRenderer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let pickers = DatePickerPair::new(DateRange::ending_on(clock.today(), 1));
        Self {
            meters: Vec::new(),
            meter: None,
            resource_options: Vec::new(),
            resource: None,
            pickers,
            default_days: 1,
            source,
            renderer,
            clock,
            surface: ChartSurface::new(),
        }
    }

    /// Span of the range set by `initialize`.
    pub fn with_default_days(mut self, days: u32) -> Self {
        self.default_days = days;
        self
    }

    /// Record the descriptors, reset the range, select the first meter and draw.
    pub fn initialize(&mut self, meters: Vec<MeterDescriptor>) -> Option<RenderHandle> {
        tracing::info!(meters = meters.len(), "initializing chart widget");
        self.meters = meters;
        self.pickers = DatePickerPair::new(self.pickers.range());
        self.refresh_date_range(self.default_days);
        self.meter = self.meters.first().map(|d| d.name.clone());
        self.populate_resource_options();
        self.render()
    }

    /// Offer the resources of the selected meter, in descriptor order, and select the first.
    pub fn populate_resource_options(&mut self) {
        self.resource_options = match &self.meter {
            Some(meter) if !self.meters.is_empty() => resource_options(&self.meters, meter),
            _ => Vec::new(),
        };
        self.resource = self.resource_options.first().cloned();
        tracing::debug!(
            meter = ?self.meter,
            options = self.resource_options.len(),
            "resource options replaced"
        );
    }

    /// `to = today`, `from = today - days_back`. Does not render.
    pub fn refresh_date_range(&mut self, days_back: u32) {
        self.pickers
            .set_range(DateRange::ending_on(self.clock.today(), days_back));
    }

    /// The current selection, or `None` when meter or resource is unset.
    pub fn chart_request(&self) -> Option<ChartRequest> {
        let meter_name = self.meter.as_deref()?;
        let resource = self.resource.as_deref()?;
        let meter = self
            .meters
            .iter()
            .find(|d| d.name == meter_name && d.resource_id == resource)
            .or_else(|| find_meter(&self.meters, meter_name))?
            .clone();
        Some(ChartRequest {
            meter,
            resource: resource.to_string(),
            range: self.pickers.range(),
        })
    }

    /// Issue a ticket for the current selection. With nothing selected the chart is
    /// cleared and no job is returned.
    pub fn prepare_render(&mut self) -> Option<RenderJob> {
        let Some(request) = self.chart_request() else {
            tracing::debug!("meter or resource unset, clearing chart");
            self.surface.clear();
            return None;
        };
        let ticket = self.surface.issue_ticket();
        let query = SamplesQuery::new(self.clock.now_millis(), &request);
        Some(RenderJob {
            ticket,
            request,
            query,
            source: self.source.clone(),
            renderer: self.renderer.clone(),
            surface: self.surface.clone(),
        })
    }

    /// Start a render task for the current selection.
    pub fn render(&mut self) -> Option<RenderHandle> {
        self.prepare_render().map(|job| tokio::spawn(job.run()))
    }

    pub fn handle(&mut self, event: WidgetEvent) -> Result<Option<RenderHandle>, WidgetError> {
        tracing::debug!(?event, "widget event");
        match event {
            WidgetEvent::MeterSelected(name) => {
                self.meter = non_empty(name);
                self.populate_resource_options();
                Ok(self.render())
            }
            WidgetEvent::ResourceSelected(id) => match non_empty(id) {
                Some(id) if !self.resource_options.contains(&id) => {
                    Err(WidgetError::UnknownResource {
                        meter: self.meter.clone().unwrap_or_default(),
                        resource: id,
                    })
                }
                resource => {
                    self.resource = resource;
                    Ok(self.render())
                }
            },
            WidgetEvent::FromPickerOpened => {
                self.pickers.open_from();
                Ok(None)
            }
            WidgetEvent::ToPickerOpened => {
                self.pickers.open_to();
                Ok(None)
            }
            WidgetEvent::FromDatePicked(date) => {
                self.pickers.pick_from(date);
                Ok(None)
            }
            WidgetEvent::ToDatePicked(date) => match self.pickers.pick_to(date)? {
                PickerEffect::Render => Ok(self.render()),
                PickerEffect::Nothing => Ok(None),
            },
            WidgetEvent::DisplayChart => Ok(self.render()),
            WidgetEvent::DateRangeShortcut(Some(days)) => {
                self.refresh_date_range(days);
                Ok(self.render())
            }
            WidgetEvent::DateRangeShortcut(None) => Ok(None),
            WidgetEvent::DismissNotice => {
                self.surface.dismiss_notice();
                Ok(None)
            }
        }
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            meters: meter_names(&self.meters),
            meter: self.meter.clone(),
            resource_options: self.resource_options.clone(),
            resource: self.resource.clone(),
            range: self.pickers.range(),
            from_picker: self.pickers.from_picker(),
            to_picker: self.pickers.to_picker(),
            focus: self.pickers.focus(),
            notice: self.surface.notice(),
            chart_title: self.surface.chart().map(|c| c.model.title.clone()),
        }
    }

    pub fn meters(&self) -> &[MeterDescriptor] {
        &self.meters
    }

    pub fn resource_options(&self) -> &[String] {
        &self.resource_options
    }

    pub fn pickers(&self) -> &DatePickerPair {
        &self.pickers
    }

    pub fn surface(&self) -> &ChartSurface {
        &self.surface
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// One fetch-and-draw, detached from the widget so it can run as its own task.
pub struct RenderJob {
    ticket: u64,
    request: ChartRequest,
    query: SamplesQuery,
    source: Arc<dyn SamplesSource>,
    renderer: Arc<dyn ChartRenderer>,
    surface: ChartSurface,
}

impl RenderJob {
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    pub async fn run(self) -> RenderOutcome {
        let ticket = self.ticket;
        tracing::debug!(
            ticket,
            meter = %self.query.sample,
            resource = %self.query.resource,
            "fetching samples"
        );

        let samples = match self.source.fetch_samples(&self.query).await {
            Ok(samples) => samples,
            Err(e) => return self.fail(e),
        };

        if !self.surface.is_current(ticket) {
            tracing::warn!(ticket, "discarding samples of a superseded render");
            return RenderOutcome::Stale { ticket };
        }

        let model = ChartModel::build(&self.request, &samples);
        let svg = match self.renderer.render(&model) {
            Ok(svg) => svg,
            Err(e) => return self.fail(e),
        };

        let sample_count = samples.len();
        let committed = self.surface.commit(RenderedChart {
            ticket,
            model,
            svg,
            sample_count,
        });
        if committed {
            tracing::info!(ticket, samples = sample_count, "chart drawn");
            RenderOutcome::Drawn {
                ticket,
                samples: sample_count,
            }
        } else {
            tracing::warn!(ticket, "discarding chart of a superseded render");
            RenderOutcome::Stale { ticket }
        }
    }

    fn fail(&self, error: WidgetError) -> RenderOutcome {
        let ticket = self.ticket;
        let message = error.to_string();
        if self.surface.fail(ticket, message.clone()) {
            tracing::error!(ticket, error = %message, "chart render failed");
            RenderOutcome::Failed { ticket, message }
        } else {
            tracing::warn!(ticket, error = %message, "superseded render failed");
            RenderOutcome::Stale { ticket }
        }
    }
}
