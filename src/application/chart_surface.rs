// Chart surface shared between the widget and its in-flight render tasks
use crate::domain::chart::ChartModel;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub ticket: u64,
    pub model: ChartModel,
    pub svg: String,
    pub sample_count: usize,
}

/// A dismissible message shown over the chart when a render fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub ticket: u64,
    pub message: String,
}

#[derive(Debug, Default)]
struct SurfaceState {
    chart: Option<Arc<RenderedChart>>,
    notice: Option<Notice>,
}

/// The single chart container. Every render is fenced by a ticket; only the most
/// recently issued ticket may change what is shown.
#[derive(Debug, Clone, Default)]
pub struct ChartSurface {
    state: Arc<Mutex<SurfaceState>>,
    issued: Arc<AtomicU64>,
}

impl ChartSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next ticket, superseding every render still in flight.
    pub fn issue_ticket(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn latest_ticket(&self) -> u64 {
        self.issued.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.latest_ticket() == ticket
    }

    /// Remove the chart and invalidate in-flight renders.
    pub fn clear(&self) {
        let ticket = self.issue_ticket();
        let mut state = self.lock();
        state.chart = None;
        state.notice = None;
        tracing::debug!(ticket, "chart surface cleared");
    }

    /// Replace the chart. Returns false, leaving the surface untouched, when the ticket is stale.
    pub fn commit(&self, chart: RenderedChart) -> bool {
        let mut state = self.lock();
        if !self.is_current(chart.ticket) {
            return false;
        }
        tracing::debug!(ticket = chart.ticket, samples = chart.sample_count, "chart committed");
        state.chart = Some(Arc::new(chart));
        state.notice = None;
        true
    }

    /// Raise a notice for a failed render. The previous chart stays visible.
    pub fn fail(&self, ticket: u64, message: String) -> bool {
        let mut state = self.lock();
        if !self.is_current(ticket) {
            return false;
        }
        state.notice = Some(Notice { ticket, message });
        true
    }

    pub fn dismiss_notice(&self) {
        self.lock().notice = None;
    }

    pub fn chart(&self) -> Option<Arc<RenderedChart>> {
        self.lock().chart.clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.lock().notice.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        // State stays consistent even if a holder panicked: every write is a single assignment.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
