use std::sync::Arc;

use super::notice::Notice;

/// Destination for monitor notices.
///
/// Emission is infallible from the monitor's point of view: output is
/// observational and a failing sink must not stop event processing.
pub trait NoticeSink: Send + Sync {
    fn emit(&self, notice: &Notice);
}

/// Forwards every notice to each inner sink, in order.
#[derive(Clone, Default)]
pub struct FanOut {
    sinks: Vec<Arc<dyn NoticeSink>>,
}

impl FanOut {
    pub fn new(sinks: Vec<Arc<dyn NoticeSink>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn NoticeSink>) {
        self.sinks.push(sink);
    }
}

impl NoticeSink for FanOut {
    fn emit(&self, notice: &Notice) {
        for sink in &self.sinks {
            sink.emit(notice);
        }
    }
}
