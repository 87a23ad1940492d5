//! Thin wrapper around `prometheus`, in the shape the rest of the workspace expects: a
//! `try_create_*` constructor per metric kind (returning `Result` so a registration clash degrades
//! to a no-op metric instead of a panic) and a timer guard for histograms.

pub use prometheus::{
    Histogram, HistogramTimer, IntCounter, IntGauge, Result,
};

use prometheus::{HistogramOpts, Opts};

pub fn try_create_int_gauge(name: &str, help: &str) -> Result<IntGauge> {
    let gauge = IntGauge::with_opts(Opts::new(name, help))?;
    prometheus::register(Box::new(gauge.clone()))?;
    Ok(gauge)
}

pub fn try_create_int_counter(name: &str, help: &str) -> Result<IntCounter> {
    let counter = IntCounter::with_opts(Opts::new(name, help))?;
    prometheus::register(Box::new(counter.clone()))?;
    Ok(counter)
}

pub fn try_create_histogram(name: &str, help: &str) -> Result<Histogram> {
    let histogram = Histogram::with_opts(HistogramOpts::new(name, help))?;
    prometheus::register(Box::new(histogram.clone()))?;
    Ok(histogram)
}

/// Starts a timer for a fallible histogram handle, matching the `&metrics::SOME_HISTOGRAM` call
/// sites throughout `state_processing`. Falls through silently when the metric failed to register.
pub fn start_timer(histogram: &Result<Histogram>) -> Option<HistogramTimer> {
    histogram.as_ref().ok().map(|h| h.start_timer())
}

/// Increments a fallible counter handle by one. Falls through silently when the metric failed to
/// register, same as `start_timer`.
pub fn inc_counter(counter: &Result<IntCounter>) {
    if let Ok(counter) = counter.as_ref() {
        counter.inc();
    }
}
