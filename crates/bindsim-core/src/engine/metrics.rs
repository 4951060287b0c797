use crate::core::models::system::{BoundCounts, ParticleSystem};
use serde::Serialize;

/// Number of trailing samples shown by a live chart.
pub const CHART_WINDOW: usize = 500;
/// Frame rate used to convert tick indices into seconds for plotting.
pub const FRAMES_PER_SECOND: f64 = 60.0;

/// One row of the bound-count time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSample {
    pub tick: usize,
    pub normal_bound: usize,
    pub competitor_bound: usize,
}

/// A contiguous slice of the series starting at `start_tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsWindow<'a> {
    pub start_tick: usize,
    pub normal_bound: &'a [usize],
    pub competitor_bound: &'a [usize],
}

/// Append-only per-tick bound counts, one entry per advanced tick.
///
/// Both sequences always have the same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSeries {
    normal_bound: Vec<usize>,
    competitor_bound: Vec<usize>,
}

impl MetricsSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.normal_bound.len()
    }

    pub fn is_empty(&self) -> bool {
        self.normal_bound.is_empty()
    }

    pub fn normal_bound(&self) -> &[usize] {
        &self.normal_bound
    }

    pub fn competitor_bound(&self) -> &[usize] {
        &self.competitor_bound
    }

    pub fn last(&self) -> Option<MetricsSample> {
        self.len().checked_sub(1).and_then(|tick| self.sample(tick))
    }

    pub fn sample(&self, tick: usize) -> Option<MetricsSample> {
        Some(MetricsSample {
            tick,
            normal_bound: *self.normal_bound.get(tick)?,
            competitor_bound: *self.competitor_bound.get(tick)?,
        })
    }

    pub fn samples(&self) -> impl Iterator<Item = MetricsSample> + '_ {
        self.normal_bound
            .iter()
            .zip(&self.competitor_bound)
            .enumerate()
            .map(|(tick, (&normal_bound, &competitor_bound))| MetricsSample {
                tick,
                normal_bound,
                competitor_bound,
            })
    }

    /// The last `n` samples, or all of them if fewer were recorded.
    pub fn tail(&self, n: usize) -> MetricsWindow<'_> {
        let start_tick = self.len().saturating_sub(n);
        MetricsWindow {
            start_tick,
            normal_bound: &self.normal_bound[start_tick..],
            competitor_bound: &self.competitor_bound[start_tick..],
        }
    }

    /// Tick indices converted to seconds at the given frame rate.
    pub fn time_axis(&self, fps: f64) -> Vec<f64> {
        (0..self.len()).map(|tick| tick as f64 / fps).collect()
    }

    /// Mean bound counts `(normal, competitor)` over the last `window` samples.
    ///
    /// Returns `None` when nothing has been recorded or `window` is zero.
    pub fn mean_occupancy(&self, window: usize) -> Option<(f64, f64)> {
        let tail = self.tail(window);
        let n = tail.normal_bound.len();
        if n == 0 {
            return None;
        }
        let mean = |values: &[usize]| values.iter().sum::<usize>() as f64 / n as f64;
        Some((mean(tail.normal_bound), mean(tail.competitor_bound)))
    }

    fn push(&mut self, counts: BoundCounts) -> usize {
        self.normal_bound.push(counts.normal);
        self.competitor_bound.push(counts.competitor);
        self.len() - 1
    }

    fn clear(&mut self) {
        self.normal_bound.clear();
        self.competitor_bound.clear();
    }
}

/// Samples the bound counts of a particle system once per tick.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    series: MetricsSeries,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts occupied proteins per ligand species and appends the result.
    pub fn record(&mut self, system: &ParticleSystem) -> MetricsSample {
        let counts = system.bound_counts();
        let tick = self.series.push(counts);
        MetricsSample {
            tick,
            normal_bound: counts.normal,
            competitor_bound: counts.competitor,
        }
    }

    pub fn series(&self) -> &MetricsSeries {
        &self.series
    }

    pub fn reset(&mut self) {
        self.series.clear();
    }
}
