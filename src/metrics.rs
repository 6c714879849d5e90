//! Engine-agnostic metrics collection for milling statistics.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use millvox::metrics::{MillMetrics, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Record timings around cut execution:
//! metrics.record_cut_timing(timing_us);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Rolling window for storing recent values (e.g., timing history).
#[derive(Debug, Clone)]
pub struct RollingWindow {
  buffer: VecDeque<u64>,
  capacity: usize,
}

impl RollingWindow {
  /// Create a new rolling window with the given capacity.
  pub fn new(capacity: usize) -> Self {
    Self {
      buffer: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Push a new value, evicting the oldest if at capacity.
  pub fn push(&mut self, value: u64) {
    if self.buffer.len() >= self.capacity {
      self.buffer.pop_front();
    }
    self.buffer.push_back(value);
  }

  pub fn len(&self) -> usize {
    self.buffer.len()
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
  }

  /// Most recent value, if any.
  pub fn last(&self) -> Option<u64> {
    self.buffer.back().copied()
  }

  /// Mean over the window, 0 when empty.
  pub fn mean(&self) -> f64 {
    if self.buffer.is_empty() {
      return 0.0;
    }
    self.buffer.iter().sum::<u64>() as f64 / self.buffer.len() as f64
  }
}

/// Per-simulation milling statistics.
#[derive(Debug, Clone)]
pub struct MillMetrics {
  /// Microseconds per executed cutting command.
  pub cut_timings_us: RollingWindow,
  /// Microseconds per surface extraction.
  pub extract_timings_us: RollingWindow,
  /// Total cutting commands executed (rapids excluded).
  pub cuts_executed: u64,
  /// Total commands executed, rapids included.
  pub commands_executed: u64,
}

impl Default for MillMetrics {
  fn default() -> Self {
    Self {
      cut_timings_us: RollingWindow::new(120),
      extract_timings_us: RollingWindow::new(32),
      cuts_executed: 0,
      commands_executed: 0,
    }
  }
}

impl MillMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_cut_timing(&mut self, timing_us: u64) {
    self.cuts_executed += 1;
    if is_enabled() {
      self.cut_timings_us.push(timing_us);
    }
  }

  pub fn record_extract_timing(&mut self, timing_us: u64) {
    if is_enabled() {
      self.extract_timings_us.push(timing_us);
    }
  }

  pub fn clear(&mut self) {
    self.cut_timings_us.clear();
    self.extract_timings_us.clear();
    self.cuts_executed = 0;
    self.commands_executed = 0;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rolling_window_evicts_oldest() {
    let mut window = RollingWindow::new(3);
    for value in [1, 2, 3, 4] {
      window.push(value);
    }
    assert_eq!(window.len(), 3);
    assert_eq!(window.last(), Some(4));
    assert_eq!(window.mean(), 3.0);
  }

  #[test]
  fn empty_window_mean_is_zero() {
    let window = RollingWindow::new(4);
    assert!(window.is_empty());
    assert_eq!(window.mean(), 0.0);
  }
}
