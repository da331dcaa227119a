//! Small utility helpers used across modules.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;

/// Shared busy/idle signal.
///
/// Every in-flight network operation holds a [`BusyGuard`]; the flag reads
/// busy while at least one guard is alive. Embedding UIs poll `is_busy()` to
/// disable submit affordances while something is in flight.
#[derive(Clone, Default)]
pub struct BusyFlag(Arc<AtomicUsize>);

impl BusyFlag {
  pub fn new() -> Self {
    Self::default()
  }

  /// Mark one operation in flight. The flag clears when the guard drops,
  /// including on the error path of an awaited call.
  pub fn acquire(&self) -> BusyGuard {
    self.0.fetch_add(1, Ordering::SeqCst);
    BusyGuard(self.0.clone())
  }

  pub fn is_busy(&self) -> bool {
    self.0.load(Ordering::SeqCst) > 0
  }
}

pub struct BusyGuard(Arc<AtomicUsize>);

impl Drop for BusyGuard {
  fn drop(&mut self) {
    self.0.fetch_sub(1, Ordering::SeqCst);
  }
}

/// Calendar date as the backend expects it (YYYY-MM-DD).
pub fn wire_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

/// Human duration label in minutes for a challenge's fixed length in seconds.
/// Whole minutes render without a fraction ("5"), partial minutes with one
/// ("4.5"), matching what the duration input expects.
pub fn minutes_label(seconds: u32) -> String {
  if seconds % 60 == 0 {
    (seconds / 60).to_string()
  } else {
    format!("{}", f64::from(seconds) / 60.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn busy_flag_tracks_guards() {
    let busy = BusyFlag::new();
    assert!(!busy.is_busy());
    let g1 = busy.acquire();
    let g2 = busy.acquire();
    assert!(busy.is_busy());
    drop(g1);
    assert!(busy.is_busy());
    drop(g2);
    assert!(!busy.is_busy());
  }

  #[test]
  fn minutes_labels() {
    assert_eq!(minutes_label(300), "5");
    assert_eq!(minutes_label(270), "4.5");
    assert_eq!(minutes_label(60), "1");
  }

  #[test]
  fn wire_date_format() {
    let d = NaiveDate::from_ymd_opt(2017, 3, 9).unwrap();
    assert_eq!(wire_date(d), "2017-03-09");
  }
}
