//! Blink Controller
//!
//! Blinking text and cursors show for `show_ms`, then hide for `hide_ms`.
//! The ticker wakes often enough to land on every phase boundary.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::trace;

use crate::config::BlinkConfig;
use crate::error::Result;

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[derive(Debug, Clone, Copy)]
pub struct BlinkController {
    show_ms: u64,
    hide_ms: u64,
    tick_cap_ms: u64,
    started: Instant,
}

impl BlinkController {
    pub fn new(config: BlinkConfig) -> Self {
        Self {
            show_ms: config.show_ms,
            hide_ms: config.hide_ms,
            tick_cap_ms: config.tick_cap_ms,
            started: Instant::now(),
        }
    }

    /// `min(gcd(show, hide), cap)`, never zero
    pub fn tick_period(&self) -> Duration {
        let gcd = gcd(self.show_ms, self.hide_ms);
        let period = match (gcd, self.tick_cap_ms) {
            (0, cap) => cap,
            (g, 0) => g,
            (g, cap) => g.min(cap),
        };
        Duration::from_millis(period.max(1))
    }

    /// Phase at `elapsed` since the controller started
    pub fn is_visible_at(&self, elapsed: Duration) -> bool {
        let cycle = self.show_ms + self.hide_ms;
        if cycle == 0 || self.hide_ms == 0 {
            return true;
        }
        (elapsed.as_millis() % cycle as u128) < self.show_ms as u128
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible_at(self.started.elapsed())
    }
}

/// Calls a callback every tick on its own thread until dropped
pub struct BlinkTicker {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl BlinkTicker {
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, stopped) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("termview-blink".into())
            .spawn(move || loop {
                match stopped.recv_timeout(period) {
                    Err(mpsc::RecvTimeoutError::Timeout) => on_tick(),
                    _ => {
                        trace!("blink ticker stopped");
                        break;
                    }
                }
            })?;
        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
        })
    }
}

impl Drop for BlinkTicker {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_tick_period() {
        let blink = BlinkController::new(BlinkConfig::default());
        assert_eq!(blink.tick_period(), Duration::from_millis(150));

        let fine = BlinkController::new(BlinkConfig {
            show_ms: 500,
            hide_ms: 250,
            tick_cap_ms: 150,
        });
        assert_eq!(fine.tick_period(), Duration::from_millis(150));

        let odd = BlinkController::new(BlinkConfig {
            show_ms: 70,
            hide_ms: 50,
            tick_cap_ms: 150,
        });
        assert_eq!(odd.tick_period(), Duration::from_millis(10));
    }

    #[test]
    fn test_phases() {
        let blink = BlinkController::new(BlinkConfig::default());
        assert!(blink.is_visible_at(Duration::from_millis(0)));
        assert!(blink.is_visible_at(Duration::from_millis(599)));
        assert!(!blink.is_visible_at(Duration::from_millis(600)));
        assert!(!blink.is_visible_at(Duration::from_millis(899)));
        assert!(blink.is_visible_at(Duration::from_millis(900)));
        assert!(blink.is_visible_at(Duration::from_millis(10 * 900 + 100)));
    }

    #[test]
    fn test_zero_hide_never_blinks() {
        let blink = BlinkController::new(BlinkConfig {
            show_ms: 600,
            hide_ms: 0,
            tick_cap_ms: 150,
        });
        assert!(blink.is_visible_at(Duration::from_millis(650)));
        assert_eq!(blink.tick_period(), Duration::from_millis(150));
    }

    #[test]
    fn test_ticker_stops_on_drop() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = ticks.clone();
        let ticker = BlinkTicker::spawn(Duration::from_millis(1), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
        std::thread::sleep(Duration::from_millis(30));
        drop(ticker);

        let after_drop = ticks.load(Ordering::SeqCst);
        assert!(after_drop > 0);
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(ticks.load(Ordering::SeqCst), after_drop);
    }
}
