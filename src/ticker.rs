use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Cancels a running [`Ticker`] at its next frame boundary.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Fixed-rate frame scheduler. Each frame runs to completion before the next
/// one is scheduled, so the callback is never re-entered.
pub struct Ticker {
    frame_dur: Duration,
    stop: StopHandle,
}

impl Ticker {
    pub fn new(fps: u32) -> Self {
        Self::with_frame_duration(Duration::from_secs(1) / fps.max(1))
    }

    pub fn with_frame_duration(frame_dur: Duration) -> Self {
        Self {
            frame_dur,
            stop: StopHandle::default(),
        }
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_dur
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Calls `frame` with the frame number until it breaks, errors, or the stop
    /// handle fires. Returns the number of frames run.
    pub fn run<E>(
        &mut self,
        mut frame: impl FnMut(u64) -> Result<ControlFlow<()>, E>,
    ) -> Result<u64, E> {
        let mut n = 0;
        while !self.stop.is_stopped() {
            let frame_start = Instant::now();
            let flow = frame(n)?;
            n += 1;
            if flow.is_break() {
                break;
            }

            // Frame pacing
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_dur {
                thread::sleep(self.frame_dur - elapsed);
            }
        }
        Ok(n)
    }
}
