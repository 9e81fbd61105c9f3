//! Frame-clock timers.
//!
//! A [`Scheduler`] never reads the wall clock: it only moves forward when the
//! owner calls [`Scheduler::advance`] with the frame delta, so every delayed
//! effect stays ordered with the rest of the frame.

/// Repeating timers are clamped to at least this interval.
const MIN_REPEAT_MS: f64 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

struct Entry<T> {
    handle: TimerHandle,
    deadline: f64,
    repeat: Option<f64>,
    payload: T,
}

pub struct Scheduler<T> {
    now_ms: f64,
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Milliseconds advanced since creation.
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    pub fn schedule_once(&mut self, delay_ms: f64, payload: T) -> TimerHandle {
        self.insert(delay_ms.max(0.0), None, payload)
    }

    /// First fire after one interval, then every interval, keeping phase.
    pub fn schedule_repeating(&mut self, interval_ms: f64, payload: T) -> TimerHandle {
        let interval = interval_ms.max(MIN_REPEAT_MS);
        self.insert(interval, Some(interval), payload)
    }

    /// Returns true if the timer was still pending. Cancelling twice is a no-op.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Advance the clock and return every payload that came due, in deadline order.
    /// Timers with equal deadlines fire in the order they were scheduled.
    pub fn advance(&mut self, dt_ms: f64) -> Vec<T> {
        if dt_ms.is_finite() && dt_ms > 0.0 {
            self.now_ms += dt_ms;
        }
        let now = self.now_ms;

        let mut due: Vec<(f64, TimerHandle, T)> = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for mut entry in self.entries.drain(..) {
            if entry.deadline > now {
                kept.push(entry);
                continue;
            }
            match entry.repeat {
                Some(interval) => {
                    due.push((entry.deadline, entry.handle, entry.payload.clone()));
                    let missed = ((now - entry.deadline) / interval).floor() + 1.0;
                    entry.deadline += missed * interval;
                    kept.push(entry);
                }
                None => due.push((entry.deadline, entry.handle, entry.payload)),
            }
        }
        self.entries = kept;

        due.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1 .0.cmp(&b.1 .0)));
        due.into_iter().map(|(_, _, payload)| payload).collect()
    }

    fn insert(&mut self, delay: f64, repeat: Option<f64>, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            handle,
            deadline: self.now_ms + delay,
            repeat,
            payload,
        });
        handle
    }
}
