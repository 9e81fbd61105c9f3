//! Short-lived text feed shown in the corner of the screen.
//!
//! Newest entry is slot 0. Entries expire on their own timer regardless of
//! later pushes, and pushing past the visible maximum evicts the oldest.
//! Removed entries linger briefly in [`NotificationQueue::fading`] so the host
//! can fade them out.

use std::collections::{HashMap, VecDeque};

use chrono::Local;
use tracing::info;

use crate::config::NotificationConfig;
use crate::error::{ensure_positive, ConfigError};
use crate::timer::{Scheduler, TimerHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

#[derive(Clone, Debug, PartialEq)]
pub struct NotificationEntry {
    pub id: NotificationId,
    pub text: String,
    pub created_at_ms: f64,
    pub slot_index: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeReason {
    Evicted,
    Expired,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FadingNotification {
    pub id: NotificationId,
    pub text: String,
    /// Slot the entry held when it left the queue.
    pub slot_index: usize,
    pub started_at_ms: f64,
    pub duration_ms: f64,
    pub reason: FadeReason,
}

impl FadingNotification {
    pub fn alpha(&self, now_ms: f64) -> f32 {
        let t = (now_ms - self.started_at_ms) / self.duration_ms;
        (1.0 - t).clamp(0.0, 1.0) as f32
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum QueueTimer {
    Expire(NotificationId),
    Remove(NotificationId),
}

pub struct NotificationQueue {
    config: NotificationConfig,
    entries: VecDeque<NotificationEntry>,
    fading: Vec<FadingNotification>,
    expiry: HashMap<NotificationId, TimerHandle>,
    timers: Scheduler<QueueTimer>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new(config: NotificationConfig) -> Result<Self, ConfigError> {
        if config.max_visible == 0 {
            return Err(ConfigError::ZeroVisibleNotifications);
        }
        ensure_positive("notifications.display_ms", config.display_ms)?;
        ensure_positive("notifications.evict_fade_ms", config.evict_fade_ms)?;
        ensure_positive("notifications.expire_fade_ms", config.expire_fade_ms)?;
        Ok(Self {
            config,
            entries: VecDeque::with_capacity(config.max_visible + 1),
            fading: Vec::new(),
            expiry: HashMap::new(),
            timers: Scheduler::new(),
            next_id: 1,
        })
    }

    pub fn config(&self) -> &NotificationConfig {
        &self.config
    }

    pub fn now_ms(&self) -> f64 {
        self.timers.now_ms()
    }

    pub fn push(&mut self, text: impl Into<String>) -> NotificationId {
        let text = text.into();
        info!("[{}] {}", Local::now().format("%H:%M:%S"), text);

        let id = NotificationId(self.next_id);
        self.next_id += 1;
        let now = self.now_ms();

        self.entries.push_front(NotificationEntry {
            id,
            text,
            created_at_ms: now,
            slot_index: 0,
        });
        let handle = self
            .timers
            .schedule_once(self.config.display_ms, QueueTimer::Expire(id));
        self.expiry.insert(id, handle);

        if self.entries.len() > self.config.max_visible {
            if let Some(oldest) = self.entries.pop_back() {
                if let Some(handle) = self.expiry.remove(&oldest.id) {
                    self.timers.cancel(handle);
                }
                self.begin_fade(oldest, FadeReason::Evicted);
            }
        }
        self.reindex();
        id
    }

    pub fn advance(&mut self, dt_ms: f64) {
        for timer in self.timers.advance(dt_ms) {
            match timer {
                QueueTimer::Expire(id) => {
                    self.expiry.remove(&id);
                    if let Some(idx) = self.entries.iter().position(|e| e.id == id) {
                        if let Some(entry) = self.entries.remove(idx) {
                            self.begin_fade(entry, FadeReason::Expired);
                        }
                        self.reindex();
                    }
                }
                QueueTimer::Remove(id) => self.fading.retain(|f| f.id != id),
            }
        }
    }

    /// Newest first.
    pub fn entries(&self) -> impl Iterator<Item = &NotificationEntry> {
        self.entries.iter()
    }

    pub fn fading(&self) -> &[FadingNotification] {
        &self.fading
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vertical offset of a slot from the top of the feed.
    pub fn slot_offset(&self, slot_index: usize) -> f32 {
        slot_index as f32 * self.config.slot_spacing
    }

    fn begin_fade(&mut self, entry: NotificationEntry, reason: FadeReason) {
        let duration_ms = match reason {
            FadeReason::Evicted => self.config.evict_fade_ms,
            FadeReason::Expired => self.config.expire_fade_ms,
        };
        self.timers
            .schedule_once(duration_ms, QueueTimer::Remove(entry.id));
        self.fading.push(FadingNotification {
            id: entry.id,
            text: entry.text,
            slot_index: entry.slot_index,
            started_at_ms: self.timers.now_ms(),
            duration_ms,
            reason,
        });
    }

    fn reindex(&mut self) {
        for (slot, entry) in self.entries.iter_mut().enumerate() {
            entry.slot_index = slot;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn queue() -> NotificationQueue {
        NotificationQueue::new(NotificationConfig::default()).unwrap()
    }

    fn texts(q: &NotificationQueue) -> Vec<&str> {
        q.entries().map(|e| e.text.as_str()).collect()
    }

    fn slots(q: &NotificationQueue) -> Vec<usize> {
        q.entries().map(|e| e.slot_index).collect()
    }

    #[test]
    fn rejects_zero_capacity() {
        let config = NotificationConfig {
            max_visible: 0,
            ..NotificationConfig::default()
        };
        assert!(NotificationQueue::new(config).is_err());
    }

    #[test]
    fn newest_goes_to_the_front() {
        let mut q = queue();
        q.push("a");
        q.push("b");
        q.push("c");
        assert_eq!(texts(&q), vec!["c", "b", "a"]);
        assert_eq!(slots(&q), vec![0, 1, 2]);
    }

    #[test]
    fn overflow_evicts_the_oldest() {
        let mut q = queue();
        for t in ["a", "b", "c", "d", "e"] {
            q.push(t);
        }
        assert_eq!(q.len(), 4);
        assert_eq!(texts(&q), vec!["e", "d", "c", "b"]);
        assert_eq!(q.fading().len(), 1);
        assert_eq!(q.fading()[0].text, "a");
        assert_eq!(q.fading()[0].reason, FadeReason::Evicted);
        assert_eq!(q.fading()[0].slot_index, 3);
    }

    #[test]
    fn evicted_entry_does_not_expire_again() {
        let mut q = queue();
        for t in ["a", "b", "c", "d", "e"] {
            q.push(t);
        }
        q.advance(200.0);
        assert!(q.fading().is_empty());
        q.advance(3800.0);
        // Only the four live entries expire.
        assert!(q.is_empty());
        assert_eq!(q.fading().len(), 4);
        assert!(q.fading().iter().all(|f| f.reason == FadeReason::Expired));
    }

    #[test]
    fn entries_expire_independently_and_compact() {
        let mut q = queue();
        q.push("first");
        q.advance(1000.0);
        q.push("second");
        q.advance(1000.0);
        q.push("third");
        assert_eq!(slots(&q), vec![0, 1, 2]);

        q.advance(2000.0);
        assert_eq!(texts(&q), vec!["third", "second"]);
        assert_eq!(slots(&q), vec![0, 1]);

        q.advance(1000.0);
        assert_eq!(texts(&q), vec!["third"]);
        assert_eq!(slots(&q), vec![0]);
    }

    #[test]
    fn later_pushes_do_not_extend_expiry() {
        let mut q = queue();
        q.push("a");
        for _ in 0..3 {
            q.advance(1000.0);
            q.push("more");
        }
        q.advance(1000.0);
        assert!(!texts(&q).contains(&"a"));
    }

    #[test]
    fn faded_entries_are_dropped_after_the_fade() {
        let mut q = queue();
        q.push("a");
        q.advance(4000.0);
        assert_eq!(q.fading().len(), 1);
        let fade = q.fading()[0].clone();
        assert!((fade.alpha(q.now_ms()) - 1.0).abs() < 1e-6);
        assert!((fade.alpha(q.now_ms() + 125.0) - 0.5).abs() < 1e-6);
        q.advance(250.0);
        assert!(q.fading().is_empty());
    }

    #[test]
    fn slot_offset_uses_spacing() {
        let q = queue();
        assert_eq!(q.slot_offset(0), 0.0);
        assert_eq!(q.slot_offset(3), 66.0);
    }

    proptest! {
        #[test]
        fn never_exceeds_capacity_and_slots_stay_dense(
            ops in proptest::collection::vec(prop_oneof![
                Just(None),
                (1.0f64..3000.0).prop_map(Some),
            ], 1..200),
        ) {
            let mut q = queue();
            let mut pushed = 0u32;
            for op in ops {
                match op {
                    None => {
                        q.push(format!("n{pushed}"));
                        pushed += 1;
                    }
                    Some(dt) => q.advance(dt),
                }
                prop_assert!(q.len() <= 4);
                let s = slots(&q);
                prop_assert_eq!(s, (0..q.len()).collect::<Vec<_>>());
                let created: Vec<f64> = q.entries().map(|e| e.created_at_ms).collect();
                prop_assert!(created.windows(2).all(|w| w[0] >= w[1]));
            }
        }
    }
}
