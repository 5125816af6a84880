use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a buffered client's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub messages_queued: u64,
    pub flushes: u64,
    pub failed_flushes: u64,
    pub messages_sent: u64,
    pub messages_dropped: u64,
}

#[derive(Debug, Default)]
pub(crate) struct StatsCollector {
    messages_queued: AtomicU64,
    flushes: AtomicU64,
    failed_flushes: AtomicU64,
    messages_sent: AtomicU64,
    messages_dropped: AtomicU64,
}

impl StatsCollector {
    pub(crate) fn record_queued(&self) {
        self.messages_queued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_flush(&self, success: bool, messages: usize) {
        self.flushes.fetch_add(1, Ordering::Relaxed);
        if success {
            self.messages_sent
                .fetch_add(messages as u64, Ordering::Relaxed);
        } else {
            self.failed_flushes.fetch_add(1, Ordering::Relaxed);
            self.messages_dropped
                .fetch_add(messages as u64, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> QueueStats {
        QueueStats {
            messages_queued: self.messages_queued.load(Ordering::Relaxed),
            flushes: self.flushes.load(Ordering::Relaxed),
            failed_flushes: self.failed_flushes.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
        }
    }
}
