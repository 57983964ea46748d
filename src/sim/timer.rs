//! Wall-clock timer table
//!
//! Deadline entries owned by the run context and polled once per frame,
//! so expiry is serialized against the rest of the simulation instead of
//! arriving as host callbacks. `Timers::clear` on run reset guarantees a
//! stale entry can never touch a fresh run.

/// What a due timer means to the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Drop the player shield
    ShieldOff,
    /// Repeat fire while the touch button is held
    AutoFire,
}

/// Handle for cancelling a specific entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy)]
struct Entry {
    id: TimerId,
    kind: TimerKind,
    deadline_ms: f64,
    period_ms: Option<f64>,
}

/// Pending wall-clock deadlines, in schedule order
#[derive(Debug, Default)]
pub struct Timers {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot entry due `delay_ms` from `now_ms`
    pub fn schedule(&mut self, kind: TimerKind, now_ms: f64, delay_ms: f64) -> TimerId {
        self.insert(kind, now_ms + delay_ms, None)
    }

    /// Repeating entry, first due one period from `now_ms`
    pub fn schedule_repeating(&mut self, kind: TimerKind, now_ms: f64, period_ms: f64) -> TimerId {
        self.insert(kind, now_ms + period_ms, Some(period_ms))
    }

    fn insert(&mut self, kind: TimerKind, deadline_ms: f64, period_ms: Option<f64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            kind,
            deadline_ms,
            period_ms,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.entries.retain(|e| e.id != id);
    }

    /// Cancel every entry of one kind
    pub fn cancel_kind(&mut self, kind: TimerKind) {
        self.entries.retain(|e| e.kind != kind);
    }

    /// Invalidate all outstanding entries (run reset)
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_scheduled(&self, kind: TimerKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Collect the kinds due at `now_ms`, in schedule order. Repeating
    /// entries are pushed out one period from `now_ms`; periods missed
    /// during a long frame collapse into a single firing rather than
    /// bursting to catch up.
    pub fn fire_due(&mut self, now_ms: f64) -> Vec<TimerKind> {
        let mut due = Vec::new();
        self.entries.retain_mut(|e| {
            if e.deadline_ms > now_ms {
                return true;
            }
            due.push(e.kind);
            match e.period_ms {
                Some(period) => {
                    e.deadline_ms = now_ms + period;
                    true
                }
                None => false,
            }
        });
        due
    }
}
