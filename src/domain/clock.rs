use std::sync::Arc;

use chrono::{Local, NaiveDateTime};

/// Source of the current wall-clock time.
pub trait Clock: std::fmt::Debug + Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

pub type SharedClock = Arc<dyn Clock>;

/// Local wall-clock time of the machine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub time: NaiveDateTime,
}

impl FixedClock {
    pub fn new(time: NaiveDateTime) -> Self {
        FixedClock { time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.time
    }
}
