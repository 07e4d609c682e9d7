use chrono::NaiveDate;
use evently::infra::{EventlyContext, ISys};
use std::sync::Arc;

pub struct StaticSys {
    pub date: NaiveDate,
}

impl ISys for StaticSys {
    fn local_date(&self) -> NaiveDate {
        self.date
    }
}

/// In-memory context with the clock pinned so that date defaulting is
/// deterministic.
pub fn spawn_context(today: NaiveDate) -> EventlyContext {
    EventlyContext::create_inmemory_with_sys(Arc::new(StaticSys { date: today }))
}
