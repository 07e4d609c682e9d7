use chrono::prelude::*;

// Mocking out time so that it is possible to run tests that depend on the
// current date.
pub trait ISys: Send + Sync {
    /// The current date in the process local timezone
    fn local_date(&self) -> NaiveDate;
}

/// System that gets the real time and is used when not testing
pub struct RealSys {}
impl ISys for RealSys {
    fn local_date(&self) -> NaiveDate {
        Local::now().naive_local().date()
    }
}
