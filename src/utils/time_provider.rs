use chrono::{DateTime, Utc};

///
/// An overridable clock - history ordering tests pin it to fixed instants.
///
#[derive(Debug, Default)]
pub struct TimeProvider {
    fixed: Option<DateTime<Utc>>
}

impl TimeProvider {
    pub fn now(&self) -> DateTime<Utc> {
        match self.fixed {
            Some(fixed) => fixed,
            None => Utc::now()
        }
    }

    ///
    /// Pin the clock to the given instant, or un-pin it with None.
    ///
    pub fn fix(&mut self, fixed: Option<DateTime<Utc>>) {
        self.fixed = fixed;
    }
}
