use crate::application::ports::time::Clock;
use chrono::{DateTime, Utc};

/// Wall clock in UTC. `today()` is therefore the UTC calendar date, which
/// is what deadline windows are computed against.
#[derive(Default, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
