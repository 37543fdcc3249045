use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{core::month::MonthKey, quantity::usage::Usage};

/// One timestamped usage sample.
///
/// The timestamp is the local wall-clock start of the interval, exactly as the utility printed
/// it. Daylight-saving fall-back hours therefore collide and get merged by the normalizer.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq, derive_more::Constructor, Deserialize, Serialize)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    pub value: Usage,
}

impl Reading {
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.timestamp.date())
    }

    #[must_use]
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }
}
