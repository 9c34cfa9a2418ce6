use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::format;

/// What the user asked for through the two date inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeInput {
    /// Both inputs were empty: drop the filter entirely.
    Clear,
    /// At least one bound was given.
    Set {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

/// Inclusive date-range filter. A `None` bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeFilter {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl RangeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_range(&mut self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
        self.start = start;
        self.end = end;
    }

    pub fn clear(&mut self) {
        self.start = None;
        self.end = None;
    }

    pub fn apply(&mut self, input: RangeInput) {
        match input {
            RangeInput::Clear => self.clear(),
            RangeInput::Set { start, end } => self.set_range(start, end),
        }
    }

    #[must_use]
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// `true` iff `t` is not before `start` and not after `end`.
    #[must_use]
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        if let Some(start) = self.start {
            if t < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if t > end {
                return false;
            }
        }
        true
    }

    /// Turn the raw `dd/mm/yyyy` inputs into a range.
    ///
    /// The start bound is the first millisecond of its day and the end bound
    /// the last one, so both named days are fully included.
    pub fn parse_input(start: &str, end: &str) -> Result<RangeInput, CoreError> {
        let start = start.trim();
        let end = end.trim();
        if start.is_empty() && end.is_empty() {
            return Ok(RangeInput::Clear);
        }

        let start_at = if start.is_empty() {
            None
        } else {
            Some(format::parse_date(start)?.and_time(NaiveTime::MIN).and_utc())
        };
        let end_at = if end.is_empty() {
            None
        } else {
            let day = format::parse_date(end)?;
            let last_ms = day.and_hms_milli_opt(23, 59, 59, 999).ok_or_else(|| {
                CoreError::Validation(format!("Invalid end date '{end}'"))
            })?;
            Some(last_ms.and_utc())
        };

        if let (Some(s), Some(e)) = (start_at, end_at) {
            if s > e {
                return Err(CoreError::Validation(format!(
                    "Start date ({start}) must not be after end date ({end})"
                )));
            }
        }

        Ok(RangeInput::Set {
            start: start_at,
            end: end_at,
        })
    }
}
