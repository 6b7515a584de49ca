//! Step-function state for the built-in generative sequences. Each struct
//! owns its cursor; nothing here is shared between sequences.

use chrono::{Duration, NaiveDate};
use seqflow_common::error::{SeqError, SeqResult};

/// Counts up from 1.
#[derive(Debug, Clone, Default)]
pub struct NaturalCounter {
    last: u64,
}

impl NaturalCounter {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    pub fn step(&mut self) -> u64 {
        self.last += 1;
        self.last
    }
}

/// Fibonacci numbers starting at 1, 1. The leading zero is never emitted.
#[derive(Debug, Clone)]
pub struct Fibonacci {
    first: u64,
    second: u64,
}

impl Fibonacci {
    pub fn new() -> Self {
        Self {
            first: 0,
            second: 1,
        }
    }

    pub fn step(&mut self) -> u64 {
        let tmp = self.second;
        self.second = self.second.wrapping_add(self.first);
        self.first = tmp;
        self.first
    }
}

impl Default for Fibonacci {
    fn default() -> Self {
        Self::new()
    }
}

/// Consecutive days from `start`. Walking past the last representable date
/// yields one `InvalidArgument` error and then ends.
#[derive(Debug, Clone)]
pub struct CalendarDays {
    start: NaiveDate,
    offset: i64,
    exhausted: bool,
}

impl CalendarDays {
    pub fn new(start: NaiveDate) -> Self {
        Self {
            start,
            offset: -1,
            exhausted: false,
        }
    }
}

impl Iterator for CalendarDays {
    type Item = SeqResult<NaiveDate>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        self.offset += 1;
        match self.start.checked_add_signed(Duration::days(self.offset)) {
            Some(day) => Some(Ok(day)),
            None => {
                self.exhausted = true;
                Some(Err(SeqError::InvalidArgument(format!(
                    "{} days after {} is out of the supported date range",
                    self.offset, self.start
                ))))
            }
        }
    }
}
