use std::fmt;
use std::str::FromStr;

use crate::error::DispatcherError;

/// Listener priority; lower values run earlier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority(u32);

impl Priority {
    pub const fn new(value: u32) -> Self {
        Priority(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Priority {
    fn from(value: u32) -> Self {
        Priority(value)
    }
}

impl TryFrom<i64> for Priority {
    type Error = DispatcherError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(Priority)
            .map_err(|_| DispatcherError::InvalidPriority { value: value.to_string() })
    }
}

/// Parses a plain run of ASCII digits; signs, fractions and blanks are rejected
impl FromStr for Priority {
    type Err = DispatcherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DispatcherError::InvalidPriority { value: s.to_string() };
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<u32>().map(Priority).map_err(|_| invalid())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
