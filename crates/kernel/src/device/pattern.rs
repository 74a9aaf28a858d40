use crate::Error;
use std::fmt;

/// Case-insensitive fragment of a device identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePattern(String);

impl DevicePattern {
    pub fn new(pattern: &str) -> Result<Self, Error> {
        if pattern.is_empty() {
            return Err(Error::EmptyPattern);
        }
        Ok(Self(pattern.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `device_id` contains the pattern, ignoring case.
    pub fn matches(&self, device_id: &str) -> bool {
        device_id.to_uppercase().contains(&self.0)
    }
}

impl fmt::Display for DevicePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
