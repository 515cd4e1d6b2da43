use crate::registry::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form progress marker of one mission (e.g. "Not Started")
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionStatus(pub String);

impl MissionStatus {
    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MissionStatus {
    fn from(status: &str) -> Self {
        Self::new(status)
    }
}

impl Record for MissionStatus {}
