//! Query parameters for the air-data endpoints

use chrono::{DateTime, SecondsFormat, Utc};

/// Optional filters for raw and averaged air-data reads
///
/// Only fields that are set are sent to the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AirDataQuery {
    /// Start of the time range
    pub from: Option<DateTime<Utc>>,

    /// End of the time range
    pub to: Option<DateTime<Utc>>,

    /// Maximum number of samples
    pub limit: Option<u32>,

    /// Newest sample first
    pub desc: Option<bool>,

    /// Report temperatures in Fahrenheit
    pub fahrenheit: Option<bool>,
}

impl AirDataQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to samples between `from` and `to`
    pub fn range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    pub fn to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn desc(mut self, desc: bool) -> Self {
        self.desc = Some(desc);
        self
    }

    pub fn fahrenheit(mut self, fahrenheit: bool) -> Self {
        self.fahrenheit = Some(fahrenheit);
        self
    }

    /// Encode the set fields as query pairs
    pub(crate) fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", from.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_rfc3339_opts(SecondsFormat::Millis, true)));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(desc) = self.desc {
            pairs.push(("desc", desc.to_string()));
        }
        if let Some(fahrenheit) = self.fahrenheit {
            pairs.push(("fahrenheit", fahrenheit.to_string()));
        }
        pairs
    }
}
