use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use http::header::HeaderName as HttpHeaderName;
use serde::{Deserialize, Deserializer};

/// A validated HTTP header name that can be deserialized from configuration.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct HeaderName(HttpHeaderName);

impl HeaderName {
    /// Create a new HeaderName from a static string.
    pub fn from_static(s: &'static str) -> Self {
        Self(HttpHeaderName::from_static(s))
    }

    /// Get the inner http::HeaderName.
    pub fn into_inner(self) -> HttpHeaderName {
        self.0
    }
}

impl AsRef<HttpHeaderName> for HeaderName {
    fn as_ref(&self) -> &HttpHeaderName {
        &self.0
    }
}

impl Deref for HeaderName {
    type Target = HttpHeaderName;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromStr for HeaderName {
    type Err = http::header::InvalidHeaderName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpHeaderName::from_str(s).map(Self)
    }
}

impl fmt::Display for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Debug for HeaderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for HeaderName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;

        HttpHeaderName::from_str(&s)
            .map(Self)
            .map_err(|_| serde::de::Error::custom(format!("invalid HTTP header name: {s}")))
    }
}
