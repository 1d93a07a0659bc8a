use crate::PathnameError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A site-relative path such as `/api/pipe/`
///
/// Pathnames are the identity key for crawling and caching. A pathname always
/// starts with `/` and never contains `.` or `..` segments, so every pathname
/// maps to a location inside the page store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pathname(String);

impl Pathname {
    /// Validates and wraps a pathname string
    ///
    /// # Examples
    ///
    /// ```
    /// use doc_mirror::url::Pathname;
    ///
    /// assert!(Pathname::parse("/guides/introduction/").is_ok());
    /// assert!(Pathname::parse("guides/").is_err());
    /// assert!(Pathname::parse("/guides/../secrets").is_err());
    /// ```
    pub fn parse(value: impl Into<String>) -> Result<Self, PathnameError> {
        let value = value.into();

        if !value.starts_with('/') {
            return Err(PathnameError::MissingLeadingSlash(value));
        }

        if value.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(PathnameError::DotSegment(value));
        }

        Ok(Self(value))
    }

    /// Takes the path component of an absolute URL
    ///
    /// Query string and fragment are dropped. Returns `None` for URLs whose
    /// path cannot be a pathname (e.g. `mailto:` URLs).
    pub fn from_url(url: &Url) -> Option<Self> {
        Self::parse(url.path()).ok()
    }

    /// Wraps a compile-time constant known to be a valid pathname
    pub(crate) fn from_static(value: &'static str) -> Self {
        debug_assert!(Self::parse(value).is_ok(), "invalid pathname {:?}", value);
        Self(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Pathname {
    type Error = PathnameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<Pathname> for String {
    fn from(pathname: Pathname) -> Self {
        pathname.0
    }
}

impl FromStr for Pathname {
    type Err = PathnameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Pathname {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pathname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
