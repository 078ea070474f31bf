//! Domain vocabulary shared across the API, services, and storage layers.
//!
//! Everything here is a small string-stable enum: the exact strings are what
//! the HTTP surface accepts and what ends up in the database, so `as_str`,
//! `FromStr`, and the serde representation must stay in lockstep.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parse error for every enum in this module.
#[derive(Debug, Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    kind: &'static str,
    value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// The three kinds of media the tracker manages.
///
/// # Examples
///
/// ```rust
/// use trackarr::domain::MediaType;
///
/// let mt: MediaType = "book".parse().unwrap();
/// assert_eq!(mt, MediaType::Book);
/// assert_eq!(mt.to_string(), "book");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Book,
    Movie,
    Show,
}

impl MediaType {
    pub const ALL: [Self; 3] = [Self::Book, Self::Movie, Self::Show];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Book => "book",
            Self::Movie => "movie",
            Self::Show => "show",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(Self::Book),
            "movie" => Ok(Self::Movie),
            "show" => Ok(Self::Show),
            other => Err(UnknownVariant::new("media type", other)),
        }
    }
}

/// Lifecycle of a book in the user's library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    ToRead,
    Reading,
    Read,
    Paused,
    Abandoned,
    Blacklist,
}

impl BookStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToRead => "to_read",
            Self::Reading => "reading",
            Self::Read => "read",
            Self::Paused => "paused",
            Self::Abandoned => "abandoned",
            Self::Blacklist => "blacklist",
        }
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Read)
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_read" => Ok(Self::ToRead),
            "reading" => Ok(Self::Reading),
            "read" => Ok(Self::Read),
            "paused" => Ok(Self::Paused),
            "abandoned" => Ok(Self::Abandoned),
            "blacklist" => Ok(Self::Blacklist),
            other => Err(UnknownVariant::new("book status", other)),
        }
    }
}

/// Lifecycle of a movie in the user's library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieStatus {
    ToWatch,
    Watched,
    Abandoned,
    Blacklist,
}

impl MovieStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToWatch => "to_watch",
            Self::Watched => "watched",
            Self::Abandoned => "abandoned",
            Self::Blacklist => "blacklist",
        }
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Watched)
    }
}

impl fmt::Display for MovieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MovieStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_watch" => Ok(Self::ToWatch),
            "watched" => Ok(Self::Watched),
            "abandoned" => Ok(Self::Abandoned),
            "blacklist" => Ok(Self::Blacklist),
            other => Err(UnknownVariant::new("movie status", other)),
        }
    }
}

/// Lifecycle of a show in the user's library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowStatus {
    ToWatch,
    Watching,
    Watched,
    Paused,
    Abandoned,
    Blacklist,
}

impl ShowStatus {
    /// Statuses whose upcoming-episode data is worth keeping fresh.
    pub const ACTIVE: [Self; 4] = [Self::ToWatch, Self::Watching, Self::Watched, Self::Paused];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToWatch => "to_watch",
            Self::Watching => "watching",
            Self::Watched => "watched",
            Self::Paused => "paused",
            Self::Abandoned => "abandoned",
            Self::Blacklist => "blacklist",
        }
    }

    #[must_use]
    pub const fn is_completed(self) -> bool {
        matches!(self, Self::Watched)
    }

    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Abandoned | Self::Blacklist)
    }
}

impl fmt::Display for ShowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShowStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_watch" => Ok(Self::ToWatch),
            "watching" => Ok(Self::Watching),
            "watched" => Ok(Self::Watched),
            "paused" => Ok(Self::Paused),
            "abandoned" => Ok(Self::Abandoned),
            "blacklist" => Ok(Self::Blacklist),
            other => Err(UnknownVariant::new("show status", other)),
        }
    }
}

/// Affinity for a trope. Sparse: tropes without a stored row are `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TropeAffinity {
    Love,
    Like,
    Neutral,
    Dislike,
    Blacklist,
}

impl TropeAffinity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Love => "love",
            Self::Like => "like",
            Self::Neutral => "neutral",
            Self::Dislike => "dislike",
            Self::Blacklist => "blacklist",
        }
    }
}

impl fmt::Display for TropeAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TropeAffinity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "love" => Ok(Self::Love),
            "like" => Ok(Self::Like),
            "neutral" => Ok(Self::Neutral),
            "dislike" => Ok(Self::Dislike),
            "blacklist" => Ok(Self::Blacklist),
            other => Err(UnknownVariant::new("trope affinity", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_round_trips_through_strings() {
        for mt in MediaType::ALL {
            assert_eq!(mt.as_str().parse::<MediaType>().unwrap(), mt);
        }
        assert!("music".parse::<MediaType>().is_err());
    }

    #[test]
    fn show_status_active_set_excludes_abandoned_and_blacklist() {
        assert!(ShowStatus::Watching.is_active());
        assert!(ShowStatus::ToWatch.is_active());
        assert!(ShowStatus::Watched.is_active());
        assert!(ShowStatus::Paused.is_active());
        assert!(!ShowStatus::Abandoned.is_active());
        assert!(!ShowStatus::Blacklist.is_active());
    }

    #[test]
    fn statuses_round_trip_through_strings() {
        for s in [
            BookStatus::ToRead,
            BookStatus::Reading,
            BookStatus::Read,
            BookStatus::Paused,
            BookStatus::Abandoned,
            BookStatus::Blacklist,
        ] {
            assert_eq!(s.as_str().parse::<BookStatus>().unwrap(), s);
        }
        for s in [
            ShowStatus::ToWatch,
            ShowStatus::Watching,
            ShowStatus::Watched,
            ShowStatus::Paused,
            ShowStatus::Abandoned,
            ShowStatus::Blacklist,
        ] {
            assert_eq!(s.as_str().parse::<ShowStatus>().unwrap(), s);
        }
    }

    #[test]
    fn serde_uses_the_same_strings_as_from_str() {
        let json = serde_json::to_string(&MediaType::Book).unwrap();
        assert_eq!(json, "\"book\"");
        let json = serde_json::to_string(&ShowStatus::ToWatch).unwrap();
        assert_eq!(json, "\"to_watch\"");
        let affinity: TropeAffinity = serde_json::from_str("\"dislike\"").unwrap();
        assert_eq!(affinity, TropeAffinity::Dislike);
    }

    #[test]
    fn unknown_variant_error_names_the_kind() {
        let err = "meh".parse::<TropeAffinity>().unwrap_err();
        assert_eq!(err.to_string(), "unknown trope affinity: meh");
    }
}
