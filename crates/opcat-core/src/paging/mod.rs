pub mod classify;
pub mod registry;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use classify::classify_paging;
pub use registry::{EffectivePaging, PagingOverride, PagingRegistry};

/// How an operation's response signals that more pages exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PagingType {
    #[serde(rename = "NEXT_URI")]
    NextUri,
    #[serde(rename = "NEXT_PAGE")]
    NextPage,
    #[serde(rename = "CURSOR")]
    Cursor,
    #[serde(rename = "AFTER")]
    After,
    #[serde(rename = "PAGE_NUMBER")]
    PageNumber,
    #[serde(rename = "TOTALHITS")]
    TotalHits,
    #[serde(rename = "START_INDEX")]
    StartIndex,
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl PagingType {
    pub const ALL: [PagingType; 8] = [
        PagingType::NextUri,
        PagingType::NextPage,
        PagingType::Cursor,
        PagingType::After,
        PagingType::PageNumber,
        PagingType::TotalHits,
        PagingType::StartIndex,
        PagingType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PagingType::NextUri => "NEXT_URI",
            PagingType::NextPage => "NEXT_PAGE",
            PagingType::Cursor => "CURSOR",
            PagingType::After => "AFTER",
            PagingType::PageNumber => "PAGE_NUMBER",
            PagingType::TotalHits => "TOTALHITS",
            PagingType::StartIndex => "START_INDEX",
            PagingType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for PagingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the paging type tags.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown paging type `{0}`")]
pub struct UnknownPagingType(pub String);

impl FromStr for PagingType {
    type Err = UnknownPagingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PagingType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownPagingType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_from_str() {
        for t in PagingType::ALL {
            assert_eq!(t.as_str().parse::<PagingType>().unwrap(), t);
        }
    }

    #[test]
    fn serde_uses_tags() {
        assert_eq!(
            serde_json::to_string(&PagingType::TotalHits).unwrap(),
            "\"TOTALHITS\""
        );
        assert_eq!(
            serde_json::to_string(&PagingType::PageNumber).unwrap(),
            "\"PAGE_NUMBER\""
        );
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(
            "OFFSET".parse::<PagingType>(),
            Err(UnknownPagingType("OFFSET".to_string()))
        );
        // Tags are case-sensitive.
        assert!("cursor".parse::<PagingType>().is_err());
    }

    #[test]
    fn default_is_unknown() {
        assert_eq!(PagingType::default(), PagingType::Unknown);
    }
}
