//! Domain types shared by the client and CLI

use crate::error::SilverlineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The IP-list collection a command operates on.
///
/// Silverline keeps two independent collections per account; every
/// `ip_objects` endpoint is scoped by one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Denylist,
    Allowlist,
}

impl ListType {
    /// Path segment used in the `ip_lists/{list_type}/ip_objects` endpoints.
    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Denylist => "denylist",
            ListType::Allowlist => "allowlist",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = SilverlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "denylist" => Ok(ListType::Denylist),
            "allowlist" => Ok(ListType::Allowlist),
            other => Err(SilverlineError::InvalidInput(format!(
                "list_type must be 'denylist' or 'allowlist', got '{}'",
                other
            ))),
        }
    }
}

/// Pagination parameters for a collection fetch.
///
/// Sent as the `page[size]` / `page[number]` query parameters. The API
/// ignores them on single-object lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub size: u64,
    pub number: u64,
}

impl PageParams {
    /// Query pairs in the form the API expects.
    pub fn as_query(&self) -> [(&'static str, u64); 2] {
        [("page[size]", self.size), ("page[number]", self.number)]
    }
}

/// Paging descriptor derived from a paged list response.
///
/// Part of the structured command output; empty (absent) when the caller did
/// not request paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingData {
    pub current_page_number: u64,
    pub current_page_size: u64,
    pub last_page_number: u64,
}
