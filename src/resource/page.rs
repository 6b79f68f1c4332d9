use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::Request;
use crate::resource::Descriptor;

/// Pagination envelope as sent by the api. Fields not modelled here are
/// kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub number_of_elements: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(format!("unknown sort direction {}", s)),
        }
    }
}

/// Query of a `/page` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub offset: u32,
    pub page_size: u32,
    pub sort_by: Option<String>,
    pub direction: Option<Direction>,
    pub search_term: Option<String>,
    pub filters: Vec<(String, String)>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            offset: 0,
            page_size: PageRequest::DEFAULT_PAGE_SIZE,
            sort_by: None,
            direction: None,
            search_term: None,
            filters: Vec::new(),
        }
    }
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub fn new(offset: u32, page_size: u32) -> Self {
        Self {
            offset,
            page_size,
            ..Default::default()
        }
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: Option<Direction>) -> Self {
        self.sort_by = Some(field.into());
        self.direction = direction;
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }

    /// Resource specific filter such as `warehouseId` or `companyType`.
    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((key.into(), value.to_string()));
        self
    }

    pub(crate) fn apply(&self, request: Request, descriptor: &Descriptor) -> Request {
        let sort_by = self
            .sort_by
            .as_deref()
            .unwrap_or(descriptor.default_sort);
        let direction = self.direction.or(descriptor.default_direction);

        let request = request
            .query("offset", self.offset)
            .query("pageSize", self.page_size)
            .query("sortBy", sort_by)
            .query_opt("direction", direction)
            .query_opt("searchTerm", self.search_term.as_deref());

        self.filters
            .iter()
            .fold(request, |request, (key, value)| request.query(key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resource::{InventoryLogs, Resource, Users};

    #[test]
    fn resource_defaults_are_sent() {
        let request = PageRequest::default().apply(
            Request::get("/inventory-logs/page"),
            &InventoryLogs::DESCRIPTOR,
        );
        assert_eq!(
            request.cache_key(),
            "GET /inventory-logs/page?offset=0&pageSize=10&sortBy=timestamp&direction=desc"
        );

        let request = PageRequest::new(20, 5)
            .search("ana")
            .filter("role", "BUYER")
            .apply(Request::get("/users/page"), &Users::DESCRIPTOR);
        assert_eq!(
            request.cache_key(),
            "GET /users/page?offset=20&pageSize=5&sortBy=id&searchTerm=ana&role=BUYER"
        );
    }

    #[test]
    fn unknown_envelope_fields_are_kept() {
        let page: Page<Value> = serde_json::from_value(json!({
            "content": [{"id": 1}],
            "totalElements": 11,
            "totalPages": 2,
            "number": 0,
            "size": 10,
            "first": true,
            "last": false,
            "empty": false,
            "numberOfElements": 1,
            "pageable": {"pageNumber": 0, "pageSize": 10}
        }))
        .unwrap();
        assert_eq!(page.total_elements, 11);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.extra["pageable"]["pageSize"], 10);
    }
}
