//! Pagination primitives shared by every list endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Query strings arrive with empty strings for cleared form fields; treat
/// `""` the same as an absent parameter.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub offset: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(20),
            offset: Some(0),
            page: Some(1),
        }
    }
}

impl PaginationParams {
    /// Requested page size, clamped to `1..=100`. Defaults to 20.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }

    /// Row offset. A `page` parameter wins over an explicit `offset`.
    pub fn offset(&self) -> i64 {
        if let Some(page) = self.page {
            (page.max(1) - 1) * self.limit()
        } else {
            self.offset.unwrap_or(0).max(0)
        }
    }

    pub fn page(&self) -> Option<i64> {
        self.page.map(|p| p.max(1))
    }
}

impl PaginationMeta {
    /// Build the metadata block for one page of a listing.
    pub fn for_page(total: i64, limit: i64, offset: i64) -> Self {
        Self {
            total,
            limit,
            offset: Some(offset),
            page: None,
            has_more: offset + limit < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let params = PaginationParams {
            limit: None,
            offset: None,
            page: None,
        };
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.page(), None);
    }

    #[test]
    fn limit_is_clamped() {
        let params = PaginationParams {
            limit: Some(500),
            offset: None,
            page: None,
        };
        assert_eq!(params.limit(), 100);

        let params = PaginationParams {
            limit: Some(0),
            offset: None,
            page: None,
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn page_overrides_offset() {
        let params = PaginationParams {
            limit: Some(25),
            offset: Some(999),
            page: Some(3),
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn negative_offset_clamps_to_zero() {
        let params = PaginationParams {
            limit: None,
            offset: Some(-10),
            page: None,
        };
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn empty_strings_deserialize_as_absent() {
        let params: PaginationParams =
            serde_json::from_str(r#"{"limit":"","offset":"","page":""}"#).unwrap();
        assert_eq!(params.limit(), 20);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn string_numbers_deserialize() {
        let params: PaginationParams = serde_json::from_str(r#"{"limit":"50","page":"2"}"#).unwrap();
        assert_eq!(params.limit(), 50);
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn meta_has_more() {
        let meta = PaginationMeta::for_page(45, 20, 20);
        assert!(meta.has_more);
        let meta = PaginationMeta::for_page(45, 20, 40);
        assert!(!meta.has_more);
    }
}
