//! Bug API models and DTOs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::middleware::validation::{validate_severity, validate_title};
use crate::config::QueryConfig;
use crate::db::models::CreatorRef;
use crate::db::repositories::{BugChanges, NewBug};
use crate::query::{BugQuery, FilterSpec, PageSpec, SortDirection, SortField, SortSpec};

/// Severity given to bugs filed without one
pub const DEFAULT_SEVERITY: u8 = 3;

/// Request to file a new bug
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBugRequest {
    /// Bug title (required)
    pub title: String,

    /// Bug description (optional)
    pub description: Option<String>,

    /// Severity 1 to 5 (default: 3)
    pub severity: Option<u8>,

    /// Labels (optional)
    #[serde(default)]
    pub labels: Vec<String>,
}

impl CreateBugRequest {
    /// Validate the create request
    pub fn validate(&self) -> ApiResult<()> {
        validate_title(&self.title)?;
        if let Some(severity) = self.severity {
            validate_severity(severity)?;
        }
        Ok(())
    }

    /// Convert into repository input, stamped with the filing user
    pub fn into_new_bug(self, creator: CreatorRef) -> NewBug {
        NewBug {
            title: self.title.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            severity: self.severity.unwrap_or(DEFAULT_SEVERITY),
            labels: self.labels,
            creator: Some(creator),
        }
    }
}

/// Request to update an existing bug
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBugRequest {
    /// Updated title (optional)
    pub title: Option<String>,

    /// Updated description; an empty string clears it
    pub description: Option<String>,

    /// Updated severity (optional)
    pub severity: Option<u8>,

    /// Replacement label list (optional)
    pub labels: Option<Vec<String>>,
}

impl UpdateBugRequest {
    /// Check if any fields are being updated
    pub fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.severity.is_some()
            || self.labels.is_some()
    }

    /// Validate the update request
    pub fn validate(&self) -> ApiResult<()> {
        if !self.has_updates() {
            return Err(ApiError::ValidationError(
                "update must change at least one field".to_string(),
            ));
        }
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(severity) = self.severity {
            validate_severity(severity)?;
        }
        Ok(())
    }

    pub fn into_changes(self) -> BugChanges {
        BugChanges {
            title: self.title.map(|t| t.trim().to_string()),
            description: self.description,
            severity: self.severity,
            labels: self.labels,
        }
    }
}

/// Query parameters for listing and exporting bugs
///
/// Everything arrives as text and is decoded leniently: a value that does
/// not parse is logged and treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugListQuery {
    /// Case-insensitive pattern over title and description
    pub txt: Option<String>,
    pub min_severity: Option<String>,
    pub max_severity: Option<String>,
    /// Comma-separated labels, any of which may match
    pub labels: Option<String>,
    /// Epoch millis, RFC 3339, or `YYYY-MM-DD`
    pub date_from: Option<String>,
    /// Epoch millis, RFC 3339, or `YYYY-MM-DD` (the whole day)
    pub date_to: Option<String>,
    pub has_labels: Option<String>,
    pub creator_id: Option<String>,
    /// `title`, `severity` or `createdAt`
    pub sort_by: Option<String>,
    /// `asc`, `desc`, `1` or `-1`
    pub sort_dir: Option<String>,
    pub page_idx: Option<String>,
    pub page_size: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_param<T: FromStr>(name: &str, value: &Option<String>) -> Option<T> {
    let raw = present(value)?;
    match raw.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            tracing::warn!("Ignoring unparsable {} parameter: {:?}", name, raw);
            None
        }
    }
}

fn parse_bool(name: &str, value: &Option<String>) -> Option<bool> {
    let raw = present(value)?;
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => {
            tracing::warn!("Ignoring unparsable {} parameter: {:?}", name, raw);
            None
        }
    }
}

/// Decode a date bound to epoch millis. A bare date is the start of that day
/// (UTC), or its last millisecond when `end_of_day` is set.
fn parse_date(name: &str, value: &Option<String>, end_of_day: bool) -> Option<i64> {
    let raw = present(value)?;

    if let Ok(millis) = raw.parse::<i64>() {
        return Some(millis);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        let at = if end_of_day {
            date.and_hms_milli_opt(23, 59, 59, 999)
        } else {
            date.and_hms_opt(0, 0, 0)
        };
        return at.map(|at| at.and_utc().timestamp_millis());
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.timestamp_millis());
    }

    tracing::warn!("Ignoring unparsable {} parameter: {:?}", name, raw);
    None
}

impl BugListQuery {
    /// Filter criteria
    pub fn to_filter(&self) -> FilterSpec {
        FilterSpec {
            txt: present(&self.txt).map(str::to_string),
            min_severity: parse_param("minSeverity", &self.min_severity),
            max_severity: parse_param("maxSeverity", &self.max_severity),
            labels: present(&self.labels)
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|l| !l.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            date_from: parse_date("dateFrom", &self.date_from, false),
            date_to: parse_date("dateTo", &self.date_to, true),
            has_labels: parse_bool("hasLabels", &self.has_labels),
            creator_id: present(&self.creator_id).map(str::to_string),
        }
    }

    /// Sort order; an unknown field means no sorting
    pub fn to_sort(&self) -> Option<SortSpec> {
        let field: SortField = parse_param("sortBy", &self.sort_by)?;
        let direction: SortDirection = parse_param("sortDir", &self.sort_dir).unwrap_or_default();
        Some(SortSpec::new(field, direction))
    }

    /// Page window; a missing or zero size means the configured default and
    /// sizes above the configured maximum are clamped
    pub fn to_page(&self, config: &QueryConfig) -> PageSpec {
        let idx = parse_param("pageIdx", &self.page_idx).unwrap_or(0);
        let size = match parse_param::<usize>("pageSize", &self.page_size) {
            None | Some(0) => config.default_page_size,
            Some(size) if size > config.max_page_size => {
                tracing::debug!("Clamping pageSize {} to {}", size, config.max_page_size);
                config.max_page_size
            }
            Some(size) => size,
        };
        PageSpec::new(idx, size)
    }

    pub fn to_query(&self, config: &QueryConfig) -> BugQuery {
        let query = BugQuery::new()
            .with_filter(self.to_filter())
            .with_page(self.to_page(config));
        match self.to_sort() {
            Some(sort) => query.with_sort(sort),
            None => query,
        }
    }
}
