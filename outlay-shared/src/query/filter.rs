//! Per-entity filter builders
//!
//! Each builder takes the raw query-parameter map of a request and
//! produces the filter document for its entity's collection. Builders are
//! pure; defaults that depend on "now" take the instant explicitly so the
//! behavior is testable.

use crate::query::window::{parse_day, DateWindow};
use crate::query::FilterError;
use bson::oid::ObjectId;
use bson::{doc, Document};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Strict boolean parse for query parameters. Anything but `true` or
/// `false` fails the operation rather than being dropped.
fn parse_bool(key: &str, value: &str) -> Result<bool, FilterError> {
    value.parse::<bool>().map_err(|_| FilterError::InvalidBool {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Filter for user listings. Recognizes `is_active` and `role`.
///
/// The role value is passed through verbatim; a value outside the role set
/// simply matches nothing.
pub fn users(params: &HashMap<String, String>) -> Result<Document, FilterError> {
    let mut filter = doc! {};
    if let Some(value) = params.get("is_active") {
        filter.insert("is_active", parse_bool("is_active", value)?);
    }
    if let Some(role) = params.get("role") {
        filter.insert("role", role.as_str());
    }
    Ok(filter)
}

/// Filter for category listings. Recognizes `name`.
pub fn categories(params: &HashMap<String, String>) -> Result<Document, FilterError> {
    let mut filter = doc! {};
    if let Some(name) = params.get("name") {
        filter.insert("name", name.as_str());
    }
    Ok(filter)
}

/// Filter for project listings. Recognizes `name` (matched against the
/// title field).
pub fn projects(params: &HashMap<String, String>) -> Result<Document, FilterError> {
    let mut filter = doc! {};
    if let Some(name) = params.get("name") {
        filter.insert("title", name.as_str());
    }
    Ok(filter)
}

/// Filter for the members of one project. Always scoped to `project_id`;
/// recognizes `is_active`.
pub fn project_members(
    project_id: ObjectId,
    params: &HashMap<String, String>,
) -> Result<Document, FilterError> {
    let mut filter = doc! { "project_id": project_id };
    if let Some(value) = params.get("is_active") {
        filter.insert("is_active", parse_bool("is_active", value)?);
    }
    Ok(filter)
}

/// Filter for expense listings.
///
/// With no parameters the filter is empty and matches every expense. With
/// any parameters present, `start` and `end` are both required and the
/// filter becomes the half-open range `start <= date < end`.
pub fn expenses(params: &HashMap<String, String>) -> Result<Document, FilterError> {
    if params.is_empty() {
        return Ok(doc! {});
    }

    let start = params
        .get("start")
        .ok_or(FilterError::MissingBound("start"))?;
    let end = params.get("end").ok_or(FilterError::MissingBound("end"))?;

    let window = DateWindow {
        start: parse_day("start", start)?,
        end: parse_day("end", end)?,
    };
    Ok(date_range(&window))
}

/// The half-open `date` range document shared by expense queries.
pub fn date_range(window: &DateWindow) -> Document {
    doc! {
        "date": {
            "$gte": bson::DateTime::from_chrono(window.start),
            "$lt": bson::DateTime::from_chrono(window.end),
        }
    }
}

/// Resolved parameters of a project-details lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsSelector {
    /// Window applied to the joined expenses
    pub window: DateWindow,

    /// Active state required of the joined members
    pub active_only: bool,
}

/// Parameters for the project-details view, with entity-specific defaults:
/// the window falls back to the calendar month containing now, and the
/// member filter falls back to active members only. Each bound can be
/// overridden independently.
pub fn project_details(params: &HashMap<String, String>) -> Result<DetailsSelector, FilterError> {
    project_details_at(params, Utc::now())
}

/// Same as [`project_details`] with the reference instant injected.
pub fn project_details_at(
    params: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Result<DetailsSelector, FilterError> {
    let mut selector = DetailsSelector {
        window: DateWindow::month_of(now),
        active_only: true,
    };
    if let Some(start) = params.get("start") {
        selector.window.start = parse_day("start", start)?;
    }
    if let Some(end) = params.get("end") {
        selector.window.end = parse_day("end", end)?;
    }
    if let Some(value) = params.get("is_active") {
        selector.active_only = parse_bool("is_active", value)?;
    }
    Ok(selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_params_build_the_empty_filter() {
        let empty = HashMap::new();
        assert_eq!(users(&empty).unwrap(), doc! {});
        assert_eq!(categories(&empty).unwrap(), doc! {});
        assert_eq!(projects(&empty).unwrap(), doc! {});
        assert_eq!(expenses(&empty).unwrap(), doc! {});
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let filter = users(&params(&[("favourite_colour", "teal")])).unwrap();
        assert_eq!(filter, doc! {});
    }

    #[test]
    fn user_filter_extracts_recognized_keys() {
        let filter = users(&params(&[("is_active", "true"), ("role", "STAFF")])).unwrap();
        assert_eq!(filter.get_bool("is_active").unwrap(), true);
        assert_eq!(filter.get_str("role").unwrap(), "STAFF");
    }

    #[test]
    fn malformed_boolean_fails_the_operation() {
        let result = users(&params(&[("is_active", "maybe")]));
        assert_eq!(
            result,
            Err(FilterError::InvalidBool {
                key: "is_active".to_string(),
                value: "maybe".to_string(),
            })
        );
    }

    #[test]
    fn member_filter_is_always_scoped_to_the_project() {
        let id = ObjectId::new();
        let filter = project_members(id, &HashMap::new()).unwrap();
        assert_eq!(filter.get_object_id("project_id").unwrap(), id);
        assert!(filter.get("is_active").is_none());

        let filter = project_members(id, &params(&[("is_active", "false")])).unwrap();
        assert_eq!(filter.get_bool("is_active").unwrap(), false);
    }

    #[test]
    fn expense_range_requires_both_bounds() {
        assert_eq!(
            expenses(&params(&[("start", "2024-01-01")])),
            Err(FilterError::MissingBound("end"))
        );
        assert_eq!(
            expenses(&params(&[("end", "2024-02-01")])),
            Err(FilterError::MissingBound("start"))
        );
    }

    #[test]
    fn expense_range_is_half_open() {
        let filter = expenses(&params(&[("start", "2024-01-01"), ("end", "2024-02-01")])).unwrap();
        let range = filter.get_document("date").unwrap();
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(
            range.get_datetime("$gte").unwrap(),
            &bson::DateTime::from_chrono(start)
        );
        assert_eq!(
            range.get_datetime("$lt").unwrap(),
            &bson::DateTime::from_chrono(end)
        );
    }

    #[test]
    fn expense_range_rejects_malformed_dates() {
        let result = expenses(&params(&[("start", "Jan 1"), ("end", "2024-02-01")]));
        assert!(matches!(result, Err(FilterError::InvalidDate { .. })));
    }

    #[test]
    fn details_defaults_to_the_current_month_and_active_members() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let selector = project_details_at(&HashMap::new(), now).unwrap();
        assert_eq!(
            selector.window.start,
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            selector.window.end,
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
        );
        assert!(selector.active_only);
    }

    #[test]
    fn details_bounds_can_be_overridden_independently() {
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 9, 0, 0).unwrap();
        let selector = project_details_at(
            &params(&[("start", "2024-01-01"), ("is_active", "false")]),
            now,
        )
        .unwrap();
        assert_eq!(
            selector.window.start,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        // end keeps the month default
        assert_eq!(
            selector.window.end,
            Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()
        );
        assert!(!selector.active_only);
    }

    #[test]
    fn details_rejects_malformed_values() {
        let now = Utc::now();
        assert!(matches!(
            project_details_at(&params(&[("start", "01-01-2024")]), now),
            Err(FilterError::InvalidDate { .. })
        ));
        assert!(matches!(
            project_details_at(&params(&[("is_active", "yes")]), now),
            Err(FilterError::InvalidBool { .. })
        ));
    }
}
