//! Shape and range checks for task payloads and list queries.
//!
//! Every check runs before the store is touched; all field errors are
//! collected so the caller sees the full list at once.

use serde_json::{Map, Value};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

use super::model::{NewTask, Priority, SortKey, SortOrder, Status, TaskFilter, TaskPatch};
use crate::error::FieldError;

pub const TITLE_MAX: usize = 200;
pub const DESCRIPTION_MAX: usize = 1000;

const FIELDS: [&str; 5] = ["title", "description", "priority", "status", "dueDate"];

pub fn validate_create(body: &Value) -> Result<NewTask, Vec<FieldError>> {
    let obj = as_object(body)?;
    let mut errors = unknown_keys(obj);

    let title = match obj.get("title") {
        None => {
            errors.push(FieldError::new("title", "\"title\" is required"));
            None
        }
        Some(v) => title(v, &mut errors),
    };
    let description = obj
        .get("description")
        .and_then(|v| description(v, &mut errors));
    let priority = obj.get("priority").and_then(|v| priority(v, &mut errors));
    let status = obj.get("status").and_then(|v| status(v, &mut errors));
    let due_date = obj.get("dueDate").and_then(|v| due_date(v, &mut errors));

    if !errors.is_empty() {
        return Err(errors);
    }
    let Some(title) = title else {
        return Err(vec![FieldError::new("title", "\"title\" is required")]);
    };
    Ok(NewTask {
        title,
        description: description.unwrap_or_default(),
        priority: priority.unwrap_or_default(),
        status: status.unwrap_or_default(),
        due_date: due_date.flatten(),
    })
}

pub fn validate_update(body: &Value) -> Result<TaskPatch, Vec<FieldError>> {
    let obj = as_object(body)?;
    if obj.is_empty() {
        return Err(vec![FieldError::new(
            "value",
            "\"value\" must have at least 1 key",
        )]);
    }
    let mut errors = unknown_keys(obj);

    let patch = TaskPatch {
        title: obj.get("title").and_then(|v| title(v, &mut errors)),
        description: obj
            .get("description")
            .and_then(|v| description(v, &mut errors)),
        priority: obj.get("priority").and_then(|v| priority(v, &mut errors)),
        status: obj.get("status").and_then(|v| status(v, &mut errors)),
        due_date: obj.get("dueDate").and_then(|v| due_date(v, &mut errors)),
    };

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

/// Raw `GET /tasks` query; every value is checked before it narrows anything.
#[derive(Debug, Default, Clone, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

pub fn validate_list_query(query: &ListQuery) -> Result<TaskFilter, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut filter = TaskFilter::default();

    if let Some(raw) = non_empty(&query.status) {
        match Status::parse(raw) {
            Some(s) => filter.status = Some(s),
            None => errors.push(one_of("status", &Status::ALL.map(|s| s.as_str()))),
        }
    }
    if let Some(raw) = non_empty(&query.priority) {
        match Priority::parse(raw) {
            Some(p) => filter.priority = Some(p),
            None => errors.push(one_of("priority", &Priority::ALL.map(|p| p.as_str()))),
        }
    }
    if let Some(raw) = non_empty(&query.sort_by) {
        match SortKey::parse(raw) {
            Some(k) => filter.sort_by = k,
            None => errors.push(one_of("sortBy", &SortKey::ALL.map(|k| k.as_str()))),
        }
    }
    if let Some(raw) = non_empty(&query.sort_order) {
        match SortOrder::parse(raw) {
            Some(o) => filter.sort_order = o,
            None => errors.push(one_of("sortOrder", &["asc", "desc"])),
        }
    }

    if errors.is_empty() {
        Ok(filter)
    } else {
        Err(errors)
    }
}

/// Accepts RFC 3339, a bare `YYYY-MM-DD`, or a date-time without offset (taken as UTC).
/// Seconds are optional in the date-time forms.
pub fn parse_due_date(raw: &str) -> Option<OffsetDateTime> {
    if let Ok(dt) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(dt);
    }
    let naive = format_description!(
        "[year]-[month]-[day]T[hour]:[minute][optional [:[second][optional [.[subsecond]]]]]"
    );
    let offset = format_description!("[offset_hour sign:mandatory]:[offset_minute]");

    if let Some(local) = raw.strip_suffix(['Z', 'z']) {
        return PrimitiveDateTime::parse(local, naive)
            .ok()
            .map(PrimitiveDateTime::assume_utc);
    }
    if let Ok(dt) = PrimitiveDateTime::parse(raw, naive) {
        return Some(dt.assume_utc());
    }
    if let Some(split) = raw.len().checked_sub(6).filter(|&i| raw.is_char_boundary(i)) {
        let (local, tail) = raw.split_at(split);
        if let (Ok(dt), Ok(off)) = (
            PrimitiveDateTime::parse(local, naive),
            UtcOffset::parse(tail, offset),
        ) {
            return Some(dt.assume_offset(off));
        }
    }
    let date_only = format_description!("[year]-[month]-[day]");
    Date::parse(raw, date_only)
        .ok()
        .map(|d| d.midnight().assume_utc())
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, Vec<FieldError>> {
    body.as_object().ok_or_else(|| {
        vec![FieldError::new(
            "value",
            "\"value\" must be of type object",
        )]
    })
}

fn unknown_keys(obj: &Map<String, Value>) -> Vec<FieldError> {
    obj.keys()
        .filter(|k| !FIELDS.contains(&k.as_str()))
        .map(|k| FieldError::new(k.as_str(), format!("\"{k}\" is not allowed")))
        .collect()
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|s| !s.is_empty())
}

fn one_of(field: &str, allowed: &[&str]) -> FieldError {
    FieldError::new(
        field,
        format!("\"{field}\" must be one of [{}]", allowed.join(", ")),
    )
}

fn string<'a>(field: &str, v: &'a Value, errors: &mut Vec<FieldError>) -> Option<&'a str> {
    match v.as_str() {
        Some(s) => Some(s),
        None => {
            errors.push(FieldError::new(field, format!("\"{field}\" must be a string")));
            None
        }
    }
}

fn title(v: &Value, errors: &mut Vec<FieldError>) -> Option<String> {
    let s = string("title", v, errors)?;
    if s.is_empty() {
        errors.push(FieldError::new(
            "title",
            "\"title\" is not allowed to be empty",
        ));
        return None;
    }
    if s.chars().count() > TITLE_MAX {
        errors.push(FieldError::new(
            "title",
            format!("\"title\" length must be less than or equal to {TITLE_MAX} characters long"),
        ));
        return None;
    }
    Some(s.to_owned())
}

fn description(v: &Value, errors: &mut Vec<FieldError>) -> Option<String> {
    let s = string("description", v, errors)?;
    if s.chars().count() > DESCRIPTION_MAX {
        errors.push(FieldError::new(
            "description",
            format!(
                "\"description\" length must be less than or equal to \
                 {DESCRIPTION_MAX} characters long"
            ),
        ));
        return None;
    }
    Some(s.to_owned())
}

fn priority(v: &Value, errors: &mut Vec<FieldError>) -> Option<Priority> {
    let parsed = v.as_str().and_then(Priority::parse);
    if parsed.is_none() {
        errors.push(one_of("priority", &Priority::ALL.map(|p| p.as_str())));
    }
    parsed
}

fn status(v: &Value, errors: &mut Vec<FieldError>) -> Option<Status> {
    let parsed = v.as_str().and_then(Status::parse);
    if parsed.is_none() {
        errors.push(one_of("status", &Status::ALL.map(|s| s.as_str())));
    }
    parsed
}

/// `Some(None)` is an explicit null.
fn due_date(v: &Value, errors: &mut Vec<FieldError>) -> Option<Option<OffsetDateTime>> {
    if v.is_null() {
        return Some(None);
    }
    match v.as_str().and_then(parse_due_date) {
        Some(dt) => Some(Some(dt)),
        None => {
            errors.push(FieldError::new(
                "dueDate",
                "\"dueDate\" must be in ISO 8601 date format",
            ));
            None
        }
    }
}
