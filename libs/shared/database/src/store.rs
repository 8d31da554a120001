use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use shared_models::Record;

use crate::formula::Formula;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Filter, ordering and cap for a table listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub formula: Option<Formula>,
    pub sort: Vec<(String, SortDirection)>,
    pub max_records: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, formula: Formula) -> Self {
        self.formula = Some(formula);
        self
    }

    pub fn sort_asc(mut self, field: &str) -> Self {
        self.sort.push((field.to_string(), SortDirection::Asc));
        self
    }

    pub fn sort_desc(mut self, field: &str) -> Self {
        self.sort.push((field.to_string(), SortDirection::Desc));
        self
    }

    pub fn max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }
}

/// The external table store holding slots, appointments and call logs.
#[cfg_attr(feature = "mocks", mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record matching `query`, following pagination.
    async fn list(&self, table: &str, query: ListQuery) -> Result<Vec<Record>>;

    async fn create(&self, table: &str, fields: Map<String, Value>) -> Result<Record>;

    async fn update(&self, table: &str, record_id: &str, fields: Map<String, Value>) -> Result<Record>;

    async fn delete(&self, table: &str, record_id: &str) -> Result<()>;
}

/// Serializes a typed field set into the map the store expects.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!("record fields must serialize to an object, got {}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_fields_requires_object() {
        #[derive(Serialize)]
        struct Reservation {
            #[serde(rename = "Booked")]
            booked: bool,
        }

        let fields = to_fields(&Reservation { booked: true }).unwrap();
        assert_eq!(fields.get("Booked"), Some(&json!(true)));
        assert!(to_fields(&"not an object").is_err());
    }

    #[test]
    fn test_list_query_builder() {
        let query = ListQuery::new()
            .filter(Formula::is_false("Booked"))
            .sort_asc("Date")
            .sort_desc("Time")
            .max_records(10);

        assert_eq!(query.formula.as_ref().map(Formula::as_str), Some("{Booked}=FALSE()"));
        assert_eq!(
            query.sort,
            vec![
                ("Date".to_string(), SortDirection::Asc),
                ("Time".to_string(), SortDirection::Desc),
            ]
        );
        assert_eq!(query.max_records, Some(10));
    }
}
