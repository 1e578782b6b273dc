use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Envelope of every list response.
///
/// `next` and `previous` are absolute URLs built from the request's host,
/// `null` at either end.
#[derive(Debug, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Pagination query parameters of the taxonomy listings.
///
/// Values are kept as raw strings: a bad `page_size` falls back to the
/// default instead of failing the request.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

/// Built from raw query pairs. A repeated key keeps its last value.
impl FromIterator<(String, String)> for PageQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" => query.page = Some(value),
                "page_size" => query.page_size = Some(value),
                _ => {}
            }
        }
        query
    }
}

/// Name of a JSON value's type, as reported in type errors.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

/// A related row's id as clients send it: `3` or `"3"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IdInput {
    Integer(i64),
    Text(String),
    /// Any other JSON value. Rejected by [`IdInput::into_id`].
    Other(Value),
}

impl IdInput {
    pub fn into_id(self) -> Result<i32, String> {
        let incorrect =
            |kind: &str| format!("Incorrect type. Expected pk value, received {kind}.");
        match self {
            Self::Integer(id) => i32::try_from(id)
                .map_err(|_| format!("Invalid pk \"{id}\" - object does not exist.")),
            Self::Text(text) => text.trim().parse().map_err(|_| incorrect("str")),
            Self::Other(value) => Err(incorrect(json_type(&value))),
        }
    }
}

impl From<i32> for IdInput {
    fn from(value: i32) -> Self {
        Self::Integer(value.into())
    }
}

/// A text field as clients send it. Numbers are taken as their decimal text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Text(String),
    Number(serde_json::Number),
    /// Any other JSON value. Rejected by [`TextInput::into_text`].
    Other(Value),
}

impl TextInput {
    pub fn into_text(self) -> Result<String, String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Number(number) => Ok(number.to_string()),
            Self::Other(_) => Err("Not a valid string.".to_string()),
        }
    }
}

impl From<&str> for TextInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Body of `GET /api/`: collection name to collection URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiRoot {
    pub cash_flow_types: String,
    pub statuses: String,
    pub categories: String,
    pub subcategories: String,
    pub cash_flows: String,
}

pub mod status {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatusView {
        pub id: i32,
        pub name: String,
    }

    /// Request body for create, PUT and PATCH.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct StatusWrite {
        pub name: Option<TextInput>,
    }
}

pub mod cash_flow_type {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashFlowTypeView {
        pub id: i32,
        pub name: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CashFlowTypeWrite {
        pub name: Option<TextInput>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub name: String,
        /// Cash flow type id.
        pub cash_flow_type: i32,
        pub cash_flow_type_name: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryWrite {
        pub name: Option<TextInput>,
        pub cash_flow_type: Option<IdInput>,
    }
}

pub mod subcategory {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SubcategoryView {
        pub id: i32,
        pub name: String,
        /// Category id.
        pub category: i32,
        pub category_name: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SubcategoryWrite {
        pub name: Option<TextInput>,
        pub category: Option<IdInput>,
    }
}

pub mod cash_flow {
    use super::*;

    /// A ledger entry. Related rows are given by id, with their names
    /// alongside.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CashFlowView {
        pub id: i32,
        pub status: i32,
        pub status_name: String,
        pub cash_flow_type: i32,
        pub cash_flow_type_name: String,
        /// Category of the subcategory, read-only.
        pub category: i32,
        pub category_name: String,
        pub subcategory: i32,
        pub subcategory_name: String,
        /// Decimal string with two fractional digits, e.g. `"100.00"`.
        pub amount: String,
        pub created_at: DateTime<Utc>,
        pub comment: String,
    }

    /// An amount as clients send it: `"12.50"`, `12.5` or `12`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum DecimalInput {
        Text(String),
        Integer(i64),
        Float(f64),
        /// Any other JSON value. Rejected by [`DecimalInput::into_text`].
        Other(Value),
    }

    impl DecimalInput {
        /// Textual form handed to the engine's decimal parser.
        pub fn into_text(self) -> Result<String, String> {
            match self {
                Self::Text(text) => Ok(text),
                Self::Integer(value) => Ok(value.to_string()),
                Self::Float(value) => Ok(value.to_string()),
                Self::Other(_) => Err("A valid number is required.".to_string()),
            }
        }
    }

    /// Request body for create, PUT and PATCH.
    ///
    /// `category` is checked against `subcategory` and `cash_flow_type` but
    /// never stored. `created_at` is not writable.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CashFlowWrite {
        pub status: Option<IdInput>,
        pub cash_flow_type: Option<IdInput>,
        pub category: Option<IdInput>,
        pub subcategory: Option<IdInput>,
        pub amount: Option<DecimalInput>,
        pub comment: Option<TextInput>,
    }

    /// Query parameters of `GET /api/cash_flows/`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CashFlowQuery {
        pub status: Option<String>,
        pub cash_flow_type: Option<String>,
        pub category: Option<String>,
        pub subcategory: Option<String>,
        /// `YYYY-MM-DD` or RFC 3339, inclusive.
        pub created_at_after: Option<String>,
        /// `YYYY-MM-DD` or RFC 3339, inclusive.
        pub created_at_before: Option<String>,
        /// Comma separated field names, `-` prefix for descending.
        pub ordering: Option<String>,
        pub page: Option<String>,
        pub page_size: Option<String>,
    }

    /// Built from raw query pairs. A repeated key keeps its last value.
    impl FromIterator<(String, String)> for CashFlowQuery {
        fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
            let mut query = Self::default();
            for (key, value) in pairs {
                let slot = match key.as_str() {
                    "status" => &mut query.status,
                    "cash_flow_type" => &mut query.cash_flow_type,
                    "category" => &mut query.category,
                    "subcategory" => &mut query.subcategory,
                    "created_at_after" => &mut query.created_at_after,
                    "created_at_before" => &mut query.created_at_before,
                    "ordering" => &mut query.ordering,
                    "page" => &mut query.page,
                    "page_size" => &mut query.page_size,
                    _ => continue,
                };
                *slot = Some(value);
            }
            query
        }
    }
}

#[cfg(test)]
mod tests {
    use super::cash_flow::{CashFlowQuery, CashFlowWrite, DecimalInput};
    use super::*;

    #[test]
    fn amount_accepts_strings_and_numbers() {
        let body: CashFlowWrite = serde_json::from_str(r#"{"amount": "100.00"}"#).unwrap();
        assert_eq!(body.amount, Some(DecimalInput::Text("100.00".to_string())));

        let body: CashFlowWrite = serde_json::from_str(r#"{"amount": 42}"#).unwrap();
        assert_eq!(body.amount.unwrap().into_text().unwrap(), "42");

        let body: CashFlowWrite = serde_json::from_str(r#"{"amount": 12.5}"#).unwrap();
        assert_eq!(body.amount.unwrap().into_text().unwrap(), "12.5");

        let body: CashFlowWrite = serde_json::from_str(r#"{"amount": true}"#).unwrap();
        assert_eq!(
            body.amount.unwrap().into_text(),
            Err("A valid number is required.".to_string())
        );
    }

    #[test]
    fn omitted_and_null_fields_are_none() {
        let body: CashFlowWrite =
            serde_json::from_str(r#"{"status": 1, "comment": null}"#).unwrap();
        assert_eq!(body.status, Some(IdInput::Integer(1)));
        assert!(body.comment.is_none());
        assert!(body.amount.is_none());
        assert!(body.category.is_none());
    }

    #[test]
    fn ids_accept_numeric_strings() {
        let body: CashFlowWrite =
            serde_json::from_str(r#"{"status": "3", "subcategory": 7}"#).unwrap();
        assert_eq!(body.status.unwrap().into_id(), Ok(3));
        assert_eq!(body.subcategory.unwrap().into_id(), Ok(7));
    }

    #[test]
    fn wrongly_typed_ids_name_the_received_type() {
        let body: CashFlowWrite = serde_json::from_str(
            r#"{"status": "abc", "cash_flow_type": true, "category": [1], "subcategory": 1.5}"#,
        )
        .unwrap();
        assert_eq!(
            body.status.unwrap().into_id(),
            Err("Incorrect type. Expected pk value, received str.".to_string())
        );
        assert_eq!(
            body.cash_flow_type.unwrap().into_id(),
            Err("Incorrect type. Expected pk value, received bool.".to_string())
        );
        assert_eq!(
            body.category.unwrap().into_id(),
            Err("Incorrect type. Expected pk value, received list.".to_string())
        );
        assert_eq!(
            body.subcategory.unwrap().into_id(),
            Err("Incorrect type. Expected pk value, received float.".to_string())
        );
    }

    #[test]
    fn ids_outside_the_key_range_do_not_exist() {
        assert_eq!(
            IdInput::Integer(i64::from(i32::MAX) + 1).into_id(),
            Err("Invalid pk \"2147483648\" - object does not exist.".to_string())
        );
    }

    #[test]
    fn text_fields_take_numbers_but_not_other_values() {
        let body: status::StatusWrite = serde_json::from_str(r#"{"name": 2024}"#).unwrap();
        assert_eq!(body.name.unwrap().into_text(), Ok("2024".to_string()));

        let body: status::StatusWrite = serde_json::from_str(r#"{"name": {"a": 1}}"#).unwrap();
        assert_eq!(
            body.name.unwrap().into_text(),
            Err("Not a valid string.".to_string())
        );
    }

    #[test]
    fn query_ignores_unknown_keys() {
        let query: CashFlowQuery =
            serde_json::from_str(r#"{"status": "2", "format": "json"}"#).unwrap();
        assert_eq!(query.status.as_deref(), Some("2"));
        assert!(query.page.is_none());
    }

    #[test]
    fn repeated_query_keys_keep_the_last_value() {
        let pairs = [("status", "1"), ("format", "json"), ("status", "2"), ("page", "3")]
            .map(|(key, value)| (key.to_string(), value.to_string()));

        let query: CashFlowQuery = pairs.clone().into_iter().collect();
        assert_eq!(query.status.as_deref(), Some("2"));
        assert_eq!(query.page.as_deref(), Some("3"));
        assert!(query.ordering.is_none());

        let query: PageQuery = pairs.into_iter().collect();
        assert_eq!(query.page.as_deref(), Some("3"));
        assert!(query.page_size.is_none());
    }

    #[test]
    fn paginated_envelope_shape() {
        let page = Paginated {
            count: 0,
            next: None,
            previous: None,
            results: Vec::<status::StatusView>::new(),
        };
        let value = serde_json::to_value(page).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"count": 0, "next": null, "previous": null, "results": []})
        );
    }
}
