//! Querystring records and their conversion to and from raw query strings.
//!
//! Values are carried verbatim in both directions. Nothing is percent-encoded
//! or decoded here; the edge runtime delivers parameters still encoded and
//! expects them back the same way.

use crate::event::request::HeaderValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One querystring parameter.
///
/// Runtimes send `{"value": "..."}` for a single occurrence and add
/// `{"multiValue": [{"value": ...}, ...]}` when the parameter repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_value: Option<Vec<HeaderValue>>,
}

impl QueryValue {
    pub fn single(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            multi_value: None,
        }
    }

    /// A repeated parameter. `value` mirrors the first occurrence.
    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<HeaderValue> = values.into_iter().map(HeaderValue::new).collect();
        Self {
            value: values.first().map(|v| v.value.clone()),
            multi_value: Some(values),
        }
    }

    /// Record another occurrence of this parameter.
    pub fn push(&mut self, value: impl Into<String>) {
        let value = HeaderValue::new(value);
        match self.multi_value.as_mut() {
            Some(values) => values.push(value),
            None => {
                let first = HeaderValue::new(self.value.clone().unwrap_or_default());
                self.multi_value = Some(vec![first, value]);
            }
        }
    }

    /// The non-empty `multiValue` list, if there is one.
    fn values(&self) -> Option<&[HeaderValue]> {
        self.multi_value.as_deref().filter(|values| !values.is_empty())
    }
}

/// Querystring records keyed by parameter name, in order of appearance.
pub type QueryString = IndexMap<String, QueryValue>;

/// Render querystring records as a query string, without the leading `?`.
///
/// Each parameter becomes `name=v1,v2,...` when it has a non-empty
/// `multiValue` list, a bare `name` when its value is empty, and
/// `name=value` otherwise. Fragments are joined with `&`.
pub fn serialize_query(query: &QueryString) -> String {
    query
        .iter()
        .map(|(name, param)| match (param.values(), param.value.as_deref()) {
            (Some(values), _) => {
                let joined = values
                    .iter()
                    .map(|v| v.value.as_str())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{name}={joined}")
            }
            (None, None | Some("")) => name.to_string(),
            (None, Some(value)) => format!("{name}={value}"),
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Build querystring records from a raw query string (no leading `?`).
///
/// Each `&`-separated part is split at its first `=`; a part without `=`
/// gets an empty value and empty parts are skipped. Repeated names collect
/// into `multiValue` in order of appearance.
pub fn parse_query(raw: &str) -> QueryString {
    let mut query = QueryString::new();
    for part in raw.split('&').filter(|part| !part.is_empty()) {
        let (name, value) = part.split_once('=').unwrap_or((part, ""));
        match query.get_mut(name) {
            Some(existing) => existing.push(value),
            None => {
                query.insert(name.to_string(), QueryValue::single(value));
            }
        }
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn query<const N: usize>(params: [(&str, QueryValue); N]) -> QueryString {
        params
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    #[test]
    fn test_serialize_mixed_parameters() {
        let query = query([
            ("a", QueryValue::single("1")),
            ("b", QueryValue::single("")),
            ("c", QueryValue::multi(["x", "y"])),
        ]);
        assert_eq!(serialize_query(&query), "a=1&b&c=x,y");
    }

    #[test]
    fn test_serialize_empty() {
        assert_eq!(serialize_query(&QueryString::new()), "");
    }

    #[test]
    fn test_serialize_does_not_encode() {
        let query = query([
            ("redirect", QueryValue::single("https://a.test/?x=1&y")),
            ("name", QueryValue::single("J%C3%BCrgen smith")),
        ]);
        assert_eq!(
            serialize_query(&query),
            "redirect=https://a.test/?x=1&y&name=J%C3%BCrgen smith"
        );
    }

    #[test]
    fn test_serialize_from_runtime_json() {
        let query: QueryString = serde_json::from_value(json!({
            "a": { "value": "1" },
            "b": { "value": "" },
            "c": { "multiValue": [{ "value": "x" }, { "value": "y" }] }
        }))
        .unwrap();
        assert_eq!(serialize_query(&query), "a=1&b&c=x,y");
    }

    #[test]
    fn test_multi_value_wins_over_value() {
        let query: QueryString = serde_json::from_value(json!({
            "tag": { "value": "red", "multiValue": [{ "value": "red" }, { "value": "blue" }] }
        }))
        .unwrap();
        assert_eq!(serialize_query(&query), "tag=red,blue");
    }

    #[test]
    fn test_empty_multi_value_falls_back_to_value() {
        let query = query([
            (
                "a",
                QueryValue {
                    value: Some("1".to_string()),
                    multi_value: Some(Vec::new()),
                },
            ),
            ("b", QueryValue::default()),
        ]);
        assert_eq!(serialize_query(&query), "a=1&b");
    }

    #[test]
    fn test_multi_value_with_empty_items() {
        let query = query([("k", QueryValue::multi(["", "2"]))]);
        assert_eq!(serialize_query(&query), "k=,2");
    }

    #[test]
    fn test_parse_repeated_and_bare_parameters() {
        let query = parse_query("a=1&flag&a=2&b=x=y");
        assert_eq!(query.keys().collect::<Vec<_>>(), vec!["a", "flag", "b"]);
        assert_eq!(query.get("a"), Some(&QueryValue::multi(["1", "2"])));
        assert_eq!(query.get("flag"), Some(&QueryValue::single("")));
        assert_eq!(query.get("b"), Some(&QueryValue::single("x=y")));
    }

    #[test]
    fn test_parse_skips_empty_parts() {
        assert!(parse_query("").is_empty());
        assert_eq!(parse_query("&&q=1&").len(), 1);
    }

    #[test]
    fn test_parse_then_serialize() {
        assert_eq!(serialize_query(&parse_query("q=1&q=2&debug")), "q=1,2&debug");
    }

    #[test]
    fn test_multi_value_json_shape() {
        let value = serde_json::to_value(QueryValue::multi(["x", "y"])).unwrap();
        assert_eq!(
            value,
            json!({ "value": "x", "multiValue": [{ "value": "x" }, { "value": "y" }] })
        );
    }
}
