//! Tolerant field decoders for model output. A value of the wrong shape becomes
//! `None` (or is dropped from its list) instead of failing the whole record.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::models::candidate::SkillLevel;

/// Text that may arrive as a string, a number or a boolean.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// A year count given as a number or a numeric string such as `"5"`.
pub fn years<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('+').trim().parse().ok(),
        _ => None,
    })
}

/// Case-insensitive skill level; unknown labels decode to `None`.
pub fn skill_level<'de, D>(deserializer: D) -> Result<Option<SkillLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => SkillLevel::from_label(&s),
        _ => None,
    })
}

/// A list whose undecodable entries are skipped. Anything other than an array
/// decodes to `None`.
pub fn list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items,
        _ => return Ok(None),
    };

    Ok(Some(
        items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(error = %e, "Skipping undecodable list entry");
                    None
                }
            })
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "text")]
        label: Option<String>,
        #[serde(default, deserialize_with = "years")]
        years: Option<f64>,
        #[serde(default, deserialize_with = "list")]
        tags: Option<Vec<String>>,
    }

    fn decode(value: Value) -> Sample {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_text_accepts_numbers() {
        assert_eq!(decode(json!({"label": 2019})).label.as_deref(), Some("2019"));
        assert_eq!(decode(json!({"label": "2019"})).label.as_deref(), Some("2019"));
        assert_eq!(decode(json!({"label": {"y": 1}})).label, None);
        assert_eq!(decode(json!({})).label, None);
    }

    #[test]
    fn test_years_accepts_numeric_strings() {
        assert_eq!(decode(json!({"years": "7"})).years, Some(7.0));
        assert_eq!(decode(json!({"years": "10+"})).years, Some(10.0));
        assert_eq!(decode(json!({"years": "a decade"})).years, None);
        assert_eq!(decode(json!({"years": 3.5})).years, Some(3.5));
    }

    #[test]
    fn test_list_skips_bad_entries() {
        assert_eq!(
            decode(json!({"tags": ["a", 1, "b"]})).tags,
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(decode(json!({"tags": "a, b"})).tags, None);
        assert_eq!(decode(json!({"tags": null})).tags, None);
    }
}
