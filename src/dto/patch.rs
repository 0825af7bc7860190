use serde::{Deserialize, Deserializer};

/// Reads a nullable update field: absent keeps the stored value, `null` clears it, a value replaces it.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]` on an `Option<Option<T>>`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Splits a nullable update field into an assign flag and the new value, for `CASE WHEN $n THEN ...` updates.
pub fn assignment<T>(field: Option<Option<T>>) -> (bool, Option<T>) {
    match field {
        Some(value) => (true, value),
        None => (false, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        note: Option<Option<String>>,
    }

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let cleared: Patch = serde_json::from_str(r#"{"note": null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"note": "hi"}"#).unwrap();

        assert_eq!(absent.note, None);
        assert_eq!(cleared.note, Some(None));
        assert_eq!(set.note, Some(Some("hi".to_string())));

        assert_eq!(assignment(absent.note), (false, None));
        assert_eq!(assignment(cleared.note), (true, None));
        assert_eq!(assignment(set.note), (true, Some("hi".to_string())));
    }
}
