//! Common API types and utilities

use utoipa::IntoParams;
use serde::Deserialize;

mod string_or_number {
    use serde::{Deserialize, Deserializer, de};

    pub fn deserialize_u32_opt<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNum {
            Num(u32),
            Str(String),
        }

        match Option::<StringOrNum>::deserialize(deserializer)? {
            Some(StringOrNum::Num(n)) => Ok(Some(n)),
            Some(StringOrNum::Str(s)) => s.parse().map(Some).map_err(de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Optional result limit for list endpoints
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitParams {
    /// Maximum number of items to return
    #[serde(default, deserialize_with = "string_or_number::deserialize_u32_opt")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_accepts_string_or_number() {
        let p: LimitParams = serde_json::from_str(r#"{"limit": "5"}"#).unwrap();
        assert_eq!(p.limit, Some(5));

        let p: LimitParams = serde_json::from_str(r#"{"limit": 7}"#).unwrap();
        assert_eq!(p.limit, Some(7));

        let p: LimitParams = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, None);
    }
}
