//! API response envelope
//!
//! The POS API is inconsistent about wrapping: most endpoints answer
//! `{ "data": ... }` (sometimes with extra fields such as `success`), a few
//! answer the bare value. [`Envelope`] accepts both.

use serde::Deserialize;

/// Response body that may or may not be wrapped in a `data` field
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    /// `{ "data": T, ... }`
    Wrapped { data: T },
    /// `T`
    Bare(T),
}

impl<T> Envelope<T> {
    /// Unwrap the payload regardless of the shape it arrived in
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_list() {
        let body = r#"{"success": true, "data": [1, 2, 3]}"#;
        let env: Envelope<Vec<i32>> = serde_json::from_str(body).unwrap();
        assert_eq!(env.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn test_bare_list() {
        let env: Envelope<Vec<i32>> = serde_json::from_str("[4, 5]").unwrap();
        assert_eq!(env.into_inner(), vec![4, 5]);
    }

    #[test]
    fn test_mismatched_body_is_an_error() {
        let result: Result<Envelope<Vec<i32>>, _> = serde_json::from_str(r#"{"data": "x"}"#);
        assert!(result.is_err());
    }
}
