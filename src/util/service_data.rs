// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

use serde::de::{DeserializeOwned, Error};
use serde_json::Value;

/// Deserialize the generic json data of a service call or entity command to a typed struct.
pub trait DeserializeServiceData: Into<Option<Value>> {
    fn deserialize<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        match self.into() {
            None => Err(serde_json::Error::custom("Missing field: 'data'")),
            Some(m) => serde_json::from_value(m),
        }
    }
}

impl DeserializeServiceData for Option<Value> {}

#[cfg(test)]
mod tests {
    use super::DeserializeServiceData;
    use serde_json::json;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Data {
        id: String,
    }

    #[test]
    fn missing_data_returns_error() {
        let data: Option<serde_json::Value> = None;
        assert!(data.deserialize::<Data>().is_err());
    }

    #[test]
    fn data_is_deserialized() {
        let data = Some(json!({"id": "door", "other": 1}));
        assert_eq!(
            Data { id: "door".into() },
            data.deserialize::<Data>().unwrap()
        );
    }
}
