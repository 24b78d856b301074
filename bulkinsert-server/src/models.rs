//! Wire model for the bulk-insert payload
//!
//! Decoding is structural only: types must match, nothing else is checked.
//! Missing or null fields take their zero value, a missing or null `data`
//! is an empty batch, and keys match regardless of case.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level payload accepted by `POST /bulkinsert`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BulkInsertRequest {
    /// Caller-chosen identifier, logged but never persisted.
    #[serde(
        rename(serialize = "request_Id", deserialize = "request_id"),
        default,
        deserialize_with = "nullable"
    )]
    pub request_id: i64,

    /// Records to insert, in submission order.
    #[serde(default, deserialize_with = "records")]
    pub data: Vec<Transaction>,
}

/// One record destined for the `transaction` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    /// Accepted on the wire, not stored.
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub customer: String,
    #[serde(deserialize_with = "nullable")]
    pub quantity: i64,
    #[serde(deserialize_with = "nullable")]
    pub price: f64,
    /// Stored verbatim; not parsed as a date.
    #[serde(deserialize_with = "nullable")]
    pub timestamp: String,
}

impl BulkInsertRequest {
    /// Decode a request body.
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        let mut value: Value = serde_json::from_slice(body)?;
        if value.is_null() {
            return Ok(Self::default());
        }

        fold_keys(&mut value);
        if let Some(Value::Array(items)) = value.get_mut("data") {
            items.iter_mut().for_each(fold_keys);
        }
        serde_json::from_value(value)
    }
}

/// Lowercase the keys of a JSON object so field matching ignores case.
fn fold_keys(value: &mut Value) {
    if let Value::Object(map) = value {
        let entries = std::mem::take(map);
        *map = entries
            .into_iter()
            .map(|(key, v)| (key.to_lowercase(), v))
            .collect();
    }
}

/// `null` decodes to the zero value.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` batch is empty; `null` entries are zero-valued records.
fn records<'de, D>(deserializer: D) -> Result<Vec<Transaction>, D::Error>
where
    D: Deserializer<'de>,
{
    let items: Option<Vec<Option<Transaction>>> = Option::deserialize(deserializer)?;
    Ok(items
        .unwrap_or_default()
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_single_record_payload() {
        let body = br#"{
            "request_Id": 1,
            "data": [
                {"id": 1, "customer": "Alice", "quantity": 2, "price": 9.99, "timestamp": "2024-01-01T00:00:00Z"}
            ]
        }"#;

        let req = BulkInsertRequest::from_json(body).unwrap();
        assert_eq!(req.request_id, 1);
        assert_eq!(req.data.len(), 1);
        assert_eq!(req.data[0].customer, "Alice");
        assert_eq!(req.data[0].quantity, 2);
        assert_eq!(req.data[0].price, 9.99);
        assert_eq!(req.data[0].timestamp, "2024-01-01T00:00:00Z");
    }

    #[test]
    fn identifiers_are_optional() {
        let body = br#"{"data": [{"customer": "Bob", "quantity": 1, "price": 1, "timestamp": "now"}]}"#;

        let req = BulkInsertRequest::from_json(body).unwrap();
        assert_eq!(req.request_id, 0);
        assert_eq!(req.data[0].id, 0);
        assert_eq!(req.data[0].price, 1.0);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = br#"{"request_Id": 3, "extra": true, "data": []}"#;

        let req = BulkInsertRequest::from_json(body).unwrap();
        assert!(req.data.is_empty());
    }

    #[test]
    fn timestamp_is_kept_verbatim() {
        let body = br#"{"data": [{"customer": "C", "quantity": 0, "price": 0.5, "timestamp": "not a date"}]}"#;

        let req = BulkInsertRequest::from_json(body).unwrap();
        assert_eq!(req.data[0].timestamp, "not a date");
    }

    #[test]
    fn missing_record_fields_take_zero_values() {
        let req = BulkInsertRequest::from_json(br#"{"data": [{"customer": "A"}]}"#).unwrap();

        let record = &req.data[0];
        assert_eq!(record.customer, "A");
        assert_eq!(record.quantity, 0);
        assert_eq!(record.price, 0.0);
        assert_eq!(record.timestamp, "");
    }

    #[test]
    fn null_record_fields_take_zero_values() {
        let body = br#"{"data": [{"customer": null, "quantity": null, "price": 2.5, "timestamp": null}]}"#;

        let record = &BulkInsertRequest::from_json(body).unwrap().data[0];
        assert_eq!(record.customer, "");
        assert_eq!(record.quantity, 0);
        assert_eq!(record.price, 2.5);
    }

    #[test]
    fn null_data_is_empty_batch() {
        let req = BulkInsertRequest::from_json(br#"{"request_Id": 4, "data": null}"#).unwrap();
        assert_eq!(req.request_id, 4);
        assert!(req.data.is_empty());
    }

    #[test]
    fn absent_data_is_empty_batch() {
        let req = BulkInsertRequest::from_json(br#"{"request_Id": 5}"#).unwrap();
        assert!(req.data.is_empty());
    }

    #[test]
    fn null_body_is_empty_batch() {
        let req = BulkInsertRequest::from_json(b"null").unwrap();
        assert_eq!(req, BulkInsertRequest::default());
    }

    #[test]
    fn null_entry_is_zero_record() {
        let req = BulkInsertRequest::from_json(br#"{"data": [null]}"#).unwrap();
        assert_eq!(req.data, vec![Transaction::default()]);
    }

    #[test]
    fn keys_match_regardless_of_case() {
        let body = br#"{
            "REQUEST_ID": 6,
            "Data": [
                {"ID": 1, "Customer": "Dana", "QUANTITY": 3, "Price": 4.5, "TimeStamp": "t"}
            ]
        }"#;

        let req = BulkInsertRequest::from_json(body).unwrap();
        assert_eq!(req.request_id, 6);
        assert_eq!(
            req.data,
            vec![Transaction {
                id: 1,
                customer: "Dana".into(),
                quantity: 3,
                price: 4.5,
                timestamp: "t".into(),
            }]
        );
    }

    #[test]
    fn serializes_request_id_with_wire_casing() {
        let json = serde_json::to_value(BulkInsertRequest {
            request_id: 8,
            data: vec![],
        })
        .unwrap();
        assert_eq!(json["request_Id"], 8);
    }

    #[test]
    fn rejects_non_object_body() {
        assert!(BulkInsertRequest::from_json(b"[1, 2]").is_err());
    }

    #[test]
    fn rejects_data_that_is_not_an_array() {
        let body = br#"{"request_Id": 1, "data": "oops"}"#;
        assert!(BulkInsertRequest::from_json(body).is_err());
    }

    #[test]
    fn rejects_wrong_field_types() {
        let body = br#"{"data": [{"customer": "C", "quantity": "two", "price": 1.0, "timestamp": "t"}]}"#;
        assert!(BulkInsertRequest::from_json(body).is_err());
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(BulkInsertRequest::from_json(b"not valid json").is_err());
    }
}
