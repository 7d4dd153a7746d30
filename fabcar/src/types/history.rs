//! Wire format of a single entry in an asset's change history.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DisplayFromStr};
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime, UtcOffset};

use crate::FabcarError;

const TIMESTAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// One write (or delete) of an asset, as reported by the ledger's history log.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "TxId")]
    pub tx_id: String,
    /// The stored record at this point, `None` if the entry is a delete.
    #[serde(rename = "Value")]
    pub value: Option<Value>,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "IsDelete")]
    #[serde_as(as = "DisplayFromStr")]
    pub is_delete: bool,
}

impl HistoryEntry {
    pub fn new(
        tx_id: impl Into<String>,
        value: Option<Value>,
        timestamp: OffsetDateTime,
        is_delete: bool,
    ) -> Result<Self, FabcarError> {
        Ok(Self {
            tx_id: tx_id.into(),
            value,
            timestamp: render_timestamp(timestamp)?,
            is_delete,
        })
    }
}

/// Render a ledger timestamp in UTC, e.g.
/// `2024-03-05 19:47:03.090605 +0000 UTC`.
///
/// Trailing zeros of the fraction are trimmed and a whole second has no
/// fraction at all.
pub fn render_timestamp(timestamp: OffsetDateTime) -> Result<String, FabcarError> {
    let timestamp = timestamp.to_offset(UtcOffset::UTC);
    let mut rendered = timestamp.format(TIMESTAMP_FORMAT)?;

    let nanos = timestamp.nanosecond();
    if nanos != 0 {
        let fraction = format!("{nanos:09}");
        rendered.push('.');
        rendered.push_str(fraction.trim_end_matches('0'));
    }
    rendered.push_str(" +0000 UTC");
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn timestamp_is_rendered_in_utc() {
        let timestamp = datetime!(2024-03-05 21:47:03.5 +02:00);
        assert_eq!(
            render_timestamp(timestamp).unwrap(),
            "2024-03-05 19:47:03.5 +0000 UTC"
        );
    }

    #[test]
    fn fraction_keeps_leading_zeros_and_whole_seconds_have_none() {
        assert_eq!(
            render_timestamp(datetime!(2024-03-05 19:47:03.090605 UTC)).unwrap(),
            "2024-03-05 19:47:03.090605 +0000 UTC"
        );
        assert_eq!(
            render_timestamp(datetime!(2024-03-05 19:47:03.000000001 UTC)).unwrap(),
            "2024-03-05 19:47:03.000000001 +0000 UTC"
        );
        assert_eq!(
            render_timestamp(datetime!(2024-03-05 19:47:03 UTC)).unwrap(),
            "2024-03-05 19:47:03 +0000 UTC"
        );
    }

    #[test]
    fn delete_entry_serializes_null_value_and_string_flag() {
        let entry = HistoryEntry::new("tx-2", None, datetime!(2024-01-01 0:00 UTC), true).unwrap();

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            json!({
                "TxId": "tx-2",
                "Value": null,
                "Timestamp": "2024-01-01 00:00:00 +0000 UTC",
                "IsDelete": "true",
            })
        );
    }

    #[test]
    fn stored_value_keeps_field_order() {
        let value: Value = serde_json::from_str(r#"{"id":"CAR1","owner":"Tom"}"#).unwrap();
        let entry =
            HistoryEntry::new("tx-1", Some(value), datetime!(2024-01-01 0:00 UTC), false).unwrap();

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.starts_with(r#"{"TxId":"tx-1","Value":{"id":"CAR1","owner":"Tom"}"#));
        assert!(json.ends_with(r#""IsDelete":"false"}"#));
    }
}
