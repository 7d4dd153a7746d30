//! Car and bank transfer records.
//!
//! Records are stored as JSON under their `id`. Field names match the wire
//! format exactly; a field missing from an incoming payload decodes to its
//! zero value and unknown fields are ignored.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::FabcarError;

/// A record that lives in ledger state under its own id.
pub trait LedgerRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Human-readable record name used in error messages and logs.
    const NAME: &'static str;

    /// The ledger key this record is stored under.
    fn key(&self) -> &str;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Car {
    pub id: String,
    pub make: String,
    pub model: String,
    pub color: String,
    pub owner: String,
    pub added_at: u64,
}

impl LedgerRecord for Car {
    const NAME: &'static str = "car";

    fn key(&self) -> &str {
        &self.id
    }
}

/// A transfer between two banks. `amount` and `added_at` are free-form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub from_bank: String,
    pub to_bank: String,
    pub amount: String,
    pub status: String,
    pub added_at: String,
}

impl Transaction {
    /// Check that every field is set. Reports the first empty field in
    /// declaration order.
    pub fn ensure_complete(&self) -> Result<(), FabcarError> {
        let fields = [
            ("ID", &self.id),
            ("FromBank", &self.from_bank),
            ("ToBank", &self.to_bank),
            ("Amount", &self.amount),
            ("Status", &self.status),
            ("AddedAt", &self.added_at),
        ];

        match fields.into_iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(FabcarError::EmptyField(name)),
            None => Ok(()),
        }
    }
}

impl LedgerRecord for Transaction {
    const NAME: &'static str = "transaction";

    fn key(&self) -> &str {
        &self.id
    }
}

/// Private pricing details for a car. Not written by any contract function.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivateCarDetails {
    pub owner: String,
    pub price: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn car_uses_wire_field_names() {
        let car = Car {
            id: "CAR1".to_string(),
            make: "Toyota".to_string(),
            model: "Prius".to_string(),
            color: "blue".to_string(),
            owner: "Tom".to_string(),
            added_at: 1000,
        };

        let json = serde_json::to_string(&car).unwrap();
        assert_eq!(
            json,
            r#"{"id":"CAR1","make":"Toyota","model":"Prius","color":"blue","owner":"Tom","addedAt":1000}"#
        );
    }

    #[test]
    fn missing_fields_decode_to_zero_values() {
        let car: Car = serde_json::from_str(r#"{"id":"CAR9","unknown":true}"#).unwrap();
        assert_eq!(car.id, "CAR9");
        assert_eq!(car.owner, "");
        assert_eq!(car.added_at, 0);
    }

    #[test]
    fn string_timestamp_is_rejected_for_cars() {
        let result = serde_json::from_str::<Car>(r#"{"id":"CAR1","addedAt":"1000"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn transaction_uses_wire_field_names() {
        let transaction: Transaction = serde_json::from_str(
            r#"{"id":"T1","fromBank":"A","toBank":"B","amount":"10","status":"new","addedAt":"5"}"#,
        )
        .unwrap();

        assert_eq!(transaction.from_bank, "A");
        assert_eq!(transaction.to_bank, "B");
        assert_eq!(transaction.added_at, "5");
        assert!(transaction.ensure_complete().is_ok());
    }

    #[test]
    fn first_empty_transaction_field_is_reported() {
        let transaction = Transaction {
            id: "T1".to_string(),
            from_bank: "A".to_string(),
            amount: "10".to_string(),
            ..Default::default()
        };

        let error = transaction.ensure_complete().unwrap_err();
        assert_eq!(error.to_string(), "ToBank field must be a non-empty string");
    }
}
