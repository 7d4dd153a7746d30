use serde_json::{json, Value};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{error::ChaincodeError, Config};

/// The fixed registry of functions the asset contract exposes to the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
pub enum ContractFunction {
    CreateCar,
    UpdateCarOwner,
    GetCarById,
    DeleteCarById,
    GetHistoryForAsset,
    GetContractsForQuery,
    SetTransaction,
    GetTransactionById,
    SetPrivateTransaction,
    ReadPrivateTransaction,
    GetDocumentUsingCarContract,
    CreateDocumentUsingCarContract,
}

impl ContractFunction {
    /// Resolve a function name as sent by a client. The name may be bare
    /// (`CreateCar`) or namespaced by the contract (`SmartContract:CreateCar`).
    pub fn resolve(name: &str, contract_name: &str) -> Result<Self, ChaincodeError> {
        let function = match name.split_once(':') {
            Some((namespace, function)) if namespace == contract_name => function,
            Some(_) => return Err(ChaincodeError::UnknownFunction(name.to_string())),
            None => name,
        };

        Self::from_str(function).map_err(|_| ChaincodeError::UnknownFunction(name.to_string()))
    }

    /// Parameter names, in call order.
    pub fn parameters(self) -> &'static [&'static str] {
        match self {
            Self::CreateCar => &["carData"],
            Self::UpdateCarOwner => &["carID", "newOwner"],
            Self::GetCarById | Self::DeleteCarById | Self::GetHistoryForAsset => &["carID"],
            Self::GetContractsForQuery => &["queryString"],
            Self::SetTransaction => &["transactionData"],
            Self::GetTransactionById => &["transactionID"],
            Self::SetPrivateTransaction | Self::ReadPrivateTransaction => &["args"],
            Self::GetDocumentUsingCarContract => &["documentID"],
            Self::CreateDocumentUsingCarContract => &["functionName", "documentData"],
        }
    }

    /// Functions taking a single list of strings and checking its length
    /// themselves.
    pub fn takes_argument_list(self) -> bool {
        matches!(self, Self::SetPrivateTransaction | Self::ReadPrivateTransaction)
    }

    /// Functions that write to the ledger and should be submitted for
    /// ordering rather than only evaluated.
    pub fn is_submit(self) -> bool {
        matches!(
            self,
            Self::CreateCar
                | Self::UpdateCarOwner
                | Self::DeleteCarById
                | Self::SetTransaction
                | Self::SetPrivateTransaction
                | Self::CreateDocumentUsingCarContract
        )
    }

    /// Check `args` against this function's parameters.
    ///
    /// A list parameter arrives either as one argument holding a JSON array of
    /// strings, or as the positional arguments themselves.
    pub(crate) fn bind_arguments(self, args: &[String]) -> Result<Vec<String>, ChaincodeError> {
        if self.takes_argument_list() {
            return Ok(match args {
                [single] => serde_json::from_str::<Vec<String>>(single)
                    .unwrap_or_else(|_| vec![single.clone()]),
                _ => args.to_vec(),
            });
        }

        let expected = self.parameters().len();
        if args.len() != expected {
            return Err(ChaincodeError::IncorrectArgumentCount { expected });
        }
        Ok(args.to_vec())
    }
}

/// Metadata document listing the contract's transactions and parameters.
pub(crate) fn metadata(config: &Config) -> Value {
    let transactions: Vec<Value> = ContractFunction::iter()
        .map(|function| {
            let parameters: Vec<Value> = function
                .parameters()
                .iter()
                .map(|name| json!({ "name": name, "schema": { "type": "string" } }))
                .collect();
            let tag = if function.is_submit() { "submit" } else { "evaluate" };

            json!({
                "name": function.to_string(),
                "parameters": parameters,
                "tag": [tag],
            })
        })
        .collect();

    json!({
        "info": {
            "title": config.chaincode_name,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "contracts": {
            (config.contract_name.clone()): {
                "name": config.contract_name,
                "transactions": transactions,
            }
        },
        "defaultContract": config.contract_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_bare_and_namespaced_names() {
        assert_eq!(
            ContractFunction::resolve("CreateCar", "SmartContract").unwrap(),
            ContractFunction::CreateCar
        );
        assert_eq!(
            ContractFunction::resolve("SmartContract:GetCarById", "SmartContract").unwrap(),
            ContractFunction::GetCarById
        );
    }

    #[test]
    fn rejects_foreign_namespace_and_unknown_names() {
        assert!(matches!(
            ContractFunction::resolve("DocumentContract:CreateDocument", "SmartContract"),
            Err(ChaincodeError::UnknownFunction(name)) if name == "DocumentContract:CreateDocument"
        ));
        assert!(matches!(
            ContractFunction::resolve("createCar", "SmartContract"),
            Err(ChaincodeError::UnknownFunction(_))
        ));
    }

    #[test]
    fn positional_argument_count_is_checked() {
        let args = vec!["CAR1".to_string()];
        assert!(matches!(
            ContractFunction::UpdateCarOwner.bind_arguments(&args),
            Err(ChaincodeError::IncorrectArgumentCount { expected: 2 })
        ));
        assert_eq!(ContractFunction::GetCarById.bind_arguments(&args).unwrap(), args);
    }

    #[test]
    fn list_argument_accepts_json_array_or_positional() {
        let encoded = vec![r#"["collectionTransactions","T1"]"#.to_string()];
        assert_eq!(
            ContractFunction::ReadPrivateTransaction
                .bind_arguments(&encoded)
                .unwrap(),
            vec!["collectionTransactions", "T1"]
        );

        let positional = vec!["collectionTransactions".to_string(), "T1".to_string()];
        assert_eq!(
            ContractFunction::ReadPrivateTransaction
                .bind_arguments(&positional)
                .unwrap(),
            positional
        );

        let single = vec!["collectionTransactions".to_string()];
        assert_eq!(
            ContractFunction::SetPrivateTransaction
                .bind_arguments(&single)
                .unwrap(),
            single
        );
    }

    #[test]
    fn metadata_lists_every_function() {
        let metadata = metadata(&Config::default());
        let transactions = metadata["contracts"]["SmartContract"]["transactions"]
            .as_array()
            .unwrap();

        assert_eq!(transactions.len(), ContractFunction::iter().count());
        assert_eq!(transactions[1]["name"], "UpdateCarOwner");
        assert_eq!(transactions[1]["parameters"][1]["name"], "newOwner");
        assert_eq!(transactions[2]["tag"][0], "evaluate");
    }
}
