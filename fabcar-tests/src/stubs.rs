//! Purpose-built collaborators: a document chaincode to call into and a stub
//! whose ledger always fails.

use async_trait::async_trait;
use fabcar::types::ChaincodeResponse;
use fabcar_chaincode::ledger::{
    ChaincodeStub, HistoryQueryIterator, LedgerError, StateQueryIterator, TransientMap,
};
use fabcar_ledger_memory::ChaincodeHandler;
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Minimal document chaincode. Stores documents by their `id` field and
/// records every call it receives.
#[derive(Debug, Default)]
pub struct DocumentChaincode {
    documents: Mutex<HashMap<String, String>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl DocumentChaincode {
    /// Arguments of every call received, in order.
    pub async fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl ChaincodeHandler for DocumentChaincode {
    async fn invoke(&self, args: Vec<Vec<u8>>) -> ChaincodeResponse {
        let args: Vec<String> = args
            .iter()
            .map(|arg| String::from_utf8_lossy(arg).into_owned())
            .collect();
        self.calls.lock().await.push(args.clone());

        match args.as_slice() {
            [function, id] if function == "GetDocumentById" => {
                match self.documents.lock().await.get(id) {
                    Some(document) => ChaincodeResponse::success(document.clone()),
                    None => ChaincodeResponse::error(format!("Document {id} does not exist")),
                }
            }
            [function, data] if function == "CreateDocument" => {
                let id = serde_json::from_str::<serde_json::Value>(data)
                    .ok()
                    .and_then(|document| document["id"].as_str().map(str::to_string));
                match id {
                    Some(id) => {
                        let mut documents = self.documents.lock().await;
                        let _previous = documents.insert(id.clone(), data.clone());
                        ChaincodeResponse::success(id)
                    }
                    None => ChaincodeResponse::with_status(400, "Document must have an id"),
                }
            }
            _ => ChaincodeResponse::error(format!("Unknown document request {args:?}")),
        }
    }
}

/// Stub whose every ledger access fails with the same error. Remote calls
/// answer with `remote_response`.
pub struct FailingStub {
    pub error: LedgerError,
    pub remote_response: ChaincodeResponse,
}

impl FailingStub {
    pub fn new(reason: &str) -> Self {
        Self {
            error: LedgerError::Internal(reason.to_string()),
            remote_response: ChaincodeResponse::error(reason),
        }
    }

    fn fail<T>(&self) -> Result<T, LedgerError> {
        Err(self.error.clone())
    }
}

#[async_trait]
impl ChaincodeStub for FailingStub {
    fn tx_id(&self) -> &str {
        "failing-tx"
    }

    fn channel_id(&self) -> &str {
        "mychannel"
    }

    fn tx_timestamp(&self) -> OffsetDateTime {
        OffsetDateTime::UNIX_EPOCH
    }

    async fn get_state(&self, _key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.fail()
    }

    async fn put_state(&self, _key: &str, _value: Vec<u8>) -> Result<(), LedgerError> {
        self.fail()
    }

    async fn del_state(&self, _key: &str) -> Result<(), LedgerError> {
        self.fail()
    }

    async fn get_private_data(
        &self,
        _collection: &str,
        _key: &str,
    ) -> Result<Option<Vec<u8>>, LedgerError> {
        self.fail()
    }

    async fn put_private_data(
        &self,
        _collection: &str,
        _key: &str,
        _value: Vec<u8>,
    ) -> Result<(), LedgerError> {
        self.fail()
    }

    async fn del_private_data(&self, _collection: &str, _key: &str) -> Result<(), LedgerError> {
        self.fail()
    }

    async fn get_history_for_key(&self, _key: &str) -> Result<HistoryQueryIterator, LedgerError> {
        self.fail()
    }

    async fn get_query_result(&self, _query: &str) -> Result<StateQueryIterator, LedgerError> {
        self.fail()
    }

    async fn set_event(&self, _name: &str, _payload: Vec<u8>) -> Result<(), LedgerError> {
        self.fail()
    }

    async fn get_transient(&self) -> Result<TransientMap, LedgerError> {
        self.fail()
    }

    async fn invoke_chaincode(
        &self,
        _chaincode_name: &str,
        _args: Vec<Vec<u8>>,
        _channel: &str,
    ) -> ChaincodeResponse {
        self.remote_response.clone()
    }
}
