//! Various testing utilities

use fabcar::{
    constants::document,
    types::{Car, ChaincodeResponse, Transaction},
};
use fabcar_chaincode::{ledger::TransientMap, AssetContract, Config};
use fabcar_ledger_memory::{Config as LedgerConfig, MemoryLedger, MemoryStub};
use rand::{distributions::Alphanumeric, Rng};
use serde_json::Value;
use std::sync::Arc;

use crate::{stubs::DocumentChaincode, FabcarTestError, Result};

/// Private collection defined on every [`TestLedger`].
pub const COLLECTION: &str = "collectionTransactions";

/// Add random text to the end of a string
/// # Example
/// ```
/// let car_id = fabcar_tests::tagged("CAR");
/// println!("{car_id}");
/// // Prints something like "CAR-1h65k35"
/// ```
pub fn tagged(text: impl AsRef<str>) -> String {
    let text = text.as_ref();
    let tag: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect();

    format!("{text}-{tag}")
}

pub fn sample_car(id: impl Into<String>, owner: impl Into<String>) -> Car {
    Car {
        id: id.into(),
        make: "Toyota".to_string(),
        model: "Prius".to_string(),
        color: "blue".to_string(),
        owner: owner.into(),
        added_at: 1000,
    }
}

pub fn sample_transaction(id: impl Into<String>) -> Transaction {
    Transaction {
        id: id.into(),
        from_bank: "First Bank".to_string(),
        to_bank: "Second Bank".to_string(),
        amount: "125.50".to_string(),
        status: "pending".to_string(),
        added_at: "1700000000".to_string(),
    }
}

/// A contract deployed on an in-memory ledger, with a document chaincode
/// installed next to it.
pub struct TestLedger {
    pub ledger: MemoryLedger,
    pub contract: AssetContract,
    pub documents: Arc<DocumentChaincode>,
}

impl TestLedger {
    pub async fn new() -> Self {
        let ledger = MemoryLedger::new(LedgerConfig {
            collections: Some(vec![COLLECTION.to_string()]),
            ..LedgerConfig::default()
        });
        let documents = Arc::new(DocumentChaincode::default());
        ledger
            .register_chaincode(document::CHANNEL, document::CHAINCODE, documents.clone())
            .await;

        Self {
            ledger,
            contract: AssetContract::new(Config::default()),
            documents,
        }
    }

    /// Start a transaction without transient data.
    pub fn begin(&self) -> MemoryStub {
        self.ledger.begin(TransientMap::new())
    }

    /// Invoke `function` and commit if it succeeded.
    pub async fn submit(&self, function: &str, args: &[&str]) -> ChaincodeResponse {
        self.submit_with_transient(function, args, TransientMap::new())
            .await
    }

    pub async fn submit_with_transient(
        &self,
        function: &str,
        args: &[&str],
        transient: TransientMap,
    ) -> ChaincodeResponse {
        let stub = self.ledger.begin(transient);
        let response = self.contract.invoke(&stub, function, &owned(args)).await;
        if response.is_success() {
            let _committed = stub.commit().await;
        }
        response
    }

    /// Invoke `function` without committing.
    pub async fn evaluate(&self, function: &str, args: &[&str]) -> ChaincodeResponse {
        let stub = self.begin();
        self.contract.invoke(&stub, function, &owned(args)).await
    }

    /// Evaluate `function` and parse its JSON payload.
    pub async fn evaluate_json(&self, function: &str, args: &[&str]) -> Result<Value> {
        let response = self.evaluate(function, args).await;
        Ok(serde_json::from_slice(&success(response)?.payload)?)
    }

    /// Create `car` through the contract and return the transaction id.
    pub async fn create_car(&self, car: &Car) -> Result<String> {
        let car_data = serde_json::to_string(car)?;
        let response = self.submit("CreateCar", &[car_data.as_str()]).await;
        Ok(success(response)?.payload_str().into_owned())
    }

    /// Write raw bytes straight to world state, bypassing the contract.
    pub async fn put_raw(&self, key: &str, value: &[u8]) {
        use fabcar_chaincode::ledger::ChaincodeStub;

        let stub = self.begin();
        stub.put_state(key, value.to_vec())
            .await
            .unwrap_or_else(|e| panic!("failed to stage {key}: {e}"));
        let _committed = stub.commit().await;
    }
}

/// Turn a failed response into an error.
pub fn success(response: ChaincodeResponse) -> Result<ChaincodeResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(FabcarTestError::Invocation {
            status: response.status,
            message: response.message,
        })
    }
}

/// Transient map holding `payload` under the transaction key.
pub fn transient_transaction(payload: impl Into<Vec<u8>>) -> TransientMap {
    TransientMap::from([(
        fabcar::constants::transient::TRANSACTION.to_string(),
        payload.into(),
    )])
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}
