use fabcar::{types::LedgerRecord, FabcarError};
use tracing::{debug, instrument};

use crate::{error::ChaincodeError, ledger::ChaincodeStub, Config};

/// Everything an operation may touch while it runs: the host's stub for the
/// current transaction and the contract configuration.
pub(crate) struct Context<'a, S: ?Sized> {
    pub stub: &'a S,
    pub config: &'a Config,
}

impl<S: ChaincodeStub + ?Sized> Context<'_, S> {
    pub(crate) fn tx_id(&self) -> String {
        self.stub.tx_id().to_string()
    }

    /// Read and decode the record stored under `key`. `read_context` prefixes
    /// the error if the host fails the read.
    #[instrument(skip(self), err(Debug))]
    pub(crate) async fn read_record<T: LedgerRecord>(
        &self,
        key: &str,
        read_context: &str,
    ) -> Result<T, ChaincodeError> {
        let bytes = self
            .stub
            .get_state(key)
            .await
            .map_err(|source| ChaincodeError::Read {
                context: read_context.to_string(),
                source,
            })?
            .ok_or_else(|| ChaincodeError::NotFound(key.to_string()))?;

        decode_stored(key, &bytes)
    }

    /// Encode `record` and stage it under `key`.
    pub(crate) async fn write_record<T: LedgerRecord>(
        &self,
        key: &str,
        record: &T,
    ) -> Result<(), ChaincodeError> {
        let bytes = encode(record)?;
        self.stub
            .put_state(key, bytes)
            .await
            .map_err(|source| ChaincodeError::Write {
                context: format!("Failed to write {} {key} to world state", T::NAME),
                source,
            })
    }

    /// Store a newly created record under its id and announce it with the
    /// create event. Returns the transaction id.
    pub(crate) async fn create_record<T: LedgerRecord>(
        &self,
        record: &T,
    ) -> Result<String, ChaincodeError> {
        if record.key().is_empty() {
            return Err(FabcarError::EmptyField("id").into());
        }
        let bytes = encode(record)?;

        let event_name = &self.config.create_event_name;
        self.stub
            .set_event(event_name, bytes)
            .await
            .map_err(|source| ChaincodeError::Write {
                context: format!("Failed to set event {event_name}"),
                source,
            })?;

        self.write_record(record.key(), record).await?;
        Ok(self.tx_id())
    }

    /// Call the document chaincode with `params` and return its payload.
    #[instrument(skip_all, err(Debug))]
    pub(crate) async fn invoke_document_chaincode(
        &self,
        params: [&str; 2],
    ) -> Result<String, ChaincodeError> {
        let document = &self.config.document;
        let args = params.iter().map(|param| param.as_bytes().to_vec()).collect();
        debug!(
            chaincode = %document.chaincode_name,
            channel = %document.channel,
            function = params[0],
            "Invoking document chaincode."
        );

        let response = self
            .stub
            .invoke_chaincode(&document.chaincode_name, args, &document.channel)
            .await;

        if !response.is_success() {
            return Err(ChaincodeError::RemoteInvocation {
                chaincode: document.chaincode_name.clone(),
                channel: document.channel.clone(),
                status: response.status,
                message: response.message,
            });
        }

        Ok(response.payload_str().into_owned())
    }
}

/// Decode a record supplied by the caller.
pub(crate) fn decode_request<T: LedgerRecord>(data: &[u8]) -> Result<T, ChaincodeError> {
    serde_json::from_slice(data).map_err(|source| ChaincodeError::Decode {
        record: T::NAME,
        source,
    })
}

/// Decode a record read back from the ledger.
pub(crate) fn decode_stored<T: LedgerRecord>(key: &str, bytes: &[u8]) -> Result<T, ChaincodeError> {
    serde_json::from_slice(bytes).map_err(|source| ChaincodeError::CorruptState {
        record: T::NAME,
        key: key.to_string(),
        source,
    })
}

pub(crate) fn encode<T: LedgerRecord>(record: &T) -> Result<Vec<u8>, ChaincodeError> {
    serde_json::to_vec(record).map_err(|source| ChaincodeError::Encode {
        record: T::NAME,
        source,
    })
}
