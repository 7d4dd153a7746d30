//! Constants that are shared between other crates in this workspace.
//! Crate-specific constants should go in their respective crates.

/// Name the asset contract registers its transactions under.
pub const CONTRACT_NAME: &str = "SmartContract";
/// Name of the deployed chaincode. Also used as the tracing span label.
pub const CHAINCODE_NAME: &str = "fabcar_cc";
/// Reserved function returning the contract's metadata document.
pub const METADATA_FUNCTION: &str = "org.hyperledger.fabric:GetMetadata";

pub mod events {
    /// Emitted with the stored record whenever a car or transaction is created.
    pub const CREATE_ASSET: &str = "CreateAsset";
}

pub mod transient {
    /// Transient map entry holding a private transaction payload.
    pub const TRANSACTION: &str = "transaction";
}

pub mod document {
    pub const CHAINCODE: &str = "document_cc";
    pub const CHANNEL: &str = "mychannel";
    pub const GET_DOCUMENT_FUNCTION: &str = "GetDocumentById";
}
