//! Signing and broadcasting attestation transactions.

use super::request::{AttestationRequest, MultiAttestationRequest};
use crate::domain::{Address, TxHash};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ethers::abi::{Abi, Function, Param, ParamType, StateMutability, Token};
use ethers::contract::Contract;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{H160, H256, U64};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Setup, signing or RPC failure, carrying the node's message.
    #[error("{0}")]
    Rpc(String),
    #[error("expiration {0} is not after the unix epoch")]
    InvalidExpiration(DateTime<Utc>),
    #[error("transaction {0:#x} dropped before confirmation")]
    Dropped(TxHash),
    #[error("transaction {0:#x} reverted")]
    Reverted(TxHash),
}

/// Submits one encoded attestation per call and waits for inclusion.
#[async_trait]
pub trait Submitter: Send + Sync + fmt::Debug {
    /// Attest `payload` for `recipient` under `schema`.
    ///
    /// Returns the hash of the confirmed transaction. Every call creates a new
    /// on-chain attestation; there is no idempotency key.
    async fn submit(
        &self,
        recipient: &Address,
        payload: Vec<u8>,
        expiration: DateTime<Utc>,
        schema: H256,
    ) -> Result<TxHash, SubmitError>;
}

/// `multiAttest((bytes32,(address,uint64,bool,bytes32,bytes,uint256)[])[])`,
/// payable, returning `bytes32[]`.
#[allow(deprecated)]
fn multi_attest_function() -> Function {
    let attestation_data = ParamType::Tuple(vec![
        ParamType::Address,
        ParamType::Uint(64),
        ParamType::Bool,
        ParamType::FixedBytes(32),
        ParamType::Bytes,
        ParamType::Uint(256),
    ]);
    let multi_request = ParamType::Tuple(vec![
        ParamType::FixedBytes(32),
        ParamType::Array(Box::new(attestation_data)),
    ]);

    Function {
        name: "multiAttest".to_string(),
        inputs: vec![Param {
            name: "multiRequests".to_string(),
            kind: ParamType::Array(Box::new(multi_request)),
            internal_type: None,
        }],
        outputs: vec![Param {
            name: String::new(),
            kind: ParamType::Array(Box::new(ParamType::FixedBytes(32))),
            internal_type: None,
        }],
        constant: None,
        state_mutability: StateMutability::Payable,
    }
}

fn multi_attest_abi() -> Abi {
    let function = multi_attest_function();
    let mut abi = Abi::default();
    abi.functions.insert(function.name.clone(), vec![function]);
    abi
}

type SignerClient = SignerMiddleware<Provider<Http>, LocalWallet>;

/// Submitter for an EAS-style attestation contract exposing `multiAttest`.
pub struct EasSubmitter {
    contract: Contract<SignerClient>,
}

impl EasSubmitter {
    /// Connect to `rpc_url` and prepare a signing client for `contract_address`.
    ///
    /// When `chain_id` is `None` it is queried from the node.
    pub async fn connect(
        rpc_url: &str,
        private_key: &str,
        contract_address: H160,
        chain_id: Option<u64>,
    ) -> Result<Self, SubmitError> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| SubmitError::Rpc(format!("invalid rpc url {}: {}", rpc_url, e)))?;
        Self::with_provider(provider, private_key, contract_address, chain_id).await
    }

    /// Like [`EasSubmitter::connect`], over an already configured provider.
    pub async fn with_provider(
        provider: Provider<Http>,
        private_key: &str,
        contract_address: H160,
        chain_id: Option<u64>,
    ) -> Result<Self, SubmitError> {
        let chain_id = match chain_id {
            Some(id) => id,
            None => provider
                .get_chainid()
                .await
                .map_err(|e| SubmitError::Rpc(format!("failed to query chain id: {}", e)))?
                .as_u64(),
        };

        let wallet = private_key
            .trim()
            .trim_start_matches("0x")
            .parse::<LocalWallet>()
            .map_err(|e| SubmitError::Rpc(format!("invalid signing key: {}", e)))?
            .with_chain_id(chain_id);

        if contract_address == H160::zero() {
            return Err(SubmitError::Rpc("attester contract address is zero".to_string()));
        }

        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let contract = Contract::new(contract_address, multi_attest_abi(), client);

        info!(
            contract = %format!("{:#x}", contract_address),
            chain_id,
            "Attestation submitter ready"
        );
        Ok(Self { contract })
    }
}

impl fmt::Debug for EasSubmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EasSubmitter")
            .field("contract", &self.contract.address())
            .finish()
    }
}

#[async_trait]
impl Submitter for EasSubmitter {
    async fn submit(
        &self,
        recipient: &Address,
        payload: Vec<u8>,
        expiration: DateTime<Utc>,
        schema: H256,
    ) -> Result<TxHash, SubmitError> {
        let request = AttestationRequest::new(*recipient, expiration, payload)?;
        let multi = MultiAttestationRequest::single(schema, request);
        let args = Token::Array(vec![multi.into_token()]);

        let call = self
            .contract
            .method::<_, Vec<H256>>("multiAttest", args)
            .map_err(|e| SubmitError::Rpc(e.to_string()))?;

        let pending = call
            .send()
            .await
            .map_err(|e| SubmitError::Rpc(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        debug!(
            recipient = %recipient,
            tx_hash = %format!("{:#x}", tx_hash),
            "Attestation broadcast"
        );

        let receipt = pending
            .await
            .map_err(|e| SubmitError::Rpc(e.to_string()))?
            .ok_or(SubmitError::Dropped(tx_hash))?;

        if receipt.status == Some(U64::zero()) {
            return Err(SubmitError::Reverted(receipt.transaction_hash));
        }
        Ok(receipt.transaction_hash)
    }
}
