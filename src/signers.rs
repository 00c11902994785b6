//! External signer bridges.
//!
//! Hardware wallets and extension wallets are collaborators, not part of the
//! SDK core: each exposes the same two capabilities and the SDK picks one at
//! runtime by probing support. Concrete bridges live with the embedding
//! application.

use async_trait::async_trait;

use crate::error::SdkError;

/// A transaction-signing collaborator (hardware wallet, extension wallet).
#[async_trait]
pub trait SignerBridge: Send + Sync {
    fn name(&self) -> &str;

    /// Whether this bridge can operate in the current host environment.
    fn is_supported(&self) -> bool;

    /// Sign and submit a transfer, returning the transaction hash.
    async fn send_transaction(
        &self,
        currency: &str,
        to_address: &str,
        amount: &str,
    ) -> Result<String, SdkError>;
}

/// Pick the first supported bridge, probe order preserved.
pub fn select_bridge(bridges: &[Box<dyn SignerBridge>]) -> Option<&dyn SignerBridge> {
    bridges.iter().find(|b| b.is_supported()).map(|b| b.as_ref())
}
