//! Remote state client - fetch and mutate the shared GIF account

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::transaction::Transaction;

use crate::config::PortalConfig;
use crate::constants::SYSTEM_PROGRAM_ID;
use crate::error::RemoteError;
use crate::models::{Address, GifItem, TxSignature};
use crate::remote::account::BaseAccount;
use crate::remote::ledger::LedgerRpc;
use crate::remote::transaction::{co_sign, instruction_data, unsigned, wire_bytes};

/// The session identity that authorizes writes.
///
/// Implemented by the wallet session; the signer fills its own slot and
/// submits the transaction.
#[async_trait]
pub trait TransactionSender: Send + Sync {
    fn address(&self) -> Address;

    async fn sign_and_send(&self, tx: &Transaction) -> Result<TxSignature, RemoteError>;
}

pub struct RemoteStateClient {
    config: Arc<PortalConfig>,
    ledger: Arc<dyn LedgerRpc>,
}

impl RemoteStateClient {
    pub fn new(config: Arc<PortalConfig>, ledger: Arc<dyn LedgerRpc>) -> Self {
        RemoteStateClient { config, ledger }
    }

    fn base_account(&self) -> Result<Address, RemoteError> {
        self.config.base_account.ok_or_else(|| {
            RemoteError::SignerUnavailable(String::from(
                "no base account configured (set base_account or base_account_keypair)",
            ))
        })
    }

    /// Read the current list. A missing account is `AccountNotInitialized`.
    pub async fn fetch_collection(&self) -> Result<Vec<GifItem>, RemoteError> {
        let base = self.base_account()?;
        let info = self
            .ledger
            .account_info(&base, self.config.commitment)
            .await?
            .ok_or(RemoteError::AccountNotInitialized)?;

        if info.owner != self.config.program_id {
            return Err(RemoteError::InvalidAccountData(format!(
                "account {} is owned by {}, not the portal program",
                base, info.owner
            )));
        }

        let account = BaseAccount::decode(&info.data)?;
        tracing::debug!(account = %base, total = account.total_gifs, "Fetched collection");
        Ok(account.gif_list)
    }

    /// One-time creation of the shared account, co-signed by the base keypair
    pub async fn initialize_account(&self, sender: &dyn TransactionSender) -> Result<TxSignature, RemoteError> {
        let base_signer = self.config.base_signer.clone().ok_or_else(|| {
            RemoteError::SignerUnavailable(String::from("base account keypair is not configured"))
        })?;
        let user = sender.address();
        let system_program = Address::from_str(SYSTEM_PROGRAM_ID)
            .map_err(|e| RemoteError::SignerUnavailable(e.to_string()))?;

        let instruction = Instruction::new_with_bytes(
            self.config.program_id.into(),
            &instruction_data("start_stuff_off", &[]),
            vec![
                AccountMeta::new(base_signer.address().into(), true),
                AccountMeta::new(user.into(), true),
                AccountMeta::new_readonly(system_program.into(), false),
            ],
        );

        let mut tx = self.build(user, instruction).await?;
        co_sign(&mut tx, base_signer.as_ref())?;

        tracing::info!(user = %user, base = %base_signer.address(), "Submitting start_stuff_off");
        self.submit(&tx, sender).await
    }

    /// Append one link. The text is passed through as-is.
    pub async fn append_item(&self, link: &str, sender: &dyn TransactionSender) -> Result<TxSignature, RemoteError> {
        let base = self.base_account()?;
        let user = sender.address();

        let args = borsh::to_vec(link).map_err(|e| RemoteError::RemoteRejected(e.to_string()))?;
        let instruction = Instruction::new_with_bytes(
            self.config.program_id.into(),
            &instruction_data("add_gif", &args),
            vec![AccountMeta::new(base.into(), false), AccountMeta::new(user.into(), true)],
        );

        let tx = self.build(user, instruction).await?;
        tracing::info!(user = %user, len = link.len(), "Submitting add_gif");
        self.submit(&tx, sender).await
    }

    async fn build(&self, payer: Address, instruction: Instruction) -> Result<Transaction, RemoteError> {
        let blockhash = self.ledger.latest_blockhash(self.config.commitment).await?;
        Ok(unsigned(payer, instruction, blockhash))
    }

    /// Size check before the wallet sees it; the wallet only fills a
    /// preallocated slot so the length does not change after this.
    async fn submit(&self, tx: &Transaction, sender: &dyn TransactionSender) -> Result<TxSignature, RemoteError> {
        let size = wire_bytes(tx)?.len();
        tracing::debug!(bytes = size, "Transaction fits in one packet");
        sender.sign_and_send(tx).await
    }
}
