use solana_client::nonblocking::rpc_client::RpcClient as SolanaRpcClient;
use solana_sdk::{
    instruction::{AccountMeta as SolanaAccountMeta, Instruction as SolanaInstruction},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use tracing::info;

use crate::clients::TransactionSender;
use crate::error::{Result, TransmuterError};
use crate::types::{Address, Instruction, PendingTransaction, Signature};

impl From<Address> for Pubkey {
    fn from(address: Address) -> Self {
        Pubkey::new_from_array(address.to_bytes())
    }
}

impl From<Pubkey> for Address {
    fn from(pubkey: Pubkey) -> Self {
        Address::new(pubkey.to_bytes())
    }
}

fn to_solana_instruction(ix: &Instruction) -> SolanaInstruction {
    SolanaInstruction {
        program_id: ix.program_id.into(),
        accounts: ix
            .accounts
            .iter()
            .map(|meta| SolanaAccountMeta {
                pubkey: meta.pubkey.into(),
                is_signer: meta.is_signer,
                is_writable: meta.is_writable,
            })
            .collect(),
        data: ix.data.clone(),
    }
}

/// Parse a keypair from a bs58-encoded 64-byte secret.
pub fn keypair_from_base58(secret: &str) -> Result<Keypair> {
    let bytes = bs58::decode(secret.trim())
        .into_vec()
        .map_err(|e| TransmuterError::Solana(format!("bs58 decode error: {e}")))?;
    Keypair::from_bytes(&bytes).map_err(|e| TransmuterError::Solana(format!("invalid keypair: {e}")))
}

/// Signs pending transactions with a local keypair and submits them over RPC.
pub struct KeypairSender {
    rpc: SolanaRpcClient,
    payer: Keypair,
}

impl KeypairSender {
    pub fn new(rpc_url: &str, payer: Keypair) -> Self {
        Self {
            rpc: SolanaRpcClient::new(rpc_url.to_string()),
            payer,
        }
    }

    /// The wallet address transactions are paid and signed by.
    pub fn owner(&self) -> Address {
        self.payer.pubkey().into()
    }
}

impl TransactionSender for KeypairSender {
    async fn send_and_confirm(&self, tx: &PendingTransaction) -> Result<Signature> {
        if tx.is_empty() {
            return Err(TransmuterError::Validation("refusing to send an empty transaction".into()));
        }

        let instructions: Vec<SolanaInstruction> =
            tx.instructions.iter().map(to_solana_instruction).collect();

        let recent_blockhash = self
            .rpc
            .get_latest_blockhash()
            .await
            .map_err(|e| TransmuterError::Solana(format!("get blockhash: {e}")))?;

        let signed = Transaction::new_signed_with_payer(
            &instructions,
            Some(&self.payer.pubkey()),
            &[&self.payer],
            recent_blockhash,
        );

        let signature = self
            .rpc
            .send_and_confirm_transaction(&signed)
            .await
            .map_err(|e| TransmuterError::Solana(format!("send tx: {e}")))?;

        info!(%signature, instructions = instructions.len(), "transaction confirmed");
        Ok(signature.to_string())
    }
}
