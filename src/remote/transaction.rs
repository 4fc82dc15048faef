//! Transaction assembly for single-instruction program calls
//!
//! Message compilation, signing slots and wire encoding come from the Solana
//! SDK. This module adds the Anchor instruction framing and the packet guard.

use sha2::{Digest, Sha256};
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::Message;
use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

use crate::error::RemoteError;
use crate::models::Address;

/// First 8 bytes of `sha256("<namespace>:<name>")`
pub fn discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let hash = Sha256::digest(format!("{}:{}", namespace, name).as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash[..8]);
    out
}

/// Instruction data for a program method: discriminator then borsh args
pub fn instruction_data(method: &str, args: &[u8]) -> Vec<u8> {
    let mut data = discriminator("global", method).to_vec();
    data.extend_from_slice(args);
    data
}

/// Unsigned transaction for one instruction, paid for by `payer`
pub fn unsigned(payer: Address, instruction: Instruction, blockhash: Hash) -> Transaction {
    let payer = Pubkey::from(payer);
    let message = Message::new_with_blockhash(&[instruction], Some(&payer), &blockhash);
    Transaction::new_unsigned(message)
}

/// Fill the slot of a local co-signer, leaving the others untouched
pub fn co_sign(tx: &mut Transaction, signer: &dyn Signer) -> Result<(), RemoteError> {
    let signers = [signer];
    let blockhash = tx.message.recent_blockhash;
    tx.try_partial_sign(&signers[..], blockhash)
        .map_err(|e| RemoteError::SignerUnavailable(format!("cannot co-sign: {}", e)))
}

pub fn is_signed_by(tx: &Transaction, address: &Address) -> bool {
    let key = Pubkey::from(*address);
    let required = tx.message.header.num_required_signatures as usize;
    tx.message.account_keys[..required]
        .iter()
        .position(|k| *k == key)
        .map(|slot| tx.signatures[slot] != Signature::default())
        .unwrap_or(false)
}

/// Wire bytes for the wallet. A transaction that does not fit in a single
/// ledger packet is refused here rather than sent.
pub fn wire_bytes(tx: &Transaction) -> Result<Vec<u8>, RemoteError> {
    let wire = bincode::serialize(tx).map_err(|e| too_large(e.to_string()))?;
    if wire.len() > PACKET_DATA_SIZE {
        return Err(too_large(format!("{} bytes, limit is {}", wire.len(), PACKET_DATA_SIZE)));
    }
    Ok(wire)
}

fn too_large(detail: String) -> RemoteError {
    RemoteError::RemoteRejected(format!("transaction too large: {}", detail))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::signer::KeypairSigner;
    use solana_sdk::instruction::AccountMeta;

    fn key(b: u8) -> Pubkey {
        Pubkey::new_from_array([b; 32])
    }

    fn ix(accounts: Vec<AccountMeta>, data: Vec<u8>) -> Instruction {
        Instruction::new_with_bytes(key(9), &data, accounts)
    }

    #[test]
    fn test_discriminator_is_stable() {
        let d = discriminator("global", "add_gif");
        assert_eq!(d, discriminator("global", "add_gif"));
        assert_ne!(d, discriminator("global", "start_stuff_off"));
        assert_eq!(instruction_data("add_gif", &[1, 2]).len(), 10);
    }

    #[test]
    fn test_payer_comes_first_and_signs() {
        let base = KeypairSigner::from_seed([7u8; 32]);
        let payer = Address::new([1u8; 32]);
        let tx = unsigned(
            payer,
            ix(vec![AccountMeta::new(base.address().into(), true), AccountMeta::new(payer.into(), true)], vec![]),
            Hash::new_from_array([3u8; 32]),
        );
        assert_eq!(tx.message.account_keys[0], Pubkey::from(payer));
        assert_eq!(tx.message.header.num_required_signatures, 2);
        assert_eq!(tx.signatures.len(), 2);
        assert!(!is_signed_by(&tx, &payer));
    }

    #[test]
    fn test_co_sign_fills_only_own_slot() {
        let base = KeypairSigner::from_seed([7u8; 32]);
        let payer = Address::new([1u8; 32]);
        let mut tx = unsigned(
            payer,
            ix(vec![AccountMeta::new(base.address().into(), true), AccountMeta::new(payer.into(), true)], vec![]),
            Hash::new_from_array([3u8; 32]),
        );

        co_sign(&mut tx, &base).unwrap();
        assert!(is_signed_by(&tx, &base.address()));
        assert!(!is_signed_by(&tx, &payer));
    }

    #[test]
    fn test_co_sign_rejects_stranger() {
        let stranger = KeypairSigner::from_seed([8u8; 32]);
        let mut tx = unsigned(Address::new([1u8; 32]), ix(vec![], vec![]), Hash::default());
        assert!(matches!(co_sign(&mut tx, &stranger), Err(RemoteError::SignerUnavailable(_))));
    }

    #[test]
    fn test_wire_bytes_round_trip_through_bincode() {
        let tx = unsigned(Address::new([1u8; 32]), ix(vec![], vec![1, 2, 3]), Hash::default());
        let wire = wire_bytes(&tx).unwrap();
        let back: Transaction = bincode::deserialize(&wire).unwrap();
        assert_eq!(back, tx);
    }

    #[test]
    fn test_oversized_transaction_is_refused() {
        let tx = unsigned(Address::new([1u8; 32]), ix(vec![], vec![0u8; 2_000]), Hash::default());
        let err = wire_bytes(&tx).unwrap_err();
        assert!(matches!(&err, RemoteError::RemoteRejected(m) if m.contains("too large")));
    }

    #[test]
    fn test_data_beyond_u16_length_is_refused_not_truncated() {
        let tx = unsigned(Address::new([1u8; 32]), ix(vec![], vec![0u8; 70_000]), Hash::default());
        assert!(matches!(wire_bytes(&tx), Err(RemoteError::RemoteRejected(_))));
    }
}
