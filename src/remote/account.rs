//! Decoding of the shared `BaseAccount` record

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::RemoteError;
use crate::models::GifItem;
use crate::remote::transaction::discriminator;

/// Account record after the 8-byte Anchor discriminator
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct BaseAccount {
    pub total_gifs: u64,
    pub gif_list: Vec<GifItem>,
}

impl BaseAccount {
    /// Decode raw account data. Trailing bytes are ignored since the account
    /// is allocated with spare space.
    pub fn decode(data: &[u8]) -> Result<Self, RemoteError> {
        if data.len() < 8 || data[..8] != discriminator("account", "BaseAccount") {
            return Err(RemoteError::InvalidAccountData(String::from(
                "account discriminator does not match BaseAccount",
            )));
        }

        let mut body = &data[8..];
        BaseAccount::deserialize(&mut body).map_err(|e| RemoteError::InvalidAccountData(e.to_string()))
    }

    /// Discriminator followed by the borsh record, as the program stores it
    pub fn encode(&self) -> std::io::Result<Vec<u8>> {
        let mut out = discriminator("account", "BaseAccount").to_vec();
        self.serialize(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Address;

    fn sample() -> BaseAccount {
        BaseAccount {
            total_gifs: 2,
            gif_list: vec![
                GifItem::new("https://media.giphy.com/media/x5163Kf7A39LRJEtRz/giphy.gif", Address::new([1; 32])),
                GifItem::new("b", Address::new([2; 32])),
            ],
        }
    }

    #[test]
    fn test_layout_matches_program_record() {
        let account = BaseAccount {
            total_gifs: 1,
            gif_list: vec![GifItem::new("ab", Address::new([3; 32]))],
        };
        let data = account.encode().unwrap();
        assert_eq!(&data[8..16], &1u64.to_le_bytes());
        assert_eq!(&data[16..20], &1u32.to_le_bytes());
        assert_eq!(&data[20..26], &[2, 0, 0, 0, b'a', b'b']);
        assert_eq!(&data[26..], &[3u8; 32]);
    }

    #[test]
    fn test_decode_with_spare_space() {
        let mut data = sample().encode().unwrap();
        data.extend_from_slice(&[0u8; 64]);
        assert_eq!(BaseAccount::decode(&data).unwrap(), sample());
    }

    #[test]
    fn test_decode_empty_list() {
        let account = BaseAccount { total_gifs: 0, gif_list: vec![] };
        assert_eq!(BaseAccount::decode(&account.encode().unwrap()).unwrap().gif_list, vec![]);
    }

    #[test]
    fn test_wrong_discriminator_is_rejected() {
        let mut data = sample().encode().unwrap();
        data[0] ^= 0xff;
        assert!(matches!(BaseAccount::decode(&data), Err(RemoteError::InvalidAccountData(_))));
    }

    #[test]
    fn test_truncated_item_is_rejected() {
        let data = sample().encode().unwrap();
        let cut = &data[..data.len() - 10];
        assert!(matches!(BaseAccount::decode(cut), Err(RemoteError::InvalidAccountData(_))));
    }

    #[test]
    fn test_absurd_count_does_not_allocate_or_panic() {
        let mut data = discriminator("account", "BaseAccount").to_vec();
        data.extend_from_slice(&0u64.to_le_bytes());
        data.extend_from_slice(&u32::MAX.to_le_bytes());
        assert!(BaseAccount::decode(&data).is_err());
    }
}
