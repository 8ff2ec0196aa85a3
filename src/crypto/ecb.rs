use crate::error::{Error, Result};
use aes::cipher::consts::U16;
use aes::cipher::{
    generic_array::GenericArray, BlockDecrypt, BlockEncrypt, BlockSizeUser, KeyInit,
};
use aes::{Aes128, Aes256};

/// AES block size in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// Encrypts data with AES in ECB mode
///
/// The key length selects the cipher: 16 bytes for AES-128, 32 bytes for
/// AES-256. Input must already be padded to a multiple of the block size.
pub fn ecb_encrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    check_block_multiple(data)?;

    match key.len() {
        16 => {
            let cipher = Aes128::new(GenericArray::from_slice(key));
            Ok(encrypt_blocks(&cipher, data))
        }
        32 => {
            let cipher = Aes256::new(GenericArray::from_slice(key));
            Ok(encrypt_blocks(&cipher, data))
        }
        len => Err(Error::InvalidArgument(format!(
            "AES key must be 16 or 32 bytes, got {}",
            len
        ))),
    }
}

/// Decrypts data with AES in ECB mode
///
/// Mirror of [`ecb_encrypt`]; the output still carries its PKCS5 padding.
pub fn ecb_decrypt(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    check_block_multiple(data)?;

    match key.len() {
        16 => {
            let cipher = Aes128::new(GenericArray::from_slice(key));
            Ok(decrypt_blocks(&cipher, data))
        }
        32 => {
            let cipher = Aes256::new(GenericArray::from_slice(key));
            Ok(decrypt_blocks(&cipher, data))
        }
        len => Err(Error::InvalidArgument(format!(
            "AES key must be 16 or 32 bytes, got {}",
            len
        ))),
    }
}

fn check_block_multiple(data: &[u8]) -> Result<()> {
    if data.len() % AES_BLOCK_SIZE != 0 {
        return Err(Error::BlockSize {
            len: data.len(),
            block_size: AES_BLOCK_SIZE,
        });
    }
    Ok(())
}

// Each block is transformed independently: no chaining, no IV.
fn encrypt_blocks<C>(cipher: &C, data: &[u8]) -> Vec<u8>
where
    C: BlockEncrypt + BlockSizeUser<BlockSize = U16>,
{
    let mut out = data.to_vec();
    for block in out.chunks_exact_mut(AES_BLOCK_SIZE) {
        cipher.encrypt_block(GenericArray::from_mut_slice(block));
    }
    out
}

fn decrypt_blocks<C>(cipher: &C, data: &[u8]) -> Vec<u8>
where
    C: BlockDecrypt + BlockSizeUser<BlockSize = U16>,
{
    let mut out = data.to_vec();
    for block in out.chunks_exact_mut(AES_BLOCK_SIZE) {
        cipher.decrypt_block(GenericArray::from_mut_slice(block));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{pkcs5_pad, pkcs5_unpad};

    #[test]
    fn test_aes128_known_vector() {
        // FIPS-197 appendix C.1
        let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
        let plaintext = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let expected = hex::decode("69c4e0d86a7b0430d8cdb78070b4c55a").unwrap();

        let ciphertext = ecb_encrypt(&key, &plaintext).expect("encrypt failed");
        assert_eq!(ciphertext, expected);
        let decrypted = ecb_decrypt(&key, &ciphertext).expect("decrypt failed");
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_aes256_known_vector() {
        // FIPS-197 appendix C.3
        let key =
            hex::decode("000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f")
                .unwrap();
        let plaintext = hex::decode("00112233445566778899aabbccddeeff").unwrap();
        let expected = hex::decode("8ea2b7ca516745bfeafc49904b496089").unwrap();

        let ciphertext = ecb_encrypt(&key, &plaintext).expect("encrypt failed");
        assert_eq!(ciphertext, expected);
        let decrypted = ecb_decrypt(&key, &ciphertext).expect("decrypt failed");
        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_identical_blocks_encrypt_identically() {
        // ECB determinism is part of the wire contract.
        let key = [0x42u8; 16];
        let data = [0x11u8; 32];
        let ciphertext = ecb_encrypt(&key, &data).expect("encrypt failed");
        assert_eq!(ciphertext[..16], ciphertext[16..]);
    }

    #[test]
    fn test_round_trip_with_padding() {
        let key = [7u8; 32];
        let message = b"hello-world";
        let padded = pkcs5_pad(message, AES_BLOCK_SIZE);
        let ciphertext = ecb_encrypt(&key, &padded).expect("encrypt failed");
        let decrypted = ecb_decrypt(&key, &ciphertext).expect("decrypt failed");
        assert_eq!(pkcs5_unpad(&decrypted).unwrap(), message);
    }

    #[test]
    fn test_rejects_partial_block() {
        let key = [0u8; 16];
        let err = ecb_encrypt(&key, &[1, 2, 3]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::BlockSize { len: 3, block_size: 16 }
        ));
        assert!(ecb_decrypt(&key, &[0u8; 17]).is_err());
    }

    #[test]
    fn test_rejects_bad_key_length() {
        assert!(ecb_encrypt(&[0u8; 24], &[0u8; 16]).is_err());
        assert!(ecb_decrypt(&[0u8; 8], &[0u8; 16]).is_err());
    }
}
