use crate::error::{Error, Result};

/// Pads data to a multiple of `block_size` using PKCS5 padding
///
/// Appends `block_size - (len % block_size)` bytes, each holding that pad
/// length. A plaintext whose length is already a multiple of the block
/// size receives a full extra block of padding.
pub fn pkcs5_pad(data: &[u8], block_size: usize) -> Vec<u8> {
    let pad_len = block_size - (data.len() % block_size);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.extend(std::iter::repeat(pad_len as u8).take(pad_len));
    padded
}

/// Strips PKCS5 padding from data
///
/// Reads the last byte as the pad length and truncates. The pad bytes are
/// not checked for internal consistency, so corrupted ciphertext yields
/// garbage output rather than an error. Only a pad length of zero or one
/// exceeding the input length is rejected, since neither has a
/// representable result.
pub fn pkcs5_unpad(data: &[u8]) -> Result<Vec<u8>> {
    let pad_len = match data.last() {
        Some(&b) => b as usize,
        None => return Err(Error::Codec("cannot unpad empty input".into())),
    };
    if pad_len == 0 || pad_len > data.len() {
        return Err(Error::Codec(format!(
            "invalid pad length {} for input of {} bytes",
            pad_len,
            data.len()
        )));
    }
    Ok(data[..data.len() - pad_len].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: usize = 16;

    #[test]
    fn test_pad_round_trip_all_lengths() {
        for len in 0..=4 * BLOCK {
            let data: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let padded = pkcs5_pad(&data, BLOCK);
            assert_eq!(padded.len() % BLOCK, 0);
            let unpadded = pkcs5_unpad(&padded).expect("unpad failed");
            assert_eq!(unpadded, data, "round trip failed for length {}", len);
        }
    }

    #[test]
    fn test_aligned_input_gets_full_block() {
        let data = [7u8; BLOCK];
        let padded = pkcs5_pad(&data, BLOCK);
        assert_eq!(padded.len(), 2 * BLOCK);
        assert!(padded[BLOCK..].iter().all(|&b| b == BLOCK as u8));
    }

    #[test]
    fn test_unpad_does_not_validate_pad_bytes() {
        // Last byte claims 4 bytes of padding but the pad bytes disagree;
        // the contract is to truncate anyway.
        let data = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 0xAA, 0xBB, 0xCC, 4];
        let unpadded = pkcs5_unpad(&data).expect("unpad failed");
        assert_eq!(unpadded, &data[..12]);
    }

    #[test]
    fn test_unpad_rejects_out_of_range_pad() {
        assert!(pkcs5_unpad(&[]).is_err());
        assert!(pkcs5_unpad(&[0, 0, 0, 0]).is_err());
        assert!(pkcs5_unpad(&[1, 2, 17]).is_err());
    }
}
