//! Block-cipher engine for the config encryption library
//!
//! The wire format produced by the envelope plugins is AES-ECB with PKCS5
//! padding. ECB is deterministic and leaks block-level repetition; the
//! inputs here are short, high-entropy key blobs or already-opaque
//! content, and the byte format must be preserved for compatibility with
//! previously encrypted values. Do not switch modes here.

mod ecb;
mod padding;

pub use ecb::{ecb_decrypt, ecb_encrypt, AES_BLOCK_SIZE};
pub use padding::{pkcs5_pad, pkcs5_unpad};
