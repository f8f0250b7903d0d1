//! The `fastdump`/`fastload`/`strbits` binary serialization format (§4.6).
//!
//! The wire format is: `size` words of `words[0..size]`, little-endian,
//! followed by one sentinel word (all-zeros for `tail = false`, all-ones for
//! `tail = true`), the whole thing deflated with a zlib wrapper.
//!
//! Compressor configuration is part of the dump contract (§4.6/§9): this
//! module pins [`flate2::Compression::default`] (zlib default level, zlib
//! header) so that dumps are deterministic for a fixed input on a fixed
//! `flate2`/`miniz_oxide` version. Exact bytes are compressor-dependent;
//! what's guaranteed is that `fastload(fastdump(s)) == s` (P3) and that a
//! validly-encoded buffer from any zlib-compatible encoder with this layout
//! decodes correctly.

use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::bits::{self, Word, WORD_BITS};
use crate::error::IntBitSetError;
use crate::word::WordStore;

const WORD_BYTES: usize = (WORD_BITS / 8) as usize;

/// Compress `store`'s canonical word sequence (§4.6 steps 1-3).
pub(crate) fn fastdump(store: &WordStore) -> Vec<u8> {
    let mut raw = Vec::with_capacity((store.size() + 1) * WORD_BYTES);
    for word in store.words() {
        raw.extend_from_slice(&word.to_le_bytes());
    }
    raw.extend_from_slice(&bits::tail_word(store.tail()).to_le_bytes());

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&raw)
        .expect("writing to an in-memory buffer cannot fail");
    encoder
        .finish()
        .expect("finishing an in-memory zlib stream cannot fail")
}

/// Decompress and strictly validate a buffer produced by [`fastdump`]
/// (§4.6 "Load").
pub(crate) fn fastload(data: &[u8]) -> Result<WordStore, IntBitSetError> {
    let mut decoder = ZlibDecoder::new(data);
    let mut raw = Vec::new();
    decoder
        .read_to_end(&mut raw)
        .map_err(|e| IntBitSetError::EncodingError(format!("not a valid zlib stream: {e}")))?;

    if raw.len() % WORD_BYTES != 0 {
        return Err(IntBitSetError::EncodingError(format!(
            "decompressed length {} is not a multiple of the word size {}",
            raw.len(),
            WORD_BYTES
        )));
    }

    let word_count = raw.len() / WORD_BYTES;
    if word_count == 0 {
        return Err(IntBitSetError::EncodingError(
            "decompressed buffer is missing the tail sentinel word".to_string(),
        ));
    }

    let words: Vec<Word> = raw
        .chunks_exact(WORD_BYTES)
        .map(|chunk| {
            let mut buf = [0u8; WORD_BYTES];
            buf.copy_from_slice(chunk);
            Word::from_le_bytes(buf)
        })
        .collect();

    let (body, sentinel) = words.split_at(word_count - 1);
    let sentinel = sentinel[0];
    let tail = if sentinel == bits::ALL_ONES {
        true
    } else if sentinel == bits::ALL_ZEROS {
        false
    } else {
        return Err(IntBitSetError::EncodingError(format!(
            "tail sentinel word 0x{sentinel:016x} is neither all-zeros nor all-ones"
        )));
    };

    let size = body.len();
    Ok(WordStore::from_parts(body.to_vec(), size, tail))
}

/// Render `size * W` bits as a string of `'0'`/`'1'` characters, bit 0 first
/// (§4.6 "String-bits dump", output-only).
pub(crate) fn strbits(store: &WordStore) -> String {
    let mut out = String::with_capacity(store.size() * WORD_BITS as usize);
    for word in store.words() {
        for pos in 0..WORD_BITS {
            out.push(if bits::test(*word, pos) { '1' } else { '0' });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_from(members: &[u64], tail: bool) -> WordStore {
        let mut s = WordStore::new(tail);
        for &m in members {
            s.set(m);
        }
        s
    }

    #[test]
    fn round_trip_finite() {
        let s = store_from(&[20, 30, 1000, 40], false);
        let bytes = fastdump(&s);
        let loaded = fastload(&bytes).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn round_trip_cofinite() {
        let s = store_from(&[20, 30, 1000, 40], true);
        let bytes = fastdump(&s);
        let loaded = fastload(&bytes).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn round_trip_empty() {
        let s = WordStore::new(false);
        let bytes = fastdump(&s);
        let loaded = fastload(&bytes).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn corrupt_buffer_is_encoding_error() {
        let garbage = vec![0xffu8; 16];
        assert!(matches!(
            fastload(&garbage),
            Err(IntBitSetError::EncodingError(_))
        ));
    }

    #[test]
    fn bad_length_after_decompress_is_encoding_error() {
        // A valid zlib stream of 3 raw bytes: not a multiple of WORD_BYTES.
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[1, 2, 3]).unwrap();
        let bytes = encoder.finish().unwrap();
        assert!(matches!(
            fastload(&bytes),
            Err(IntBitSetError::EncodingError(_))
        ));
    }

    #[test]
    fn bad_sentinel_is_encoding_error() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        // One word that is neither all-zeros nor all-ones.
        encoder.write_all(&0x1234u64.to_le_bytes()).unwrap();
        let bytes = encoder.finish().unwrap();
        assert!(matches!(
            fastload(&bytes),
            Err(IntBitSetError::EncodingError(_))
        ));
    }

    #[test]
    fn strbits_layout() {
        let s = store_from(&[0, 2], false);
        let bits = strbits(&s);
        assert_eq!(bits.len(), 64);
        assert_eq!(&bits[0..4], "1010");
    }

    #[test]
    fn decodes_literal_s1_vector() {
        // spec.md §8 scenario S1: A = {20,30,1000,40}, A.fastdump().
        let bytes: Vec<u8> = vec![
            0x78, 0x9c, 0x63, 0x60, 0x10, 0x70, 0x60, 0x60, 0x64, 0x18, 0x18, 0x80, 0x64, 0x2f,
            0x00, 0x2a, 0xb6, 0x00, 0x53,
        ];
        let loaded = fastload(&bytes).expect("S1 vector must decode");
        let members: Vec<u64> = crate::iter::FiniteIter::new(&loaded).collect();
        assert_eq!(members, vec![20, 30, 40, 1000]);
        assert!(!loaded.tail());
    }
}
