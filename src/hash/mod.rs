//! Module ``hash`` implement the 32-bit hash function used by the trie
//! index, along with a table-driven population count.
//!
//! Keys hash to a stable ``u32`` per process:
//!
//! * Text keys digest their UTF-8 bytes through [mix32], a murmur-family
//!   avalanche hash.
//! * Integer and boolean keys coerce to a 32-bit pattern and spread the
//!   bits through [fmix32].
//! * Opaque keys carry an identity tag assigned once from a process-wide
//!   monotonic counter, refer [new_ident_tag], and spread through [fmix32].

use lazy_static::lazy_static;

use std::sync::atomic::{AtomicU64, Ordering::SeqCst};
use std::sync::Arc;

const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

/// Trait for key types that can feed the trie index. Implementations
/// must be deterministic within a process and independent of insertion
/// history.
pub trait TrieHash {
    /// Return a stable 32-bit digest for this key.
    fn hash32(&self) -> u32;
}

/// Murmur-family 32-bit hash over a byte stream, seed ZERO.
///
/// Bytes are ingested in 32-bit little-endian groups with
/// multiply/rotate/multiply mixing, trailing bytes are padded in, and the
/// digest is finalized with [fmix32].
pub fn mix32(bytes: &[u8]) -> u32 {
    let mut h: u32 = 0;

    let n_blocks = bytes.len() / 4;
    for i in 0..n_blocks {
        let block = [
            bytes[i * 4],
            bytes[i * 4 + 1],
            bytes[i * 4 + 2],
            bytes[i * 4 + 3],
        ];
        let mut k = u32::from_le_bytes(block);
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);

        h ^= k;
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let tail = &bytes[n_blocks * 4..];
    let mut k: u32 = 0;
    if tail.len() >= 3 {
        k ^= u32::from(tail[2]) << 16;
    }
    if tail.len() >= 2 {
        k ^= u32::from(tail[1]) << 8;
    }
    if !tail.is_empty() {
        k ^= u32::from(tail[0]);
        k = k.wrapping_mul(C1);
        k = k.rotate_left(15);
        k = k.wrapping_mul(C2);
        h ^= k;
    }

    h ^= bytes.len() as u32;
    fmix32(h)
}

/// Finalization rounds of the murmur-family hash, two xor-shift-multiply
/// steps. Also used stand-alone to spread 32-bit key patterns.
pub fn fmix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Fold a 64-bit pattern onto 32 bits and spread with [fmix32].
#[inline]
pub fn fold64(w: u64) -> u32 {
    fmix32((w ^ (w >> 32)) as u32)
}

static IDENT_SEED: AtomicU64 = AtomicU64::new(1);

/// Assign the next identity tag for an opaque key. Tags are process-lived
/// and monotonically increasing, never recycled.
pub fn new_ident_tag() -> u64 {
    IDENT_SEED.fetch_add(1, SeqCst)
}

lazy_static! {
    static ref POPCOUNT16: Vec<u8> = {
        let mut table = vec![0_u8; 65536];
        for (word, count) in table.iter_mut().enumerate() {
            let mut w = word;
            while w > 0 {
                *count += (w & 1) as u8;
                w >>= 1;
            }
        }
        table
    };
}

/// Population count for a 32-bit word, via two lookups into a
/// pre-computed 16-bit table.
#[inline]
pub fn popcount(w: u32) -> u32 {
    let table = &*POPCOUNT16;
    u32::from(table[(w & 0xFFFF) as usize]) + u32::from(table[(w >> 16) as usize])
}

impl TrieHash for str {
    fn hash32(&self) -> u32 {
        mix32(self.as_bytes())
    }
}

impl TrieHash for String {
    fn hash32(&self) -> u32 {
        mix32(self.as_bytes())
    }
}

impl TrieHash for Arc<str> {
    fn hash32(&self) -> u32 {
        mix32(self.as_bytes())
    }
}

impl TrieHash for bool {
    fn hash32(&self) -> u32 {
        fmix32(u32::from(*self))
    }
}

macro_rules! impl_trie_hash_int32 {
    ($($type:ident),*) => (
        $(
            impl TrieHash for $type {
                fn hash32(&self) -> u32 {
                    fmix32(*self as u32)
                }
            }
        )*
    );
}

macro_rules! impl_trie_hash_int64 {
    ($($type:ident),*) => (
        $(
            impl TrieHash for $type {
                fn hash32(&self) -> u32 {
                    fold64(*self as u64)
                }
            }
        )*
    );
}

impl_trie_hash_int32![u8, i8, u16, i16, u32, i32];
impl_trie_hash_int64![u64, i64, usize, isize];

impl<T> TrieHash for &T
where
    T: TrieHash + ?Sized,
{
    fn hash32(&self) -> u32 {
        (**self).hash32()
    }
}
