use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

pub type ContentDigest = [u8; 32];

/// SHA-256 of the JSON encoding of `value`.
pub fn content_digest<T: Serialize + ?Sized>(
    value: &T,
) -> Result<ContentDigest, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(&bytes));
    Ok(digest)
}

struct Cached<T> {
    digest: Option<ContentDigest>,
    value: T,
}

/// Holds the last value derived from a collection and recomputes it only
/// when the collection's content changes.
pub struct DerivedCache<T> {
    entry: Option<Cached<T>>,
    hits: u64,
    misses: u64,
}

impl<T> Default for DerivedCache<T> {
    fn default() -> Self {
        Self {
            entry: None,
            hits: 0,
            misses: 0,
        }
    }
}

impl<T> DerivedCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<S: Serialize + ?Sized>(
        &mut self,
        source: &S,
        compute: impl FnOnce() -> T,
    ) -> &T {
        let digest = match content_digest(source) {
            Ok(digest) => Some(digest),
            Err(error) => {
                warn!(%error, "failed to hash collection, recomputing");
                None
            }
        };

        let fresh = digest.is_some()
            && self
                .entry
                .as_ref()
                .is_some_and(|cached| cached.digest == digest);

        if fresh {
            self.hits += 1;
            debug!(hits = self.hits, "derived cache hit");
        } else {
            self.misses += 1;
            self.entry = None;
            debug!(misses = self.misses, "derived cache miss");
        }

        &self
            .entry
            .get_or_insert_with(|| Cached {
                digest,
                value: compute(),
            })
            .value
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
