//! State root computation.
//!
//! A 32-byte commitment to the complete game state, used to check that replays
//! and pure queries leave the state untouched.

use super::GameState;

/// SHA-256 over the bincode encoding of `state`.
///
/// bincode's encoding is deterministic for a given value, so two equal states
/// always produce the same root.
pub fn compute_state_root(state: &GameState) -> [u8; 32] {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    match bincode::serialize(state) {
        Ok(bytes) => hasher.update(&bytes),
        Err(error) => tracing::warn!(%error, "state root over unserializable state"),
    }
    hasher.finalize().into()
}
