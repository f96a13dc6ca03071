// LNP/BP Core Library implementing LNPBP specifications & standards
// Written in 2020-2022 by
//     Dr. Maxim Orlovsky <orlovsky@pandoracore.com>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the MIT License
// along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! The per-commitment secret chain: a deterministic sequence of preimages
//! indexed by commitment number, whose revelation authorizes penalizing a
//! stale commitment broadcast.

use bitcoin::hashes::{sha256, Hash};
use p2p::legacy::Sha256Hash;

/// Computes `preimage(n)` for any `n`, in increasing order as commitments
/// advance. A shachain-backed implementation can derive all preimages from a
/// handful of seeds; [`ShaChain`] below is the simplest conformant form.
pub trait SecretProvider {
    fn preimage(&self, n: u64) -> Sha256Hash;
}

/// `revocation_hash(n) = SHA256(preimage(n))`, as required of every
/// conforming [`SecretProvider`].
pub fn revocation_hash(provider: &impl SecretProvider, n: u64) -> Sha256Hash {
    let digest = sha256::Hash::hash(&provider.preimage(n).to_bytes());
    Sha256Hash::from_bytes(digest.into_inner())
}

/// A single-seed secret chain: `preimage(n) = SHA256(seed || n.to_be_bytes())`.
/// This is not the storage-minimizing shachain construction used by BOLT3
/// (which derives 2^49 preimages from ~47 bits of state); it is the simplest
/// chain satisfying the functional contract this crate depends on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ShaChain {
    seed: Sha256Hash,
}

impl ShaChain {
    pub fn new(seed: Sha256Hash) -> Self {
        ShaChain { seed }
    }
}

impl SecretProvider for ShaChain {
    fn preimage(&self, n: u64) -> Sha256Hash {
        let mut buf = Vec::with_capacity(40);
        buf.extend_from_slice(&self.seed.to_bytes());
        buf.extend_from_slice(&n.to_be_bytes());
        let digest = sha256::Hash::hash(&buf);
        Sha256Hash::from_bytes(digest.into_inner())
    }
}

/// Verifies that `preimage` is indeed the secret behind `hash`, per the
/// revocation-chain invariant `SHA256(preimage(n)) == hash`.
pub fn verify_preimage(preimage: Sha256Hash, hash: Sha256Hash) -> bool {
    let digest = sha256::Hash::hash(&preimage.to_bytes());
    Sha256Hash::from_bytes(digest.into_inner()) == hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preimages_reproduce_their_hash() {
        let chain = ShaChain::new(Sha256Hash::from_bytes([7u8; 32]));
        for n in 0..5u64 {
            let hash = revocation_hash(&chain, n);
            assert!(verify_preimage(chain.preimage(n), hash));
        }
    }

    #[test]
    fn distinct_indices_yield_distinct_preimages() {
        let chain = ShaChain::new(Sha256Hash::from_bytes([3u8; 32]));
        assert_ne!(chain.preimage(0), chain.preimage(1));
    }
}
