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

//! Opaque on-chain capabilities: transaction construction and signing live
//! outside this crate, behind the [`Keychain`] trait. Nothing here inspects
//! script or transaction internals; it only carries and compares the handles
//! the rest of the crate needs.

use p2p::legacy::{BitcoinPubkey, Sha256Hash, Signature};

use crate::channel::anchor::Anchor;
use crate::channel::balances::Side;

/// An unsigned commitment transaction, opaque to everything but the
/// [`Keychain`] that built and will sign it. Two of these exist per peer
/// session at any time: ours and theirs.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CommitmentTx {
    /// Digest standing in for the actual transaction bytes; a real
    /// implementation would carry the full PSBT/transaction here.
    pub digest: Sha256Hash,
}

/// Parameters from which a single commitment transaction is deterministically
/// built. `owner`/`commit_key` name the party this particular commitment
/// belongs to (the `to_local` side); `remote`/`remote_commit_key` name the
/// counterparty (`to_remote`). A commitment tx is identified by who owns it,
/// not by which peer happens to be building it: A's rendering of B's
/// commitment and B's own rendering of it MUST carry identical `owner`/
/// `remote` values, so callers must swap sides rather than reuse a single
/// "us"-relative [`crate::channel::balances::ChannelBalances`] verbatim.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CommitmentParams {
    pub anchor: Anchor,
    pub owner: Side,
    pub remote: Side,
    pub revocation_hash: Sha256Hash,
    pub commit_key: BitcoinPubkey,
    pub remote_commit_key: BitcoinPubkey,
}

/// The opaque capability boundary named in the purpose/scope of this crate:
/// transaction assembly, signing, and signature verification are someone
/// else's problem. Implementations back this with real ECDSA and PSBT
/// construction; tests back it with a deterministic stand-in.
pub trait Keychain {
    /// Builds the unsigned commitment transaction described by `params`.
    fn build_commitment(&self, params: &CommitmentParams) -> CommitmentTx;

    /// Signs `tx` under `key`, which must be a key this keychain controls.
    fn sign(&self, tx: &CommitmentTx, key: &BitcoinPubkey) -> Signature;

    /// Verifies `sig` over `tx` under the counterparty's `key`.
    fn verify(&self, tx: &CommitmentTx, key: &BitcoinPubkey, sig: &Signature) -> bool;

    /// Assembles the 2-of-2 anchor redeem script from both commit keys.
    /// Returned as opaque bytes; the core never parses them back.
    fn anchor_redeem_script(&self, a: &BitcoinPubkey, b: &BitcoinPubkey) -> Vec<u8>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use bitcoin::hashes::{sha256, Hash};

    /// A deterministic, insecure [`Keychain`] used only by this crate's own
    /// tests: "signatures" are a hash of the digest and key, "verification"
    /// recomputes and compares.
    pub struct DumbKeychain;

    impl Keychain for DumbKeychain {
        fn build_commitment(&self, params: &CommitmentParams) -> CommitmentTx {
            let mut buf = Vec::new();
            buf.extend_from_slice(&params.revocation_hash.to_bytes());
            buf.extend_from_slice(&params.commit_key.0.serialize());
            buf.extend_from_slice(&params.remote_commit_key.0.serialize());
            buf.extend_from_slice(&params.owner.pay_msat.to_le_bytes());
            buf.extend_from_slice(&params.remote.pay_msat.to_le_bytes());
            let digest = sha256::Hash::hash(&buf);
            CommitmentTx { digest: Sha256Hash::from_bytes(digest.into_inner()) }
        }

        fn sign(&self, tx: &CommitmentTx, key: &BitcoinPubkey) -> Signature {
            let mut buf = Vec::new();
            buf.extend_from_slice(&tx.digest.to_bytes());
            buf.extend_from_slice(&key.0.serialize());
            let r = sha256::Hash::hash(&buf);
            let s = sha256::Hash::hash(r.as_ref());
            Signature::from_scalars(r.into_inner(), s.into_inner())
        }

        fn verify(&self, tx: &CommitmentTx, key: &BitcoinPubkey, sig: &Signature) -> bool {
            self.sign(tx, key) == *sig
        }

        fn anchor_redeem_script(&self, a: &BitcoinPubkey, b: &BitcoinPubkey) -> Vec<u8> {
            let mut script = Vec::with_capacity(2 + 33 * 2);
            script.extend_from_slice(&a.0.serialize());
            script.extend_from_slice(&b.0.serialize());
            script
        }
    }
}
