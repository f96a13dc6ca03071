// LNP P2P library, implementing the legacy (pre-BOLT) wire dialect of the
// Lightning peer protocol.
//
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

//! HTLC update sub-protocol messages: propose, accept, sign, and revoke.

use super::types::{Locktime, Sha256Hash, Signature};

/// Proposes adding an HTLC to the channel. At most one such proposal may be
/// outstanding on a channel at a time (see `channel::state::PeerSession`).
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("update_add_htlc({id}, {amount_msat}, {r_hash}, {expiry})")]
pub struct UpdateAddHtlc {
    pub id: u64,
    pub amount_msat: u32,
    pub r_hash: Sha256Hash,
    pub expiry: Locktime,
    pub route: Vec<u8>,
}

/// Reveals the preimage redeeming an HTLC identified by `id`.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("update_fulfill_htlc({id})")]
pub struct UpdateFulfillHtlc {
    pub id: u64,
    pub r: Sha256Hash,
}

/// Fails a previously added HTLC identified by `id`, with an opaque
/// (onion-encrypted, by later BOLT dialects) reason.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("update_fail_htlc({id})")]
pub struct UpdateFailHtlc {
    pub id: u64,
    pub reason: Vec<u8>,
}

/// Carries a signature over a tentative or new commitment transaction. Used
/// both for `update_accept` (receiver signs the tentative commitment built
/// from an `update_add_htlc`) and `update_signature` (sender signs the
/// receiver's tentative commitment, having already countersigned its own).
/// The next revocation hash used to build each side's tentative commitment
/// travels separately, via the most recent `UpdateRevocation` (or the initial
/// `OpenChannel`) — never re-sent alongside every signature.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("update_commit(...)")]
pub struct UpdateCommit {
    pub sig: Signature,
}

/// Reveals the preimage for the commitment being revoked, authorizing the
/// counterparty to penalize a broadcast of that old commitment, and commits
/// ahead of time to the hash that will anchor the next one. Emitted both as
/// the reply to a received commitment signature and as the final revocation
/// of an update round; both carry this same shape, so a single wire type
/// covers both.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("update_revocation(...)")]
pub struct UpdateRevocation {
    pub revocation_preimage: Sha256Hash,
    pub next_revocation_hash: Sha256Hash,
}
