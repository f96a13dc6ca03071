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

//! Static, per-side channel parameters exchanged during the opening
//! sub-protocol. A full BOLT3 keyset derives half a dozen basepoints per
//! side for per-commitment key rotation; this crate's simpler single-key
//! model carries only the two keys the wire schema actually names.

use p2p::legacy::{BitcoinPubkey, Locktime, Sha256Hash};

/// One side's static channel parameters, as declared in `open_channel` (or,
/// for the local side, configured by policy before sending it).
///
/// `revocation_hash` is the hash anchoring this side's currently active
/// commitment; `next_revocation_hash` anchors the commitment that will
/// replace it on the next update round. Both are refreshed in lock-step by
/// each `UpdateRevocation` received from this side.
#[derive(Clone, PartialEq, Debug)]
pub struct PeerParams {
    pub commit_key: BitcoinPubkey,
    pub final_key: BitcoinPubkey,
    pub delay: Locktime,
    pub min_depth: u32,
    pub commit_fee: u64,
    pub revocation_hash: Sha256Hash,
    pub next_revocation_hash: Sha256Hash,
}
