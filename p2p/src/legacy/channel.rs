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

//! Opening sub-protocol messages: `open_channel`, `open_anchor`,
//! `open_commit_sig`, and the (unimplemented-beyond-parsing) close messages.

use bitcoin::Txid;

use super::types::{AnchorOffer, BitcoinPubkey, Locktime, Sha256Hash, Signature};

/// Proposes opening a channel. Carries the proposer's static channel
/// parameters and their first revocation hash.
#[derive(Clone, PartialEq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("open_channel({delay}, {anch}, {min_depth}, {initial_fee_rate})")]
pub struct OpenChannel {
    /// Proposed relative locktime for the `to_self` output of commitment
    /// transactions. The `Blocks` variant MUST be rejected by the channel
    /// protocol engine ("Delay in blocks not accepted").
    pub delay: Locktime,

    /// The first revocation hash this side will use.
    pub revocation_hash: Sha256Hash,

    /// The revocation hash for the *next* commitment, sent eagerly so the
    /// counterparty can prepare ahead of the first update.
    pub next_revocation_hash: Sha256Hash,

    /// Public key used in the 2-of-2 anchor (funding) redeem script and for
    /// signing commitment transactions.
    pub commit_key: BitcoinPubkey,

    /// Public key used in the final (non-delayed) settlement output.
    pub final_key: BitcoinPubkey,

    /// Whether this side offers to fund the anchor. Exactly one side of a
    /// channel must offer it.
    pub anch: AnchorOffer,

    /// Minimum number of confirmations this side requires of the anchor
    /// transaction before treating the channel as open.
    pub min_depth: u32,

    /// Proposed commitment transaction fee, in satoshis.
    pub initial_fee_rate: u64,
}

/// Sent by the anchor funder once the on-chain funding transaction exists:
/// identifies it and carries a signature over the counterparty's initial
/// commitment transaction.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("open_anchor({txid}:{output_index}, {amount})")]
pub struct OpenAnchor {
    pub txid: Txid,
    pub output_index: u32,
    pub amount: u64,
    pub commit_sig: Signature,
}

/// The non-funder's counter-signature over the funder's initial commitment
/// transaction, sent in reply to `OpenAnchor`.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("open_commit_sig(...)")]
pub struct OpenCommitSig {
    pub commit_sig: Signature,
}

/// Notifies the peer that the anchor transaction has reached the locally
/// required confirmation depth; carries no payload beyond the channel
/// identity implied by the session it arrives on.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("open_complete")]
pub struct OpenComplete;

/// Proposes a cooperative close: the destination script for this side's
/// settlement output. Accepted by the state machine only to transition into
/// `Closing`; the close sub-protocol itself is not driven to completion.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("close_shutdown(...)")]
pub struct CloseShutdown {
    pub scriptpubkey: Vec<u8>,
}

/// Proposes a closing transaction fee and carries a signature over it. Not
/// driven to completion by this crate; see `CloseShutdown`.
#[derive(Clone, PartialEq, Eq, Debug, Display)]
#[derive(LightningEncode, LightningDecode)]
#[display("close_signature({close_fee})")]
pub struct CloseSignature {
    pub close_fee: u64,
    pub sig: Signature,
}
