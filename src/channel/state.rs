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

//! The per-peer state machine and the channel state it carries through each
//! leg of the opening and update sub-protocols.

use p2p::legacy::Sha256Hash;

use crate::channel::anchor::Anchor;
use crate::channel::balances::ChannelBalances;
use crate::channel::keyset::PeerParams;
use crate::channel::engine::PendingAdd;
use crate::channel::revocation::ShaChain;
use crate::crypto::CommitmentTx;

/// The legal states of a peer session. A packet received outside its legal
/// state triggers `error_unexpected` and session termination; see
/// [`crate::channel::engine`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum Lifecycle {
    #[display("init")]
    Init,
    #[display("open_wait_anchor")]
    OpenWaitAnchor,
    #[display("open_wait_sig")]
    OpenWaitSig,
    #[display("open_wait_complete")]
    OpenWaitComplete,
    #[display("normal")]
    Normal,
    #[display("htlc_proposed")]
    HtlcProposed,
    #[display("htlc_accepted")]
    HtlcAccepted,
    #[display("closing")]
    Closing,
    #[display("closed")]
    Closed,
}

/// A buffered HTLC proposal: the tentative balances and commitment pair
/// built in response to `update_add_htlc`, held in `current_htlc` until the
/// update round either completes via atomic commit or is rejected.
#[derive(Clone, PartialEq, Debug)]
pub struct HtlcProposal {
    pub tentative_balances: ChannelBalances,
    pub our_next_commit: CommitmentTx,
    pub their_next_commit: CommitmentTx,
    pub our_next_revocation_hash: Sha256Hash,
    pub their_next_revocation_hash: Sha256Hash,
}

/// Everything the channel protocol engine needs for one peer relationship:
/// both sides' static parameters, the current balances, the anchor, the two
/// live commitment transactions, and at most one in-flight HTLC proposal.
///
/// The at-most-one slot is a deliberate simplification: a production node
/// would need a multi-HTLC queue keyed by HTLC id rather than a single
/// `current_htlc` option.
pub struct PeerSession<K> {
    pub state: Lifecycle,
    pub keychain: K,

    pub us: PeerParams,
    pub them: PeerParams,

    pub anchor: Option<Anchor>,
    pub balances: ChannelBalances,

    pub our_commit: Option<CommitmentTx>,
    pub their_commit: Option<CommitmentTx>,

    pub current_htlc: Option<HtlcProposal>,

    /// The raw parameters of an HTLC this side proposed, held until the
    /// counterparty's reply lets this side build its own tentative mirror.
    pub pending_add: Option<PendingAdd>,

    /// Doubles as the index into the per-commitment secret chain: the
    /// revocation hash at position `num_htlcs` is the one currently live.
    pub num_htlcs: u64,

    pub our_secrets: ShaChain,

    pub is_anchor_funder: bool,
}

impl<K> PeerSession<K> {
    pub fn new(keychain: K, us: PeerParams, them: PeerParams, our_secrets: ShaChain, is_anchor_funder: bool) -> Self {
        PeerSession {
            state: Lifecycle::Init,
            keychain,
            us,
            them,
            anchor: None,
            balances: ChannelBalances::default(),
            our_commit: None,
            their_commit: None,
            current_htlc: None,
            pending_add: None,
            num_htlcs: 0,
            our_secrets,
            is_anchor_funder,
        }
    }
}
