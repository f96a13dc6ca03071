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

//! The `accept_<packet>`/`make_<packet>` handlers driving a [`PeerSession`]
//! through opening and HTLC update. Every handler either mutates the session
//! and optionally returns an outbound packet, or returns a peer-reportable
//! [`Error`] that the caller turns into an outbound `Error` packet before
//! tearing the session down. A [`FatalError`] instead means abort the
//! session without telling the peer why — it indicates a bug here, not
//! misbehavior there.

use bitcoin::Txid;
use p2p::legacy::{
    AnchorOffer, CloseShutdown, OpenAnchor, OpenChannel, OpenCommitSig, OpenComplete, Sha256Hash,
    UpdateAddHtlc, UpdateCommit, UpdateRevocation,
};

use crate::channel::anchor::Anchor;
use crate::channel::balances::{check_conservation, ChannelBalances, Htlc, Side};
use crate::channel::keyset::PeerParams;
use crate::channel::policy::{Policy, PolicyError};
use crate::channel::revocation::{revocation_hash, verify_preimage, SecretProvider};
use crate::channel::state::{HtlcProposal, Lifecycle, PeerSession};
use crate::crypto::{CommitmentParams, Keychain};

/// A peer-reportable failure: surfaced as an outbound `Error` packet, after
/// which the session is torn down.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error, From)]
pub enum Error {
    #[display("{0}")]
    #[from]
    Policy(PolicyError),

    #[display("Bad signature")]
    BadSignature,

    #[display("Bad revocation preimage")]
    BadRevocationPreimage,

    #[display("Cannot afford {0} milli-satoshis")]
    CannotAfford(u64),

    #[display("received a packet outside its legal state")]
    UnexpectedPacket,
}

impl Error {
    pub fn problem(&self) -> String {
        self.to_string()
    }
}

/// An invariant-fatal failure: the session must abort without a peer-facing
/// explanation, since the fault is internal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Display, Error)]
pub enum FatalError {
    #[display("balance conservation violated: before={0} after={1}")]
    Conservation(u64, u64),
}

/// Either a packet-level handler outcome to report to the peer, or an
/// invariant failure that must abort the session silently instead. Returned
/// only by handlers that perform an atomic commit.
#[derive(Clone, PartialEq, Eq, Debug, Display, Error, From)]
pub enum HandlerError {
    #[display("{0}")]
    #[from]
    Peer(Error),

    #[display("{0}")]
    #[from]
    Fatal(FatalError),
}

/// The raw parameters of an HTLC this side proposed, kept until the
/// counterparty's `update_accept` arrives and this side can build its own
/// mirror of the tentative commitment pair.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PendingAdd {
    pub id: u64,
    pub amount_msat: u32,
    pub rhash: Sha256Hash,
    pub expiry: u32,
}

fn initial_balances(amount_sat: u64, commit_fee_sat: u64, we_are_funder: bool) -> ChannelBalances {
    let fee_half_msat = (commit_fee_sat * 1000) / 2;
    let funder = Side { pay_msat: amount_sat * 1000 - fee_half_msat * 2, fee_msat: fee_half_msat, htlcs: vec![] };
    let other = Side { pay_msat: 0, fee_msat: fee_half_msat, htlcs: vec![] };
    if we_are_funder {
        ChannelBalances { a: funder, b: other }
    } else {
        ChannelBalances { a: other, b: funder }
    }
}

/// Builds both sides of a commitment pair from one shared `balances` (always
/// `a` = us, `b` = them). Each commitment's `owner`/`remote` are taken from
/// the matching side of `balances` so that `their_commit`, as A renders it,
/// is byte-for-byte the same commitment B renders as its own `our_commit`.
fn build_commitment_pair<K: Keychain>(
    keychain: &K,
    anchor: &Anchor,
    balances: &ChannelBalances,
    us: &PeerParams,
    them: &PeerParams,
    our_revocation_hash: Sha256Hash,
    their_revocation_hash: Sha256Hash,
) -> (crate::crypto::CommitmentTx, crate::crypto::CommitmentTx) {
    let our_commit = keychain.build_commitment(&CommitmentParams {
        anchor: anchor.clone(),
        owner: balances.a.clone(),
        remote: balances.b.clone(),
        revocation_hash: our_revocation_hash,
        commit_key: us.commit_key,
        remote_commit_key: them.commit_key,
    });
    let their_commit = keychain.build_commitment(&CommitmentParams {
        anchor: anchor.clone(),
        owner: balances.b.clone(),
        remote: balances.a.clone(),
        revocation_hash: their_revocation_hash,
        commit_key: them.commit_key,
        remote_commit_key: us.commit_key,
    });
    (our_commit, their_commit)
}

/// Builds the `open_channel` packet advertising this side's static
/// parameters and funding intent.
pub fn make_open(us: &PeerParams, is_anchor_funder: bool) -> OpenChannel {
    OpenChannel {
        delay: us.delay,
        revocation_hash: us.revocation_hash,
        next_revocation_hash: us.next_revocation_hash,
        commit_key: us.commit_key,
        final_key: us.final_key,
        anch: if is_anchor_funder { AnchorOffer::Will } else { AnchorOffer::Wont },
        min_depth: us.min_depth,
        initial_fee_rate: us.commit_fee,
    }
}

/// Validates an inbound `open_channel` against policy and records the
/// counterparty's static parameters.
pub fn accept_open<K>(session: &mut PeerSession<K>, msg: &OpenChannel, policy: &Policy) -> Result<(), Error> {
    if msg.delay.is_blocks() {
        return Err(PolicyError::BlocksLocktime.into());
    }
    if msg.delay.value() > policy.rel_locktime_max {
        return Err(PolicyError::LocktimeTooLong.into());
    }
    if msg.min_depth > policy.anchor_confirms_max {
        return Err(PolicyError::MinDepthTooDeep.into());
    }
    if msg.initial_fee_rate < policy.commitment_fee_min {
        return Err(PolicyError::CommitFeeTooLow.into());
    }
    let their_offer = msg.anch.will_fund();
    if their_offer == session.is_anchor_funder {
        return Err(if their_offer {
            PolicyError::BothOfferAnchor.into()
        } else {
            PolicyError::NeitherOffersAnchor.into()
        });
    }

    session.them = PeerParams {
        commit_key: msg.commit_key,
        final_key: msg.final_key,
        delay: msg.delay,
        min_depth: msg.min_depth,
        commit_fee: msg.initial_fee_rate,
        revocation_hash: msg.revocation_hash,
        next_revocation_hash: msg.next_revocation_hash,
    };
    session.state = Lifecycle::OpenWaitAnchor;
    Ok(())
}

/// Sent only by the anchor funder, once the funding transaction exists:
/// builds both commitment transactions and signs the counterparty's copy so
/// they can broadcast it unilaterally later.
pub fn make_open_anchor<K: Keychain>(
    session: &mut PeerSession<K>,
    txid: Txid,
    output_index: u32,
    amount: u64,
) -> OpenAnchor {
    let anchor = Anchor::new(txid, output_index, amount, &session.keychain, &session.us.commit_key, &session.them.commit_key);
    let commit_fee = Policy::commit_fee(session.us.commit_fee, session.them.commit_fee);
    let balances = initial_balances(amount, commit_fee, true);
    let (our_commit, their_commit) = build_commitment_pair(
        &session.keychain,
        &anchor,
        &balances,
        &session.us,
        &session.them,
        session.us.revocation_hash,
        session.them.revocation_hash,
    );
    let commit_sig = session.keychain.sign(&their_commit, &session.us.commit_key);

    session.anchor = Some(anchor);
    session.balances = balances;
    session.our_commit = Some(our_commit);
    session.their_commit = Some(their_commit);
    session.state = Lifecycle::OpenWaitSig;

    OpenAnchor { txid, output_index, amount, commit_sig }
}

/// Run only by the non-funder: records the anchor, derives the initial
/// balances, verifies the funder's signature over our own commitment, and
/// replies with our signature over theirs.
pub fn accept_open_anchor<K: Keychain>(session: &mut PeerSession<K>, msg: &OpenAnchor) -> Result<OpenCommitSig, Error> {
    let anchor = Anchor::new(msg.txid, msg.output_index, msg.amount, &session.keychain, &session.us.commit_key, &session.them.commit_key);
    let commit_fee = Policy::commit_fee(session.us.commit_fee, session.them.commit_fee);
    let balances = initial_balances(msg.amount, commit_fee, false);
    let (our_commit, their_commit) = build_commitment_pair(
        &session.keychain,
        &anchor,
        &balances,
        &session.us,
        &session.them,
        session.us.revocation_hash,
        session.them.revocation_hash,
    );

    if !session.keychain.verify(&our_commit, &session.them.commit_key, &msg.commit_sig) {
        return Err(Error::BadSignature);
    }
    let commit_sig = session.keychain.sign(&their_commit, &session.us.commit_key);

    session.anchor = Some(anchor);
    session.balances = balances;
    session.our_commit = Some(our_commit);
    session.their_commit = Some(their_commit);
    session.state = Lifecycle::OpenWaitComplete;

    Ok(OpenCommitSig { commit_sig })
}

/// Run only by the funder, in reply to `open_commit_sig`.
pub fn accept_open_commit_sig<K: Keychain>(session: &mut PeerSession<K>, msg: &OpenCommitSig) -> Result<(), Error> {
    let our_commit = session.our_commit.as_ref().expect("anchor already sent before commit_sig can arrive");
    if !session.keychain.verify(our_commit, &session.them.commit_key, &msg.commit_sig) {
        return Err(Error::BadSignature);
    }
    session.state = Lifecycle::OpenWaitComplete;
    Ok(())
}

/// The anchor has reached `min_depth` confirmations; an external observer
/// supplies this event.
pub fn accept_open_complete<K>(session: &mut PeerSession<K>, _msg: &OpenComplete) -> Result<(), Error> {
    session.state = Lifecycle::Normal;
    Ok(())
}

/// Sent by the side proposing a new HTLC; the balance debit and tentative
/// commitment are built only on the receiving end, once `update_accept`
/// round-trips.
pub fn make_update_add_htlc<K>(
    session: &mut PeerSession<K>,
    id: u64,
    amount_msat: u32,
    rhash: Sha256Hash,
    expiry: u32,
    route: Vec<u8>,
) -> UpdateAddHtlc {
    session.pending_add = Some(PendingAdd { id, amount_msat, rhash, expiry });
    session.state = Lifecycle::HtlcProposed;
    UpdateAddHtlc { id, amount_msat, r_hash: rhash, expiry: p2p::legacy::Locktime::Blocks(expiry), route }
}

fn debit(balances: &ChannelBalances, debit_a: bool, amount_msat: u64, htlc: Htlc) -> Result<ChannelBalances, Error> {
    let mut tentative = balances.clone();
    let side = if debit_a { &mut tentative.a } else { &mut tentative.b };
    if side.pay_msat < amount_msat {
        return Err(Error::CannotAfford(amount_msat));
    }
    side.pay_msat -= amount_msat;
    side.htlcs.push(htlc);
    Ok(tentative)
}

/// Run by the receiver of `update_add_htlc`: debits the sender's balance,
/// buffers the tentative commitment pair, and replies with a signature over
/// the sender's (counterparty's) new commitment.
pub fn accept_update_add_htlc<K: Keychain>(session: &mut PeerSession<K>, msg: &UpdateAddHtlc) -> Result<UpdateCommit, Error> {
    let htlc = Htlc { msatoshis: msg.amount_msat as u64, rhash: msg.r_hash, expiry: msg.expiry.value() };
    let tentative_balances = debit(&session.balances, false, msg.amount_msat as u64, htlc)?;

    let our_next_revocation_hash = revocation_hash(&session.our_secrets, session.num_htlcs + 1);
    let their_next_revocation_hash = session.them.next_revocation_hash;

    let anchor = session.anchor.clone().expect("channel already open");
    let (our_next_commit, their_next_commit) = build_commitment_pair(
        &session.keychain,
        &anchor,
        &tentative_balances,
        &session.us,
        &session.them,
        our_next_revocation_hash,
        their_next_revocation_hash,
    );

    let sig = session.keychain.sign(&their_next_commit, &session.us.commit_key);

    session.current_htlc = Some(HtlcProposal {
        tentative_balances,
        our_next_commit,
        their_next_commit,
        our_next_revocation_hash,
        their_next_revocation_hash,
    });
    session.state = Lifecycle::HtlcAccepted;

    Ok(UpdateCommit { sig })
}

/// Run by the original proposer on receiving `update_accept`: rebuilds the
/// tentative pair locally, verifies the counterparty's signature, performs
/// the atomic commit, and prepares the outbound `update_signature` (the
/// `UpdateCommit`/`UpdateRevocation` pair).
pub fn accept_update_accept<K: Keychain>(
    session: &mut PeerSession<K>,
    msg: &UpdateCommit,
) -> Result<(UpdateCommit, UpdateRevocation), HandlerError> {
    let pending = session.pending_add.take().ok_or(Error::UnexpectedPacket)?;
    let htlc = Htlc { msatoshis: pending.amount_msat as u64, rhash: pending.rhash, expiry: pending.expiry };
    let tentative_balances = debit(&session.balances, true, pending.amount_msat as u64, htlc)?;

    let our_next_revocation_hash = revocation_hash(&session.our_secrets, session.num_htlcs + 1);
    let their_next_revocation_hash = session.them.next_revocation_hash;

    let anchor = session.anchor.clone().expect("channel already open");
    let (our_next_commit, their_next_commit) = build_commitment_pair(
        &session.keychain,
        &anchor,
        &tentative_balances,
        &session.us,
        &session.them,
        our_next_revocation_hash,
        their_next_revocation_hash,
    );

    if !session.keychain.verify(&our_next_commit, &session.them.commit_key, &msg.sig) {
        return Err(Error::BadSignature.into());
    }

    let proposal = HtlcProposal {
        tentative_balances,
        our_next_commit,
        their_next_commit,
        our_next_revocation_hash,
        their_next_revocation_hash,
    };
    commit(session, proposal)?;

    let (sig, revocation) = finish_round(session).map_err(HandlerError::Peer)?;
    Ok((sig, revocation))
}

/// Run by the receiver on `update_signature`: verifies the signature over
/// our new commitment (the `UpdateCommit` half) and the revealed preimage
/// (the `UpdateRevocation` half), then performs the atomic commit and emits
/// `update_complete` (our own revocation of the superseded commitment).
pub fn accept_update_signature<K: Keychain>(
    session: &mut PeerSession<K>,
    sig_msg: &UpdateCommit,
    rev_msg: &UpdateRevocation,
) -> Result<UpdateRevocation, HandlerError> {
    let proposal = session.current_htlc.clone().ok_or(Error::UnexpectedPacket)?;

    if !session.keychain.verify(&proposal.our_next_commit, &session.them.commit_key, &sig_msg.sig) {
        return Err(Error::BadSignature.into());
    }
    if !verify_preimage(rev_msg.revocation_preimage, session.them.revocation_hash) {
        return Err(Error::BadRevocationPreimage.into());
    }

    commit(session, proposal)?;
    session.them.revocation_hash = session.them.next_revocation_hash;
    session.them.next_revocation_hash = rev_msg.next_revocation_hash;

    let (_, our_revocation) = finish_round(session).map_err(HandlerError::Peer)?;
    Ok(our_revocation)
}

/// Records a cooperative-close proposal only as a state transition; the
/// close sub-protocol itself is not driven to a signed closing transaction.
pub fn accept_close_shutdown<K>(session: &mut PeerSession<K>, _msg: &CloseShutdown) -> Result<(), Error> {
    session.state = Lifecycle::Closing;
    Ok(())
}

/// Run by the original proposer on `update_complete`: validates the
/// revealed preimage against our recorded record of their previous
/// commitment. The reference implementation this crate is modelled on left
/// this check unimplemented (a marked `FIXME`); here it is mandatory.
pub fn accept_update_complete<K>(session: &mut PeerSession<K>, msg: &UpdateRevocation) -> Result<(), Error> {
    if !verify_preimage(msg.revocation_preimage, session.them.revocation_hash) {
        return Err(Error::BadRevocationPreimage);
    }
    session.them.revocation_hash = session.them.next_revocation_hash;
    session.them.next_revocation_hash = msg.next_revocation_hash;
    session.state = Lifecycle::Normal;
    Ok(())
}

/// Replaces the committed channel state with the buffered proposal, after
/// checking that total funding is unchanged. A conservation failure is
/// invariant-fatal: the caller must abort the session, not report an error
/// to the peer.
fn commit<K>(session: &mut PeerSession<K>, proposal: HtlcProposal) -> Result<(), FatalError> {
    check_conservation(&session.balances, &proposal.tentative_balances).map_err(|(b, a)| FatalError::Conservation(b, a))?;

    session.balances = proposal.tentative_balances;
    session.our_commit = Some(proposal.our_next_commit);
    session.their_commit = Some(proposal.their_next_commit);
    session.us.revocation_hash = session.us.next_revocation_hash;
    session.num_htlcs += 1;
    session.us.next_revocation_hash = revocation_hash(&session.our_secrets, session.num_htlcs + 1);
    session.current_htlc = None;
    Ok(())
}

/// Reveals the preimage for the commitment just superseded, advertises the
/// hash anchoring the one after next, and hands back a fresh signature over
/// the counterparty's new commitment — together the `update_signature` (or
/// `update_complete`) that closes out this update round.
fn finish_round<K: Keychain>(session: &mut PeerSession<K>) -> Result<(UpdateCommit, UpdateRevocation), Error> {
    let revoked_index = session.num_htlcs - 1;
    let preimage = session.our_secrets.preimage(revoked_index);
    let new_next = session.us.next_revocation_hash;

    let their_commit = session.their_commit.clone().expect("just committed");
    let sig = session.keychain.sign(&their_commit, &session.us.commit_key);
    session.state = Lifecycle::Normal;

    Ok((
        UpdateCommit { sig },
        UpdateRevocation { revocation_preimage: preimage, next_revocation_hash: new_next },
    ))
}
