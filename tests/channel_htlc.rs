mod common;

use p2p::legacy::Locktime;
use paychan::channel::balances::{ChannelBalances, Side};
use paychan::channel::engine::{self, Error};
use paychan::channel::Lifecycle;

use common::{hash, peer_params, pubkey, session};

fn ready_pair() -> (
    paychan::channel::PeerSession<common::DumbKeychain>,
    paychan::channel::PeerSession<common::DumbKeychain>,
) {
    let a_secrets = paychan::channel::ShaChain::new(hash(1));
    let b_secrets = paychan::channel::ShaChain::new(hash(2));

    let a_us = peer_params(pubkey(10), pubkey(11), &a_secrets, Locktime::Seconds(3600));
    let b_us = peer_params(pubkey(12), pubkey(13), &b_secrets, Locktime::Seconds(3600));

    let mut a = session(a_us.clone(), a_secrets, true);
    let mut b = session(b_us.clone(), b_secrets, false);

    a.them = b_us;
    b.them = a_us;

    // Each side's own balances always carry "a" as themselves; A and B mirror
    // the same shared state, so B's view is A's view with the two sides
    // swapped.
    let a_funded = Side { pay_msat: 1_000_000, fee_msat: 0, htlcs: vec![] };
    a.balances = ChannelBalances { a: a_funded.clone(), b: Side::default() };
    b.balances = ChannelBalances { a: Side::default(), b: a_funded };

    let anchor = paychan::channel::Anchor {
        txid: bitcoin::Txid::from_slice(&[1u8; 32]).unwrap(),
        output_index: 0,
        amount: 1_000,
        redeem_script: vec![],
    };
    a.anchor = Some(anchor.clone());
    b.anchor = Some(anchor);
    a.our_commit = Some(paychan::crypto::CommitmentTx { digest: hash(99) });
    a.their_commit = Some(paychan::crypto::CommitmentTx { digest: hash(98) });
    b.our_commit = Some(paychan::crypto::CommitmentTx { digest: hash(98) });
    b.their_commit = Some(paychan::crypto::CommitmentTx { digest: hash(99) });
    a.state = Lifecycle::Normal;
    b.state = Lifecycle::Normal;

    (a, b)
}

#[test]
fn htlc_add_round_trip_commits_on_both_sides() {
    let (mut a, mut b) = ready_pair();

    let add = engine::make_update_add_htlc(&mut a, 0, 400_000, hash(55), 500_000, vec![]);
    assert_eq!(a.state, Lifecycle::HtlcProposed);

    let update_accept = engine::accept_update_add_htlc(&mut b, &add).expect("B can afford nothing, A funds the HTLC");
    assert_eq!(b.state, Lifecycle::HtlcAccepted);

    let (sig, revocation) = engine::accept_update_accept(&mut a, &update_accept).expect("A commits");
    assert_eq!(a.state, Lifecycle::Normal);
    assert_eq!(a.num_htlcs, 1);

    let complete = engine::accept_update_signature(&mut b, &sig, &revocation).expect("B commits");
    assert_eq!(b.state, Lifecycle::Normal);
    assert_eq!(b.num_htlcs, 1);

    engine::accept_update_complete(&mut a, &complete).expect("A validates B's revealed preimage");

    assert_eq!(a.balances.a.pay_msat, 600_000);
    assert_eq!(b.balances.b.htlcs.len(), 1);
    assert_eq!(b.balances.b.htlcs[0].msatoshis, 400_000);
    assert_eq!(a.balances.total_funds(), b.balances.total_funds());
}

#[test]
fn underfunded_htlc_is_rejected() {
    let (mut a, mut b) = ready_pair();

    let add = engine::make_update_add_htlc(&mut a, 0, 2_000_000, hash(55), 500_000, vec![]);
    let err = engine::accept_update_add_htlc(&mut b, &add).unwrap_err();
    assert_eq!(err, Error::CannotAfford(2_000_000));
    assert_eq!(b.balances.b.pay_msat, 1_000_000);
}
