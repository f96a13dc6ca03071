mod common;

use bitcoin::hashes::Hash;
use bitcoin::Txid;
use p2p::legacy::{Locktime, OpenComplete};
use paychan::channel::engine;
use paychan::channel::Policy;

use common::{peer_params, pubkey, session};

#[test]
fn open_channel_round_trip_reaches_normal_with_conservation() {
    let policy = Policy { rel_locktime_max: 7200, anchor_confirms_max: 6, commitment_fee_min: 1000 };

    let a_secrets = paychan::channel::ShaChain::new(common::hash(10));
    let b_secrets = paychan::channel::ShaChain::new(common::hash(20));

    let a_us = peer_params(pubkey(1), pubkey(2), &a_secrets, Locktime::Seconds(3600));
    let b_us = peer_params(pubkey(3), pubkey(4), &b_secrets, Locktime::Seconds(3600));

    let mut a = session(a_us, a_secrets, true);
    let mut b = session(b_us, b_secrets, false);

    let open_a = engine::make_open(&a.us, true);
    engine::accept_open(&mut b, &open_a, &policy).expect("B accepts A's open");

    let open_b = engine::make_open(&b.us, false);
    engine::accept_open(&mut a, &open_b, &policy).expect("A accepts B's open");

    let txid = Txid::from_slice(&[7u8; 32]).expect("32-byte digest");
    let amount_sat = 1_000_000u64;

    let open_anchor = engine::make_open_anchor(&mut a, txid, 0, amount_sat);
    let commit_sig = engine::accept_open_anchor(&mut b, &open_anchor).expect("B verifies A's commit_sig");
    engine::accept_open_commit_sig(&mut a, &commit_sig).expect("A verifies B's commit_sig");

    engine::accept_open_complete(&mut a, &OpenComplete).unwrap();
    engine::accept_open_complete(&mut b, &OpenComplete).unwrap();

    assert_eq!(a.state, paychan::channel::Lifecycle::Normal);
    assert_eq!(b.state, paychan::channel::Lifecycle::Normal);

    let expected_total = amount_sat * 1000;
    assert_eq!(a.balances.total_funds(), expected_total);
    assert_eq!(b.balances.total_funds(), expected_total);
}
