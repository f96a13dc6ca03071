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

//! The anchor: the on-chain 2-of-2 funding output a channel's value derives
//! from.

use bitcoin::Txid;
use p2p::legacy::BitcoinPubkey;

use crate::crypto::Keychain;

/// Identifies the on-chain funding output and carries the assembled 2-of-2
/// redeem script. Recorded once, on receipt of `open_anchor`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Anchor {
    pub txid: Txid,
    pub output_index: u32,
    pub amount: u64,
    pub redeem_script: Vec<u8>,
}

impl Anchor {
    /// Assembles an [`Anchor`] from the on-chain location reported in
    /// `open_anchor` and the 2-of-2 redeem script built from both sides'
    /// commit keys.
    pub fn new(
        txid: Txid,
        output_index: u32,
        amount: u64,
        keychain: &impl Keychain,
        our_commit_key: &BitcoinPubkey,
        their_commit_key: &BitcoinPubkey,
    ) -> Self {
        Anchor {
            txid,
            output_index,
            amount,
            redeem_script: keychain.anchor_redeem_script(our_commit_key, their_commit_key),
        }
    }
}
