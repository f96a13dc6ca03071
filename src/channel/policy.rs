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

//! Channel-opening policy: the bounds a local node enforces on a peer's
//! proposed parameters, and the fee-combination rule used on open.

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Bounds this node enforces on a counterparty's `open_channel` proposal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(crate = "serde_crate"))]
pub struct Policy {
    pub rel_locktime_max: u32,
    pub anchor_confirms_max: u32,
    pub commitment_fee_min: u64,
}

impl Policy {
    /// Combines both sides' proposed commitment fees into the fee actually
    /// used: the larger of the two.
    pub fn commit_fee(a: u64, b: u64) -> u64 {
        a.max(b)
    }
}

/// Why an `open_channel` proposal was rejected. Each variant's message is the
/// `problem` string sent back in the peer-reportable `Error` packet.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum PolicyError {
    /// Delay in blocks not accepted
    BlocksLocktime,

    /// proposed relative locktime exceeds policy maximum
    LocktimeTooLong,

    /// proposed minimum depth exceeds policy maximum
    MinDepthTooDeep,

    /// proposed commitment fee is below policy minimum
    CommitFeeTooLow,

    /// both sides offered to fund the anchor
    BothOfferAnchor,

    /// neither side offered to fund the anchor
    NeitherOffersAnchor,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_fee_picks_the_larger_proposal() {
        assert_eq!(Policy::commit_fee(5000, 7000), 7000);
        assert_eq!(Policy::commit_fee(7000, 5000), 7000);
    }
}
