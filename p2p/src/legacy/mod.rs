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

//! The legacy (pre-BOLT) dialect: the one wire format this crate speaks.

mod channel;
mod error;
mod pkt;
mod types;
mod update;

pub use channel::{CloseShutdown, CloseSignature, OpenAnchor, OpenChannel, OpenCommitSig, OpenComplete};
pub use error::{Auth, Error, Reconnect};
pub use pkt::Pkt;
pub use types::{AnchorOffer, BitcoinPubkey, Locktime, Sha256Hash, Signature};
pub use update::{UpdateAddHtlc, UpdateCommit, UpdateFailHtlc, UpdateFulfillHtlc, UpdateRevocation};
