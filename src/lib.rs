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

//! Core of a Lightning-style off-chain payment-channel node: an
//! amount-dependent shortest-path router and the bilateral channel protocol
//! (opening, HTLC update, revocation) driving a single peer session.
//!
//! Bitcoin transaction construction, signing, wire framing, persistence, and
//! RPC dispatch are all external collaborators; this crate treats them as
//! opaque capabilities (see [`crypto::Keychain`]) or simply doesn't speak
//! their protocol at all.

#![deny(non_upper_case_globals, non_camel_case_types, non_snake_case, unused_mut, unused_imports, dead_code)]

#[macro_use]
extern crate amplify;

#[cfg(feature = "serde")]
extern crate serde_crate as serde;

pub mod channel;
pub mod crypto;
pub mod router;

pub use p2p;
