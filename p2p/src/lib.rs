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

#![recursion_limit = "256"]
// Coding conventions
#![deny(
    non_upper_case_globals,
    non_camel_case_types,
    non_snake_case,
    unused_mut,
    unused_imports,
    dead_code
)]

#[macro_use]
extern crate amplify;
#[macro_use]
extern crate lightning_encoding;
#[macro_use]
extern crate strict_encoding;
#[cfg(feature = "serde")]
extern crate serde_crate as serde;

/// The legacy, pre-BOLT dialect of the Lightning wire protocol: `open`,
/// `open_anchor`, HTLC update and revocation packets, carried as fixed-limb
/// hashes and signatures rather than the later BOLT TLV encoding.
pub mod legacy;

pub use legacy::Pkt;
