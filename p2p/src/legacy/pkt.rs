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

//! The top-level packet oneof. A transport frames and delivers the encoded
//! bytes of a single `Pkt`; this crate only defines the type-tagged union and
//! its encode/decode, not the framing itself.

use std::io;

use lightning_encoding::{LightningDecode, LightningEncode};

use super::channel::{
    CloseShutdown, CloseSignature, OpenAnchor, OpenChannel, OpenCommitSig, OpenComplete,
};
use super::error::{Auth, Error, Reconnect};
use super::update::{UpdateAddHtlc, UpdateCommit, UpdateFailHtlc, UpdateFulfillHtlc, UpdateRevocation};

/// A decoded packet of any kind the legacy protocol defines.
#[derive(Clone, PartialEq, Debug, Display)]
#[display(inner)]
pub enum Pkt {
    Auth(Auth),
    Reconnect(Reconnect),
    Error(Error),

    OpenChannel(OpenChannel),
    OpenAnchor(OpenAnchor),
    OpenCommitSig(OpenCommitSig),
    OpenComplete(OpenComplete),

    UpdateAddHtlc(UpdateAddHtlc),
    UpdateFulfillHtlc(UpdateFulfillHtlc),
    UpdateFailHtlc(UpdateFailHtlc),
    UpdateCommit(UpdateCommit),
    UpdateRevocation(UpdateRevocation),

    CloseShutdown(CloseShutdown),
    CloseSignature(CloseSignature),
}

macro_rules! pkt_type_tags {
    ($($tag:literal => $variant:ident),* $(,)?) => {
        impl Pkt {
            fn type_tag(&self) -> u16 {
                match self {
                    $(Pkt::$variant(_) => $tag,)*
                }
            }
        }

        impl LightningEncode for Pkt {
            fn lightning_encode<E: io::Write>(&self, mut e: E) -> Result<usize, io::Error> {
                let mut len = self.type_tag().lightning_encode(&mut e)?;
                len += match self {
                    $(Pkt::$variant(msg) => msg.lightning_encode(&mut e)?,)*
                };
                Ok(len)
            }
        }

        impl LightningDecode for Pkt {
            fn lightning_decode<D: io::Read>(mut d: D) -> Result<Self, lightning_encoding::Error> {
                let tag = u16::lightning_decode(&mut d)?;
                Ok(match tag {
                    $($tag => Pkt::$variant(LightningDecode::lightning_decode(&mut d)?),)*
                    wrong => return Err(lightning_encoding::Error::DataIntegrityError(format!(
                        "unknown packet type tag {}",
                        wrong
                    ))),
                })
            }
        }
    };
}

pkt_type_tags! {
    1 => Auth,
    2 => Reconnect,
    17 => Error,
    32 => OpenChannel,
    33 => OpenAnchor,
    34 => OpenCommitSig,
    35 => OpenComplete,
    128 => UpdateAddHtlc,
    129 => UpdateFulfillHtlc,
    130 => UpdateFailHtlc,
    131 => UpdateCommit,
    132 => UpdateRevocation,
    40 => CloseShutdown,
    41 => CloseSignature,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legacy::types::{AnchorOffer, BitcoinPubkey, Locktime, Sha256Hash};

    fn roundtrip(pkt: &Pkt) {
        let mut buf = Vec::new();
        pkt.lightning_encode(&mut buf).expect("encode");
        let decoded = Pkt::lightning_decode(&buf[..]).expect("decode");
        assert_eq!(&decoded, pkt);
    }

    #[test]
    fn roundtrips_error() {
        roundtrip(&Pkt::Error(Error::new("Cannot afford 2000000 milli-satoshis")));
    }

    #[test]
    fn roundtrips_open_channel() {
        let key = secp256k1::PublicKey::from_secret_key(
            secp256k1::SECP256K1,
            &secp256k1::constants::ONE,
        );
        let msg = OpenChannel {
            delay: Locktime::Seconds(3600),
            revocation_hash: Sha256Hash::from_bytes([1u8; 32]),
            next_revocation_hash: Sha256Hash::from_bytes([2u8; 32]),
            commit_key: BitcoinPubkey(key),
            final_key: BitcoinPubkey(key),
            anch: AnchorOffer::Will,
            min_depth: 3,
            initial_fee_rate: 5000,
        };
        roundtrip(&Pkt::OpenChannel(msg));
    }
}
