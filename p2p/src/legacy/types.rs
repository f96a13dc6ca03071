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

//! Primitive wire types shared by every legacy packet: limb-encoded hashes
//! and signatures, the locktime oneof, and raw serialized pubkeys.

use std::io;

use lightning_encoding::{LightningDecode, LightningEncode};
use secp256k1::PublicKey;

/// A SHA-256 digest carried on the wire as four 64-bit limbs, reassembled
/// little-endian into 32 bytes. This is the legacy protocol's hash encoding;
/// later BOLT dialects just send the 32 bytes directly.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(StrictEncode, StrictDecode)]
pub struct Sha256Hash {
    pub a: u64,
    pub b: u64,
    pub c: u64,
    pub d: u64,
}

impl Sha256Hash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Sha256Hash {
            a: u64::from_le_bytes(bytes[0..8].try_into().expect("slice of len 8")),
            b: u64::from_le_bytes(bytes[8..16].try_into().expect("slice of len 8")),
            c: u64::from_le_bytes(bytes[16..24].try_into().expect("slice of len 8")),
            d: u64::from_le_bytes(bytes[24..32].try_into().expect("slice of len 8")),
        }
    }

    pub fn to_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[0..8].copy_from_slice(&self.a.to_le_bytes());
        out[8..16].copy_from_slice(&self.b.to_le_bytes());
        out[16..24].copy_from_slice(&self.c.to_le_bytes());
        out[24..32].copy_from_slice(&self.d.to_le_bytes());
        out
    }

    pub fn to_hex(self) -> String {
        self.to_bytes().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl LightningEncode for Sha256Hash {
    fn lightning_encode<E: io::Write>(&self, mut e: E) -> Result<usize, io::Error> {
        let bytes = self.to_bytes();
        e.write_all(&bytes)?;
        Ok(bytes.len())
    }
}

impl LightningDecode for Sha256Hash {
    fn lightning_decode<D: io::Read>(mut d: D) -> Result<Self, lightning_encoding::Error> {
        let mut bytes = [0u8; 32];
        d.read_exact(&mut bytes).map_err(lightning_encoding::Error::Io)?;
        Ok(Sha256Hash::from_bytes(bytes))
    }
}

/// A signature carried as eight 64-bit limbs: two 256-bit scalars `r` and `s`,
/// each split into four limbs, matching the legacy protocol's raw
/// fixed-width representation (no DER).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[derive(StrictEncode, StrictDecode)]
pub struct Signature {
    pub r1: u64,
    pub r2: u64,
    pub r3: u64,
    pub r4: u64,
    pub s1: u64,
    pub s2: u64,
    pub s3: u64,
    pub s4: u64,
}

impl Signature {
    pub fn from_scalars(r: [u8; 32], s: [u8; 32]) -> Self {
        let rh = Sha256Hash::from_bytes(r);
        let sh = Sha256Hash::from_bytes(s);
        Signature {
            r1: rh.a,
            r2: rh.b,
            r3: rh.c,
            r4: rh.d,
            s1: sh.a,
            s2: sh.b,
            s3: sh.c,
            s4: sh.d,
        }
    }

    pub fn r_bytes(self) -> [u8; 32] {
        Sha256Hash { a: self.r1, b: self.r2, c: self.r3, d: self.r4 }.to_bytes()
    }

    pub fn s_bytes(self) -> [u8; 32] {
        Sha256Hash { a: self.s1, b: self.s2, c: self.s3, d: self.s4 }.to_bytes()
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "sig(...)")
    }
}

impl LightningEncode for Signature {
    fn lightning_encode<E: io::Write>(&self, mut e: E) -> Result<usize, io::Error> {
        let r = self.r_bytes();
        let s = self.s_bytes();
        e.write_all(&r)?;
        e.write_all(&s)?;
        Ok(r.len() + s.len())
    }
}

impl LightningDecode for Signature {
    fn lightning_decode<D: io::Read>(mut d: D) -> Result<Self, lightning_encoding::Error> {
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        d.read_exact(&mut r).map_err(lightning_encoding::Error::Io)?;
        d.read_exact(&mut s).map_err(lightning_encoding::Error::Io)?;
        Ok(Signature::from_scalars(r, s))
    }
}

/// A relative locktime proposed in `OpenChannel`: the legacy protocol allows
/// either unit but the channel protocol engine rejects the `blocks` variant
/// outright (see [`crate::legacy::channel::OpenChannel`] validation).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
pub enum Locktime {
    #[display("{0}s")]
    Seconds(u32),
    #[display("{0}blocks")]
    Blocks(u32),
}

impl Locktime {
    pub fn is_blocks(self) -> bool {
        matches!(self, Locktime::Blocks(_))
    }

    pub fn value(self) -> u32 {
        match self {
            Locktime::Seconds(v) | Locktime::Blocks(v) => v,
        }
    }
}

const LOCKTIME_SECONDS: u8 = 0;
const LOCKTIME_BLOCKS: u8 = 1;

impl LightningEncode for Locktime {
    fn lightning_encode<E: io::Write>(&self, mut e: E) -> Result<usize, io::Error> {
        let (tag, value) = match *self {
            Locktime::Seconds(v) => (LOCKTIME_SECONDS, v),
            Locktime::Blocks(v) => (LOCKTIME_BLOCKS, v),
        };
        tag.lightning_encode(&mut e)?;
        value.lightning_encode(&mut e)?;
        Ok(5)
    }
}

impl LightningDecode for Locktime {
    fn lightning_decode<D: io::Read>(mut d: D) -> Result<Self, lightning_encoding::Error> {
        let tag = u8::lightning_decode(&mut d)?;
        let value = u32::lightning_decode(&mut d)?;
        match tag {
            LOCKTIME_SECONDS => Ok(Locktime::Seconds(value)),
            LOCKTIME_BLOCKS => Ok(Locktime::Blocks(value)),
            wrong => Err(lightning_encoding::Error::DataIntegrityError(format!(
                "unknown Locktime oneof tag {}",
                wrong
            ))),
        }
    }
}

/// A 33-byte compressed secp256k1 public key as carried on the wire.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct BitcoinPubkey(pub PublicKey);

impl std::fmt::Display for BitcoinPubkey {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl LightningEncode for BitcoinPubkey {
    fn lightning_encode<E: io::Write>(&self, mut e: E) -> Result<usize, io::Error> {
        let bytes = self.0.serialize();
        e.write_all(&bytes)?;
        Ok(bytes.len())
    }
}

impl LightningDecode for BitcoinPubkey {
    fn lightning_decode<D: io::Read>(mut d: D) -> Result<Self, lightning_encoding::Error> {
        let mut bytes = [0u8; 33];
        d.read_exact(&mut bytes).map_err(lightning_encoding::Error::Io)?;
        let key = PublicKey::from_slice(&bytes).map_err(|e| {
            lightning_encoding::Error::DataIntegrityError(format!(
                "malformed BitcoinPubkey: {}",
                e
            ))
        })?;
        Ok(BitcoinPubkey(key))
    }
}

/// Whether a side is offering to be the anchor (on-chain funding) provider.
/// Exactly one side of a channel must offer it.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display)]
#[derive(StrictEncode, StrictDecode)]
pub enum AnchorOffer {
    #[display("will")]
    Will = 1,
    #[display("wont")]
    Wont = 2,
}

impl AnchorOffer {
    pub fn will_fund(self) -> bool {
        matches!(self, AnchorOffer::Will)
    }
}

impl lightning_encoding::Strategy for AnchorOffer {
    type Strategy = lightning_encoding::strategies::AsStrict;
}
