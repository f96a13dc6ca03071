// Shared fixtures for the integration test scenarios.

use bitcoin::hashes::{sha256, Hash};
use p2p::legacy::{BitcoinPubkey, Locktime, Sha256Hash, Signature};
use paychan::channel::{ChannelBalances, PeerParams, PeerSession, ShaChain};
use paychan::crypto::{CommitmentParams, CommitmentTx, Keychain};
use secp256k1::{PublicKey, Secp256k1, SecretKey};

/// A deterministic, insecure [`Keychain`] for tests: "signatures" are a hash
/// of the digest and key, "verification" recomputes and compares.
pub struct DumbKeychain;

impl Keychain for DumbKeychain {
    fn build_commitment(&self, params: &CommitmentParams) -> CommitmentTx {
        let mut buf = Vec::new();
        buf.extend_from_slice(&params.revocation_hash.to_bytes());
        buf.extend_from_slice(&params.commit_key.0.serialize());
        buf.extend_from_slice(&params.remote_commit_key.0.serialize());
        buf.extend_from_slice(&params.owner.pay_msat.to_le_bytes());
        buf.extend_from_slice(&params.remote.pay_msat.to_le_bytes());
        let digest = sha256::Hash::hash(&buf);
        CommitmentTx { digest: Sha256Hash::from_bytes(digest.into_inner()) }
    }

    fn sign(&self, tx: &CommitmentTx, key: &BitcoinPubkey) -> Signature {
        let mut buf = Vec::new();
        buf.extend_from_slice(&tx.digest.to_bytes());
        buf.extend_from_slice(&key.0.serialize());
        let r = sha256::Hash::hash(&buf);
        let s = sha256::Hash::hash(r.as_ref());
        Signature::from_scalars(r.into_inner(), s.into_inner())
    }

    fn verify(&self, tx: &CommitmentTx, key: &BitcoinPubkey, sig: &Signature) -> bool {
        self.sign(tx, key) == *sig
    }

    fn anchor_redeem_script(&self, a: &BitcoinPubkey, b: &BitcoinPubkey) -> Vec<u8> {
        let mut script = Vec::with_capacity(66);
        script.extend_from_slice(&a.0.serialize());
        script.extend_from_slice(&b.0.serialize());
        script
    }
}

pub fn pubkey(byte: u8) -> BitcoinPubkey {
    let secp = Secp256k1::new();
    let mut bytes = [0u8; 32];
    bytes[31] = byte;
    bytes[0] = 1;
    let sk = SecretKey::from_slice(&bytes).expect("valid scalar");
    BitcoinPubkey(PublicKey::from_secret_key(&secp, &sk))
}

pub fn hash(byte: u8) -> Sha256Hash {
    Sha256Hash::from_bytes([byte; 32])
}

/// Builds a single side's static parameters from a secret chain seeded at
/// `seed`, with its two eagerly-announced revocation hashes at index 0/1.
pub fn peer_params(commit_key: BitcoinPubkey, final_key: BitcoinPubkey, secrets: &ShaChain, delay: Locktime) -> PeerParams {
    use paychan::channel::revocation_hash;
    PeerParams {
        commit_key,
        final_key,
        delay,
        min_depth: 3,
        commit_fee: 5000,
        revocation_hash: revocation_hash(secrets, 0),
        next_revocation_hash: revocation_hash(secrets, 1),
    }
}

pub fn session(
    us: PeerParams,
    secrets: ShaChain,
    is_anchor_funder: bool,
) -> PeerSession<DumbKeychain> {
    let them = us.clone();
    PeerSession::new(DumbKeychain, us, them, secrets, is_anchor_funder)
}
