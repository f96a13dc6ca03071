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

//! The Bellman-Ford-Gibson path-finder: amount-dependent shortest-path
//! search over the channel graph, run backwards from destination to source
//! because fees compound in that direction.

use p2p::legacy::BitcoinPubkey;

use crate::router::graph::{EdgeIdx, Graph, NodeConnection, NodeIdx};

/// Maximum supported payment path length. Scratch state is `MAX_HOPS + 1`
/// slots per node, reset at the start of every [`find_route`] call.
pub const MAX_HOPS: usize = 20;

/// Sentinel cost chosen to survive additive relaxation without overflow.
pub const INFINITE: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Blocks per year, derived from a 10-minute block target; the denominator
/// of the time-lock risk premium.
pub const BLOCKS_PER_YEAR: i64 = 52596;

#[derive(Clone, Copy, Debug)]
struct Slot {
    total: i64,
    risk: i64,
    cum_delay: u32,
    prev_edge: Option<EdgeIdx>,
}

impl Default for Slot {
    fn default() -> Self {
        Slot { total: INFINITE, risk: 0, cum_delay: 0, prev_edge: None }
    }
}

/// A discovered path: the peer to forward to first, the total fee charged
/// along the way, and the full ordered edge sequence from the local node to
/// the destination.
#[derive(Clone, Debug)]
pub struct Route {
    pub first_hop: BitcoinPubkey,
    pub fee_total: i64,
    pub edges: Vec<EdgeIdx>,
}

fn edge_fee(edge: &NodeConnection, amount: i64) -> Option<i64> {
    let proportional = (edge.proportional_fee as i64).checked_mul(amount)?;
    let proportional = proportional / 1_000_000;
    (edge.base_fee as i64).checked_add(proportional)
}

fn edge_risk(amount: i64, delay: u32, risk_factor: f64) -> i64 {
    if amount < 0 {
        return 1;
    }
    let premium = (amount as f64) * (delay as f64) * risk_factor / (BLOCKS_PER_YEAR as f64) / 10_000.0;
    1 + premium as i64
}

/// Finds the minimum-cost path from `local` to `dest` carrying `amount_msat`
/// to arrive at `dest`, under risk factor `risk_factor`. `is_live_peer`
/// gates acceptance of the first hop against the caller's connection
/// manager — a first hop that resolves to a node with no live session is
/// treated the same as no route.
pub fn find_route(
    graph: &Graph,
    local: BitcoinPubkey,
    dest: BitcoinPubkey,
    amount_msat: u64,
    risk_factor: f64,
    is_live_peer: impl Fn(BitcoinPubkey) -> bool,
) -> Option<Route> {
    let dest_idx = match graph.find_node(dest) {
        Some(idx) => idx,
        None => {
            log::error!("cannot find {}", dest);
            return None;
        }
    };
    let local_idx = match graph.find_node(local) {
        Some(idx) => idx,
        None => {
            log::error!("cannot find {}", local);
            return None;
        }
    };

    let n = graph.node_count();
    let mut scratch: Vec<[Slot; MAX_HOPS + 1]> = vec![[Slot::default(); MAX_HOPS + 1]; n];
    scratch[dest_idx.0][0] = Slot { total: amount_msat as i64, risk: 0, cum_delay: 0, prev_edge: None };

    for _ in 0..MAX_HOPS {
        for node_pos in 0..n {
            let incoming: Vec<EdgeIdx> = graph.incoming_edges(NodeIdx(node_pos)).to_vec();
            for edge_idx in incoming {
                let edge = *graph.edge(edge_idx);
                for h in 0..MAX_HOPS {
                    let slot = scratch[node_pos][h];
                    if slot.total >= INFINITE {
                        continue;
                    }
                    let cum_delay = slot.cum_delay + edge.delay;
                    if cum_delay < edge.min_blocks {
                        continue;
                    }
                    let fee = match edge_fee(&edge, slot.total) {
                        Some(f) => f,
                        None => continue,
                    };
                    let candidate_total = slot.total + fee;
                    let candidate_risk = slot.risk + edge_risk(candidate_total, edge.delay, risk_factor);

                    let src_pos = edge.src.0;
                    let existing = scratch[src_pos][h + 1];
                    if candidate_total + candidate_risk < existing.total + existing.risk {
                        scratch[src_pos][h + 1] = Slot {
                            total: candidate_total,
                            risk: candidate_risk,
                            cum_delay,
                            prev_edge: Some(edge_idx),
                        };
                    }
                }
            }
        }
    }

    let best = (1..=MAX_HOPS).min_by_key(|&h| scratch[local_idx.0][h].total)?;
    if scratch[local_idx.0][best].total >= INFINITE {
        return None;
    }

    let mut edges = Vec::with_capacity(best);
    let mut cur = local_idx;
    let mut h = best;
    while h > 0 {
        let slot = scratch[cur.0][h];
        let edge_idx = slot.prev_edge.expect("reachable slot always records the edge that reached it");
        edges.push(edge_idx);
        cur = graph.edge(edge_idx).dst;
        h -= 1;
    }

    let first_hop = graph.node(graph.edge(edges[0]).dst).pubkey;
    if !is_live_peer(first_hop) {
        return None;
    }

    let fee_total = scratch[local_idx.0][best].total - amount_msat as i64;
    Some(Route { first_hop, fee_total, edges })
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::{PublicKey, Secp256k1, SecretKey};

    fn pubkey(byte: u8) -> BitcoinPubkey {
        let secp = Secp256k1::new();
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        bytes[0] = 1;
        let sk = SecretKey::from_slice(&bytes).expect("valid scalar");
        BitcoinPubkey(PublicKey::from_secret_key(&secp, &sk))
    }

    fn always_live(_: BitcoinPubkey) -> bool {
        true
    }

    #[test]
    fn single_hop_route_matches_expected_fee() {
        let mut g = Graph::new();
        let l = pubkey(1);
        let x = pubkey(2);
        g.add_connection(l, x, 10, 1000, 6, 0);

        let route = find_route(&g, l, x, 100_000_000, 1.0, always_live).expect("route exists");
        assert_eq!(route.edges.len(), 1);
        assert_eq!(route.fee_total, 100_010);
        assert_eq!(route.first_hop, x);
    }

    #[test]
    fn one_hop_path_wins_ties_over_two_hop() {
        let mut g = Graph::new();
        let l = pubkey(1);
        let x = pubkey(2);
        let y = pubkey(3);
        g.add_connection(l, x, 10, 1000, 6, 0);
        g.add_connection(l, y, 10, 1000, 6, 0);
        g.add_connection(y, x, 0, 0, 6, 0);

        let route = find_route(&g, l, x, 100_000_000, 1.0, always_live).expect("route exists");
        assert_eq!(route.edges.len(), 1);
    }

    #[test]
    fn unknown_destination_yields_no_route() {
        let mut g = Graph::new();
        let l = pubkey(1);
        let x = pubkey(2);
        let y = pubkey(3);
        g.add_connection(l, x, 10, 1000, 6, 0);

        assert!(find_route(&g, l, y, 100_000_000, 1.0, always_live).is_none());
    }

    #[test]
    fn live_peer_predicate_can_veto_the_first_hop() {
        let mut g = Graph::new();
        let l = pubkey(1);
        let x = pubkey(2);
        g.add_connection(l, x, 10, 1000, 6, 0);

        assert!(find_route(&g, l, x, 100_000_000, 1.0, |_| false).is_none());
    }
}
