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

//! The in-memory channel graph: nodes and directed edges living in two
//! vectors, referenced by index rather than by pointer or `Rc`.

use std::collections::HashMap;

use p2p::legacy::BitcoinPubkey;

/// An index into [`Graph`]'s node vector. Stable across edge insertion and
/// removal; nodes are never removed once created.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct NodeIdx(pub(crate) usize);

/// An index into [`Graph`]'s edge vector. Invalidated by [`Graph::remove_connection`]
/// on the edge it names, and by removal of whichever other edge happened to
/// occupy the vector's last slot (the swap-remove target) — callers must not
/// retain an `EdgeIdx` across a removal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct EdgeIdx(pub(crate) usize);

/// A node in the channel graph, identified by its compressed public key.
#[derive(Clone, Debug)]
pub struct Node {
    pub pubkey: BitcoinPubkey,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub(crate) outgoing: Vec<EdgeIdx>,
    pub(crate) incoming: Vec<EdgeIdx>,
}

/// A directed channel edge: `src`'s willingness to forward to `dst` under
/// the given fee and time-lock terms.
#[derive(Clone, Copy, Debug)]
pub struct NodeConnection {
    pub src: NodeIdx,
    pub dst: NodeIdx,
    pub base_fee: u32,
    pub proportional_fee: i32,
    pub delay: u32,
    pub min_blocks: u32,
}

/// The channel graph. Nodes are created on demand by either
/// [`Graph::add_node`] or [`Graph::add_connection`]; edges are upserted
/// in-place on a repeated `add_connection` for the same ordered pair.
#[derive(Default)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<NodeConnection>,
    by_pubkey: HashMap<BitcoinPubkey, NodeIdx>,
}

impl Graph {
    pub fn new() -> Self {
        Graph::default()
    }

    pub fn find_node(&self, pubkey: BitcoinPubkey) -> Option<NodeIdx> {
        self.by_pubkey.get(&pubkey).copied()
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.0]
    }

    pub fn edge(&self, idx: EdgeIdx) -> &NodeConnection {
        &self.edges[idx.0]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn incoming_edges(&self, idx: NodeIdx) -> &[EdgeIdx] {
        &self.nodes[idx.0].incoming
    }

    fn get_or_create(&mut self, pubkey: BitcoinPubkey) -> NodeIdx {
        if let Some(&idx) = self.by_pubkey.get(&pubkey) {
            return idx;
        }
        let idx = NodeIdx(self.nodes.len());
        self.nodes.push(Node { pubkey, host: None, port: None, outgoing: vec![], incoming: vec![] });
        self.by_pubkey.insert(pubkey, idx);
        idx
    }

    /// Upserts a node's display metadata, creating it if unseen.
    pub fn add_node(&mut self, pubkey: BitcoinPubkey, host: Option<String>, port: Option<u16>) -> NodeIdx {
        let idx = self.get_or_create(pubkey);
        let node = &mut self.nodes[idx.0];
        node.host = host;
        node.port = port;
        idx
    }

    fn find_edge(&self, src: NodeIdx, dst: NodeIdx) -> Option<EdgeIdx> {
        self.nodes[src.0]
            .outgoing
            .iter()
            .copied()
            .find(|&e| self.edges[e.0].dst == dst)
    }

    /// Upserts the directed edge `from -> to`. Creates either endpoint
    /// silently if it doesn't already exist.
    pub fn add_connection(
        &mut self,
        from: BitcoinPubkey,
        to: BitcoinPubkey,
        base_fee: u32,
        proportional_fee: i32,
        delay: u32,
        min_blocks: u32,
    ) -> EdgeIdx {
        let src = self.get_or_create(from);
        let dst = self.get_or_create(to);
        if let Some(existing) = self.find_edge(src, dst) {
            let edge = &mut self.edges[existing.0];
            edge.base_fee = base_fee;
            edge.proportional_fee = proportional_fee;
            edge.delay = delay;
            edge.min_blocks = min_blocks;
            return existing;
        }
        let idx = EdgeIdx(self.edges.len());
        self.edges.push(NodeConnection { src, dst, base_fee, proportional_fee, delay, min_blocks });
        self.nodes[src.0].outgoing.push(idx);
        self.nodes[dst.0].incoming.push(idx);
        idx
    }

    /// Removes the edge `from -> to`, if any. Idempotent: absence is logged,
    /// not an error.
    pub fn remove_connection(&mut self, from: BitcoinPubkey, to: BitcoinPubkey) {
        let (src, dst) = match (self.find_node(from), self.find_node(to)) {
            (Some(s), Some(d)) => (s, d),
            _ => {
                log::debug!("remove_connection: unknown endpoint, nothing to remove");
                return;
            }
        };
        let edge_idx = match self.find_edge(src, dst) {
            Some(e) => e,
            None => {
                log::debug!("remove_connection: no edge between the given nodes");
                return;
            }
        };
        self.unlink(edge_idx, src, dst);
    }

    fn unlink(&mut self, edge_idx: EdgeIdx, src: NodeIdx, dst: NodeIdx) {
        self.nodes[src.0].outgoing.retain(|&e| e != edge_idx);
        self.nodes[dst.0].incoming.retain(|&e| e != edge_idx);

        let last = EdgeIdx(self.edges.len() - 1);
        self.edges.swap_remove(edge_idx.0);
        if edge_idx != last {
            let moved = self.edges[edge_idx.0];
            let fix = |list: &mut Vec<EdgeIdx>| {
                if let Some(slot) = list.iter_mut().find(|e| **e == last) {
                    *slot = edge_idx;
                }
            };
            fix(&mut self.nodes[moved.src.0].outgoing);
            fix(&mut self.nodes[moved.dst.0].incoming);
        }
    }

    pub fn list_channels(&self) -> impl Iterator<Item = &NodeConnection> {
        self.edges.iter()
    }

    pub fn list_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
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

    #[test]
    fn add_connection_creates_missing_nodes() {
        let mut g = Graph::new();
        let a = pubkey(1);
        let b = pubkey(2);
        g.add_connection(a, b, 10, 1000, 6, 0);
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.list_channels().count(), 1);
    }

    #[test]
    fn re_adding_an_edge_updates_in_place() {
        let mut g = Graph::new();
        let a = pubkey(1);
        let b = pubkey(2);
        g.add_connection(a, b, 10, 1000, 6, 0);
        g.add_connection(a, b, 20, 2000, 12, 3);
        assert_eq!(g.list_channels().count(), 1);
        let edge = g.list_channels().next().unwrap();
        assert_eq!(edge.base_fee, 20);
        assert_eq!(edge.delay, 12);
    }

    #[test]
    fn remove_connection_unlinks_both_adjacency_lists() {
        let mut g = Graph::new();
        let a = pubkey(1);
        let b = pubkey(2);
        let c = pubkey(3);
        g.add_connection(a, b, 10, 1000, 6, 0);
        g.add_connection(a, c, 5, 500, 3, 0);
        g.remove_connection(a, b);
        assert_eq!(g.list_channels().count(), 1);
        let a_idx = g.find_node(a).unwrap();
        assert_eq!(g.node(a_idx).outgoing.len(), 1);
    }

    #[test]
    fn remove_connection_on_unknown_pair_is_idempotent() {
        let mut g = Graph::new();
        let a = pubkey(1);
        let b = pubkey(2);
        g.remove_connection(a, b);
        assert_eq!(g.node_count(), 0);
    }
}
