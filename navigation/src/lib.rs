#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generic best-first shortest path search.
//!
//! The search operates on any graph whose nodes implement [`Node`]. Nodes are
//! discovered lazily through [`Node::neighbors`], so callers can search a grid
//! without materialising an explicit adjacency list. A search keeps no state
//! between invocations and may run concurrently on independent graphs.
//!
//! Node implementations must expose a stable identity and non-negative edge
//! costs. Neither precondition is validated; an asymmetric neighbor relation
//! or a negative cost produces an unspecified route.

use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
    hash::Hash,
};

use ordered_float::OrderedFloat;

/// Vertex of a graph explored by the search.
pub trait Node: Sized {
    /// Identity used to recognise a node reached through different edges.
    type Id: Clone + Eq + Hash;

    /// Stable identity of the node.
    fn id(&self) -> Self::Id;

    /// Adjacent nodes together with the cost of the connecting edge.
    fn neighbors(&self) -> Vec<Neighbor<Self>>;
}

/// Weighted edge leading to an adjacent node.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighbor<N> {
    node: N,
    distance: f64,
}

impl<N> Neighbor<N> {
    /// Creates an edge to `node` with the provided non-negative cost.
    #[must_use]
    pub const fn new(node: N, distance: f64) -> Self {
        Self { node, distance }
    }

    /// Node reached by following the edge.
    #[must_use]
    pub const fn node(&self) -> &N {
        &self.node
    }

    /// Cost of following the edge.
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }
}

/// Route produced by the search, stored from the goal back to the start.
///
/// Consumers walk the route with [`Path::pop_next`], which removes nodes from
/// the start end so they are yielded in travel order.
#[derive(Clone, Debug, PartialEq)]
pub struct Path<N> {
    nodes: Vec<N>,
}

impl<N> Path<N> {
    /// Wraps nodes that are already ordered from goal to start.
    #[must_use]
    pub fn from_goal_to_start(nodes: Vec<N>) -> Self {
        Self { nodes }
    }

    /// Remaining nodes ordered from goal to start.
    #[must_use]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Number of remaining nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Reports whether every node has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Final node of the route.
    #[must_use]
    pub fn goal(&self) -> Option<&N> {
        self.nodes.first()
    }

    /// Node that will be yielded by the next call to [`Path::pop_next`].
    #[must_use]
    pub fn peek_next(&self) -> Option<&N> {
        self.nodes.last()
    }

    /// Removes and returns the next node in travel order.
    pub fn pop_next(&mut self) -> Option<N> {
        self.nodes.pop()
    }

    /// Converts every node while preserving the route order.
    #[must_use]
    pub fn map<M, F>(self, convert: F) -> Path<M>
    where
        F: FnMut(N) -> M,
    {
        Path {
            nodes: self.nodes.into_iter().map(convert).collect(),
        }
    }

    /// Consumes the route, yielding nodes ordered from goal to start.
    #[must_use]
    pub fn into_nodes(self) -> Vec<N> {
        self.nodes
    }
}

/// Configurable A* search.
///
/// Open nodes with equal `f = g + h` scores are expanded in the order they
/// were (re)inserted, so repeated searches over the same graph return the same
/// route.
#[derive(Clone, Debug)]
pub struct AStar<H> {
    estimate_cost: H,
    max_expansions: Option<usize>,
}

impl<H> AStar<H> {
    /// Creates a search guided by the provided heuristic.
    ///
    /// The heuristic must never overestimate the remaining cost for routes to
    /// be optimal. An overestimating heuristic still terminates but may return
    /// a longer route.
    #[must_use]
    pub const fn new(estimate_cost: H) -> Self {
        Self {
            estimate_cost,
            max_expansions: None,
        }
    }

    /// Stops the search once `limit` nodes have been expanded without reaching
    /// the goal.
    #[must_use]
    pub const fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    /// Searches for the cheapest route from `start` to `goal`.
    ///
    /// Returns `None` when the goal is unreachable or the expansion limit is
    /// exhausted. Partial routes are never returned.
    pub fn find_path<N>(&self, start: N, goal: N) -> Option<Path<N>>
    where
        N: Node + Clone,
        H: Fn(&N, &N) -> f64,
    {
        let goal_id = goal.id();
        let mut entries: Vec<Entry<N>> = Vec::new();
        let mut slots: HashMap<N::Id, usize> = HashMap::new();
        let mut open = BinaryHeap::new();
        let mut sequence: u64 = 0;
        let mut expansions: usize = 0;

        let start_score = (self.estimate_cost)(&start, &goal);
        let _ = slots.insert(start.id(), 0);
        entries.push(Entry::discovered(start, 0.0, None));
        open.push(Candidate::new(start_score, sequence, 0));
        sequence += 1;

        while let Some(candidate) = open.pop() {
            let slot = candidate.slot;
            if entries[slot].closed {
                continue;
            }

            if entries[slot].node.id() == goal_id {
                tracing::debug!(expansions, length = slot_depth(&entries, slot), "path found");
                return Some(reconstruct(&entries, slot));
            }

            if self
                .max_expansions
                .is_some_and(|limit| expansions >= limit)
            {
                tracing::debug!(expansions, "path search hit its expansion limit");
                return None;
            }

            expansions += 1;
            entries[slot].closed = true;
            let from_start = entries[slot].from_start;

            for neighbor in entries[slot].node.neighbors() {
                let tentative = from_start + neighbor.distance;
                let node = neighbor.node;
                let id = node.id();

                let neighbor_slot = match slots.get(&id) {
                    Some(&existing) => {
                        let entry = &entries[existing];
                        if entry.closed || tentative >= entry.from_start {
                            continue;
                        }
                        existing
                    }
                    None => {
                        let created = entries.len();
                        let _ = slots.insert(id, created);
                        entries.push(Entry::discovered(node, f64::INFINITY, None));
                        created
                    }
                };

                let entry = &mut entries[neighbor_slot];
                entry.from_start = tentative;
                entry.came_from = Some(slot);
                let score = tentative + (self.estimate_cost)(&entry.node, &goal);
                open.push(Candidate::new(score, sequence, neighbor_slot));
                sequence += 1;
            }
        }

        tracing::debug!(expansions, "open set exhausted without reaching the goal");
        None
    }
}

/// Searches for the cheapest route from `start` to `goal` without an
/// expansion limit.
///
/// The returned route lists the goal first and the start last.
pub fn find_path<N, H>(start: N, goal: N, estimate_cost: H) -> Option<Path<N>>
where
    N: Node + Clone,
    H: Fn(&N, &N) -> f64,
{
    AStar::new(estimate_cost).find_path(start, goal)
}

struct Entry<N> {
    node: N,
    from_start: f64,
    came_from: Option<usize>,
    closed: bool,
}

impl<N> Entry<N> {
    fn discovered(node: N, from_start: f64, came_from: Option<usize>) -> Self {
        Self {
            node,
            from_start,
            came_from,
            closed: false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Candidate {
    score: OrderedFloat<f64>,
    sequence: u64,
    slot: usize,
}

impl Candidate {
    fn new(score: f64, sequence: u64, slot: usize) -> Self {
        Self {
            score: OrderedFloat(score),
            sequence,
            slot,
        }
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: lowest score first, then earliest insertion.
        other
            .score
            .cmp(&self.score)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn reconstruct<N: Clone>(entries: &[Entry<N>], goal_slot: usize) -> Path<N> {
    let mut nodes = vec![entries[goal_slot].node.clone()];
    let mut current = entries[goal_slot].came_from;
    while let Some(slot) = current {
        nodes.push(entries[slot].node.clone());
        current = entries[slot].came_from;
    }
    Path::from_goal_to_start(nodes)
}

fn slot_depth<N>(entries: &[Entry<N>], slot: usize) -> usize {
    let mut depth = 1;
    let mut current = entries[slot].came_from;
    while let Some(previous) = current {
        depth += 1;
        current = entries[previous].came_from;
    }
    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Diamond<'a> {
        edges: &'a [Vec<(usize, f64)>],
        index: usize,
    }

    impl Node for Diamond<'_> {
        type Id = usize;

        fn id(&self) -> usize {
            self.index
        }

        fn neighbors(&self) -> Vec<Neighbor<Self>> {
            self.edges[self.index]
                .iter()
                .map(|&(index, cost)| {
                    Neighbor::new(
                        Diamond {
                            edges: self.edges,
                            index,
                        },
                        cost,
                    )
                })
                .collect()
        }
    }

    fn route(edges: &[Vec<(usize, f64)>], start: usize, goal: usize) -> Option<Vec<usize>> {
        let start = Diamond { edges, index: start };
        let goal = Diamond { edges, index: goal };
        find_path(start, goal, |_, _| 0.0)
            .map(|path| path.into_nodes().into_iter().map(|node| node.index).collect())
    }

    #[test]
    fn equal_scores_expand_in_insertion_order() {
        // 0 -> {1, 2} -> 3 with identical costs on both branches.
        let via_one_first = vec![
            vec![(1, 1.0), (2, 1.0)],
            vec![(3, 1.0)],
            vec![(3, 1.0)],
            vec![],
        ];
        let via_two_first = vec![
            vec![(2, 1.0), (1, 1.0)],
            vec![(3, 1.0)],
            vec![(3, 1.0)],
            vec![],
        ];

        assert_eq!(route(&via_one_first, 0, 3), Some(vec![3, 1, 0]));
        assert_eq!(route(&via_two_first, 0, 3), Some(vec![3, 2, 0]));
    }

    #[test]
    fn start_equal_to_goal_yields_single_node() {
        let edges = vec![vec![(1, 1.0)], vec![(0, 1.0)]];
        assert_eq!(route(&edges, 1, 1), Some(vec![1]));
    }

    #[test]
    fn candidate_ordering_prefers_lower_score_then_earlier_sequence() {
        let mut heap = BinaryHeap::new();
        heap.push(Candidate::new(2.0, 0, 0));
        heap.push(Candidate::new(1.0, 2, 1));
        heap.push(Candidate::new(1.0, 1, 2));

        let order: Vec<_> = std::iter::from_fn(|| heap.pop().map(|c| c.slot)).collect();
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn path_pops_in_travel_order() {
        let mut path = Path::from_goal_to_start(vec!['g', 'b', 's']);
        assert_eq!(path.goal(), Some(&'g'));
        assert_eq!(path.peek_next(), Some(&'s'));
        assert_eq!(path.pop_next(), Some('s'));
        assert_eq!(path.pop_next(), Some('b'));
        assert_eq!(path.pop_next(), Some('g'));
        assert!(path.is_empty());
        assert_eq!(path.pop_next(), None);
    }
}
