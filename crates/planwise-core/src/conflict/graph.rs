//! Overlap graph over timed events.
//!
//! Nodes are timed (non-all-day) events ordered by start; an edge joins every
//! pair that strictly overlaps. Conflict groups are the connected components.

use std::collections::{HashMap, VecDeque};

use crate::schedule::Event;

/// Adjacency-list graph of strict overlaps, keyed by event id.
#[derive(Debug)]
pub struct OverlapGraph<'a> {
    /// Timed events sorted by start
    nodes: Vec<&'a Event>,
    index: HashMap<&'a str, usize>,
    adjacency: Vec<Vec<usize>>,
}

impl<'a> OverlapGraph<'a> {
    /// Build the graph from an arbitrary-order event collection.
    ///
    /// All-day events are dropped before any comparison, so they can neither
    /// conflict nor bridge two timed events into one group.
    pub fn build(events: &'a [Event]) -> Self {
        let mut nodes: Vec<&Event> = events.iter().filter(|e| !e.all_day).collect();
        nodes.sort_by_key(|e| e.start);

        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.as_str(), i))
            .collect();

        let mut adjacency = vec![Vec::new(); nodes.len()];
        for i in 0..nodes.len() {
            for j in (i + 1)..nodes.len() {
                // Sorted by start: once j starts at or after i ends, no later
                // node can overlap i either.
                if nodes[j].start >= nodes[i].end {
                    break;
                }
                if nodes[i].overlaps(nodes[j]) {
                    adjacency[i].push(j);
                    adjacency[j].push(i);
                }
            }
        }

        Self {
            nodes,
            index,
            adjacency,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Ids of the events directly overlapping `id`.
    pub fn neighbors(&self, id: &str) -> Vec<&'a str> {
        match self.index.get(id) {
            Some(&i) => self.adjacency[i]
                .iter()
                .map(|&j| self.nodes[j].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Connected components found by breadth-first traversal.
    ///
    /// Components come out ordered by their earliest member; members within a
    /// component are ordered by start.
    pub fn components(&self) -> Vec<Vec<&'a Event>> {
        let mut visited = vec![false; self.nodes.len()];
        let mut components = Vec::new();

        for root in 0..self.nodes.len() {
            if visited[root] {
                continue;
            }
            visited[root] = true;

            let mut members = vec![root];
            let mut queue = VecDeque::from([root]);
            while let Some(current) = queue.pop_front() {
                for &next in &self.adjacency[current] {
                    if !visited[next] {
                        visited[next] = true;
                        members.push(next);
                        queue.push_back(next);
                    }
                }
            }

            members.sort_unstable();
            components.push(members.into_iter().map(|i| self.nodes[i]).collect());
        }

        components
    }
}
