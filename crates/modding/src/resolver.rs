//! Package dependency resolution
//!
//! Validates manifest references and determines a deterministic load order.
//!
//! Edges come from the ordering lists only: `A.load_before = [B]` and
//! `B.load_after = [A]` both mean "A loads before B". `requires` gates
//! existence and adds no edge.
//!
//! Ties are broken by a seed order (the previously saved order, then unseen
//! ids in discovery order), so the output only changes when the constraints
//! force it to.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use tracing::debug;

use crate::error::LoadError;
use crate::manifest::Manifest;

/// Dependency resolver
pub struct DependencyResolver;

impl DependencyResolver {
    /// Resolves a load order for `manifests`.
    ///
    /// `manifests` must have unique ids. `seed` lists ids in preferred order;
    /// unknown seed ids are ignored and manifests absent from the seed rank
    /// after all seeded ones, in slice order.
    ///
    /// Returns indices into `manifests` in load order.
    pub fn resolve<S: AsRef<str>>(
        manifests: &[&Manifest],
        seed: &[S],
    ) -> Result<Vec<usize>, LoadError> {
        let index: HashMap<&str, usize> = manifests
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.as_str(), i))
            .collect();

        let rank = Self::seed_ranks(manifests.len(), &index, seed);
        let mut by_rank: Vec<usize> = (0..manifests.len()).collect();
        by_rank.sort_by_key(|&i| rank[i]);

        Self::validate_references(manifests, &index, &by_rank)?;

        let successors = Self::build_edges(manifests, &index);
        let order = Self::topological_sort(&successors, &rank);

        if order.len() < manifests.len() {
            return Err(Self::cycle_error(manifests, &successors, &order, &by_rank));
        }

        debug!(
            "Dependency resolution complete: {:?}",
            order.iter().map(|&i| &manifests[i].id).collect::<Vec<_>>()
        );

        Ok(order)
    }

    /// Rank of every manifest in the seed order.
    fn seed_ranks<S: AsRef<str>>(
        len: usize,
        index: &HashMap<&str, usize>,
        seed: &[S],
    ) -> Vec<usize> {
        let mut rank = vec![usize::MAX; len];
        let mut next = 0;

        for id in seed {
            if let Some(&i) = index.get(id.as_ref())
                && rank[i] == usize::MAX
            {
                rank[i] = next;
                next += 1;
            }
        }

        for slot in rank.iter_mut().filter(|slot| **slot == usize::MAX) {
            *slot = next;
            next += 1;
        }

        rank
    }

    /// Every referenced id must name a discovered manifest.
    fn validate_references(
        manifests: &[&Manifest],
        index: &HashMap<&str, usize>,
        by_rank: &[usize],
    ) -> Result<(), LoadError> {
        for &i in by_rank {
            let manifest = manifests[i];
            if let Some(missing) = manifest.references().find(|r| !index.contains_key(r)) {
                return Err(LoadError::missing_dependency(&manifest.id, missing));
            }
        }
        Ok(())
    }

    /// Adjacency sets; `successors[a]` holds every `b` that must load after `a`.
    fn build_edges(manifests: &[&Manifest], index: &HashMap<&str, usize>) -> Vec<BTreeSet<usize>> {
        let mut successors = vec![BTreeSet::new(); manifests.len()];

        for (i, manifest) in manifests.iter().enumerate() {
            for target in &manifest.load_before {
                successors[i].insert(index[target.as_str()]);
            }
            for source in &manifest.load_after {
                successors[index[source.as_str()]].insert(i);
            }
        }

        successors
    }

    /// Kahn's algorithm, always taking the eligible vertex with the lowest seed rank.
    fn topological_sort(successors: &[BTreeSet<usize>], rank: &[usize]) -> Vec<usize> {
        let mut in_degree = vec![0usize; successors.len()];
        for targets in successors {
            for &target in targets {
                in_degree[target] += 1;
            }
        }

        let mut ready: BinaryHeap<Reverse<(usize, usize)>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(i, _)| Reverse((rank[i], i)))
            .collect();

        let mut order = Vec::with_capacity(successors.len());
        while let Some(Reverse((_, vertex))) = ready.pop() {
            order.push(vertex);

            for &next in &successors[vertex] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push(Reverse((rank[next], next)));
                }
            }
        }

        order
    }

    /// Describes the vertices left over after the sort.
    ///
    /// Every leftover vertex still has an incoming edge from another leftover
    /// vertex, so walking predecessors from any of them must revisit one; the
    /// loop found that way goes into the message alongside every remaining edge.
    fn cycle_error(
        manifests: &[&Manifest],
        successors: &[BTreeSet<usize>],
        emitted: &[usize],
        by_rank: &[usize],
    ) -> LoadError {
        let mut remaining = vec![true; manifests.len()];
        for &i in emitted {
            remaining[i] = false;
        }

        let mut edges = Vec::new();
        let mut on_edge = vec![false; manifests.len()];
        let mut predecessor = vec![None; manifests.len()];
        for &from in by_rank.iter().filter(|&&i| remaining[i]) {
            for &to in successors[from].iter().filter(|&&j| remaining[j]) {
                edges.push((from, to));
                on_edge[from] = true;
                on_edge[to] = true;
                predecessor[to].get_or_insert(from);
            }
        }

        let involved: Vec<String> = by_rank
            .iter()
            .filter(|&&i| on_edge[i])
            .map(|&i| manifests[i].id.clone())
            .collect();

        let cycle = by_rank
            .iter()
            .find(|&&i| on_edge[i])
            .map(|&start| Self::walk_cycle(start, &predecessor))
            .unwrap_or_default();

        let cycle_text = cycle
            .iter()
            .map(|&i| manifests[i].id.as_str())
            .collect::<Vec<_>>()
            .join(" -> ");
        let edge_text = edges
            .iter()
            .map(|&(from, to)| format!("{} -> {}", manifests[from].id, manifests[to].id))
            .collect::<Vec<_>>()
            .join(", ");

        LoadError::circular_dependency(
            involved,
            format!(
                "circular load order: {} (unresolved constraints: {})",
                cycle_text, edge_text
            ),
        )
    }

    /// Follows predecessor links from `start` until a vertex repeats, then
    /// returns that loop in load direction, closed on its first vertex.
    fn walk_cycle(start: usize, predecessor: &[Option<usize>]) -> Vec<usize> {
        let mut visited = vec![false; predecessor.len()];
        let mut current = start;
        while !visited[current] {
            visited[current] = true;
            match predecessor[current] {
                Some(previous) => current = previous,
                None => return Vec::new(),
            }
        }

        // `current` is on the loop; collect it backwards, then reverse.
        let entry = current;
        let mut cycle = vec![entry];
        while let Some(previous) = predecessor[current] {
            if previous == entry {
                break;
            }
            cycle.push(previous);
            current = previous;
        }
        cycle.reverse();
        cycle.push(cycle[0]);
        cycle
    }
}
