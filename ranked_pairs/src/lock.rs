use log::{debug, info};

use crate::config::CandidateId;
use crate::pairs::Pair;

/// The graph of locked pairwise victories.
///
/// Invariant: the graph is acyclic. `lock_pairs` only adds an edge after
/// checking that it cannot close a cycle.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LockGraph {
    size: usize,
    // locked[w * size + l] means w is locked in over l.
    locked: Vec<bool>,
}

/// What happened to a pair during locking.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct LockDecision {
    pub pair: Pair,
    pub locked: bool,
}

impl LockGraph {
    pub fn new(size: usize) -> LockGraph {
        LockGraph {
            size,
            locked: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_locked(&self, winner: CandidateId, loser: CandidateId) -> bool {
        self.locked[winner.0 * self.size + loser.0]
    }

    fn lock(&mut self, winner: CandidateId, loser: CandidateId) {
        self.locked[winner.0 * self.size + loser.0] = true;
    }

    fn successors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        let row = &self.locked[node * self.size..(node + 1) * self.size];
        row.iter()
            .enumerate()
            .filter_map(|(next, &is_locked)| if is_locked { Some(next) } else { None })
    }

    /// True if a path of locked edges leads from `from` to `to`.
    /// A node always reaches itself.
    pub fn reaches(&self, from: CandidateId, to: CandidateId) -> bool {
        let mut visited = vec![false; self.size];
        let mut stack: Vec<usize> = vec![from.0];
        while let Some(node) = stack.pop() {
            if node == to.0 {
                return true;
            }
            if visited[node] {
                continue;
            }
            visited[node] = true;
            stack.extend(self.successors(node).filter(|next| !visited[*next]));
        }
        false
    }

    /// The candidates that are not the loser of any locked pair, in candidate order.
    pub fn sources(&self) -> Vec<CandidateId> {
        (0..self.size)
            .filter(|&i| (0..self.size).all(|j| !self.is_locked(CandidateId(j), CandidateId(i))))
            .map(CandidateId)
            .collect()
    }

    /// Looks for a directed cycle with a three-color depth first search.
    pub fn has_cycle(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            New,
            Active,
            Done,
        }
        let mut marks = vec![Mark::New; self.size];
        for start in 0..self.size {
            if marks[start] != Mark::New {
                continue;
            }
            // (node, index of the next successor to look at)
            let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
            marks[start] = Mark::Active;
            while let Some((node, next)) = stack.pop() {
                if next == self.size {
                    marks[node] = Mark::Done;
                    continue;
                }
                stack.push((node, next + 1));
                if !self.locked[node * self.size + next] {
                    continue;
                }
                match marks[next] {
                    Mark::Active => return true,
                    Mark::New => {
                        marks[next] = Mark::Active;
                        stack.push((next, 0));
                    }
                    Mark::Done => {}
                }
            }
        }
        false
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.locked
            .chunks(self.size.max(1))
            .take(self.size)
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Locks the pairs in the given order, skipping every pair that would close a cycle.
///
/// A skipped pair is never reconsidered.
pub fn lock_pairs(size: usize, ranked: &[Pair]) -> (LockGraph, Vec<LockDecision>) {
    let mut graph = LockGraph::new(size);
    let mut decisions: Vec<LockDecision> = Vec::with_capacity(ranked.len());
    for pair in ranked.iter() {
        // Locking winner -> loser closes a cycle iff loser already reaches winner.
        let closes_cycle = graph.reaches(pair.loser, pair.winner);
        if closes_cycle {
            info!(
                "lock_pairs: skipping {} -> {}: would create a cycle",
                pair.winner.0, pair.loser.0
            );
        } else {
            debug!("lock_pairs: locking {} -> {}", pair.winner.0, pair.loser.0);
            graph.lock(pair.winner, pair.loser);
        }
        debug_assert!(!graph.has_cycle());
        decisions.push(LockDecision {
            pair: *pair,
            locked: !closes_cycle,
        });
    }
    (graph, decisions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(w: usize, l: usize) -> Pair {
        Pair {
            winner: CandidateId(w),
            loser: CandidateId(l),
        }
    }

    #[test]
    fn reaches_follows_locked_edges_only() {
        let (g, _) = lock_pairs(4, &[pair(0, 1), pair(1, 2)]);
        assert!(g.reaches(CandidateId(0), CandidateId(2)));
        assert!(g.reaches(CandidateId(1), CandidateId(1)));
        assert!(!g.reaches(CandidateId(2), CandidateId(0)));
        assert!(!g.reaches(CandidateId(0), CandidateId(3)));
    }

    #[test]
    fn cycle_closing_pair_is_skipped() {
        // A -> B (3), B -> C (2), C -> A (1)
        let (g, decisions) = lock_pairs(3, &[pair(0, 1), pair(1, 2), pair(2, 0)]);
        let locked: Vec<bool> = decisions.iter().map(|d| d.locked).collect();
        assert_eq!(locked, vec![true, true, false]);
        assert!(!g.is_locked(CandidateId(2), CandidateId(0)));
        assert!(!g.has_cycle());
        assert_eq!(g.sources(), vec![CandidateId(0)]);
    }

    #[test]
    fn skipped_pair_is_not_retried() {
        // C -> A is skipped, later pairs still get locked when they are safe.
        let (g, decisions) =
            lock_pairs(4, &[pair(0, 1), pair(1, 2), pair(2, 0), pair(3, 0), pair(2, 3)]);
        let locked: Vec<bool> = decisions.iter().map(|d| d.locked).collect();
        assert_eq!(locked, vec![true, true, false, true, false]);
        assert_eq!(g.sources(), vec![CandidateId(3)]);
    }

    #[test]
    fn empty_graph_has_every_candidate_as_source() {
        let (g, decisions) = lock_pairs(3, &[]);
        assert!(decisions.is_empty());
        assert_eq!(
            g.sources(),
            vec![CandidateId(0), CandidateId(1), CandidateId(2)]
        );
        assert_eq!(g.to_rows(), vec![vec![false; 3]; 3]);
    }

    #[test]
    fn has_cycle_detects_cycles() {
        let mut g = LockGraph::new(3);
        g.lock(CandidateId(0), CandidateId(1));
        g.lock(CandidateId(1), CandidateId(2));
        assert!(!g.has_cycle());
        g.lock(CandidateId(2), CandidateId(0));
        assert!(g.has_cycle());
    }

    #[test]
    fn full_tournament_on_nine_candidates() {
        // Every pair i -> j with i < j, plus the reversed pairs at the end.
        let mut ranked: Vec<Pair> = Vec::new();
        for i in 0..9 {
            for j in (i + 1)..9 {
                ranked.push(pair(i, j));
            }
        }
        for i in 0..9 {
            for j in (i + 1)..9 {
                ranked.push(pair(j, i));
            }
        }
        let (g, decisions) = lock_pairs(9, &ranked);
        assert_eq!(decisions.iter().filter(|d| d.locked).count(), 36);
        assert!(!g.has_cycle());
        assert_eq!(g.sources(), vec![CandidateId(0)]);
    }
}
