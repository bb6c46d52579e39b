use log::debug;
use std::cmp::Reverse;

use crate::config::CandidateId;
use crate::tally::PreferenceMatrix;

/// A pairwise victory: a strict majority of the ballots rank `winner` above `loser`.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Pair {
    pub winner: CandidateId,
    pub loser: CandidateId,
}

/// Finds all the pairwise victories.
///
/// Pairs come out ordered by the lower candidate index, then the higher one.
/// Tied pairs do not produce anything.
pub fn extract_pairs(matrix: &PreferenceMatrix) -> Vec<Pair> {
    let n = matrix.size();
    let mut pairs: Vec<Pair> = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let (ci, cj) = (CandidateId(i), CandidateId(j));
            let (i_over_j, j_over_i) = (matrix.get(ci, cj), matrix.get(cj, ci));
            if i_over_j > j_over_i {
                pairs.push(Pair {
                    winner: ci,
                    loser: cj,
                });
            } else if i_over_j < j_over_i {
                pairs.push(Pair {
                    winner: cj,
                    loser: ci,
                });
            }
        }
    }
    debug!("extract_pairs: {} pairs: {:?}", pairs.len(), pairs);
    pairs
}

/// Sorts the pairs by decreasing margin of victory.
///
/// The sort is stable: pairs with the same margin keep the order in which
/// `extract_pairs` produced them.
pub fn rank_pairs(matrix: &PreferenceMatrix, pairs: &[Pair]) -> Vec<Pair> {
    let mut ranked = pairs.to_vec();
    ranked.sort_by_key(|p| Reverse(matrix.margin(p.winner, p.loser)));
    debug!("rank_pairs: {:?}", ranked);
    ranked
}
