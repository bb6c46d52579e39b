use crate::config::{Ballot, CandidateId, VotingErrors};

/// Pairwise preference counts.
///
/// `get(i, j)` is the number of ballots ranking candidate `i` strictly above `j`.
/// Counts only ever grow, one ballot at a time.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PreferenceMatrix {
    size: usize,
    // Row-major, size * size entries. The diagonal stays at zero.
    counts: Vec<u64>,
    ballots: u64,
}

impl PreferenceMatrix {
    pub fn new(size: usize) -> PreferenceMatrix {
        PreferenceMatrix {
            size,
            counts: vec![0; size * size],
            ballots: 0,
        }
    }

    /// Adds one ballot. The ballot must rank exactly `size` candidates,
    /// otherwise nothing is counted.
    pub fn record(&mut self, ballot: &Ballot) -> Result<(), VotingErrors> {
        let ranks = ballot.ranks();
        if ranks.len() != self.size {
            return Err(VotingErrors::InvalidBallot(format!(
                "ballot ranks {} candidates, the election has {}",
                ranks.len(),
                self.size
            )));
        }
        for (idx, preferred) in ranks.iter().enumerate() {
            for other in ranks[idx + 1..].iter() {
                self.counts[preferred.0 * self.size + other.0] += 1;
            }
        }
        self.ballots += 1;
        Ok(())
    }

    pub fn get(&self, i: CandidateId, j: CandidateId) -> u64 {
        self.counts[i.0 * self.size + j.0]
    }

    /// The strength of the victory of `winner` over `loser`.
    /// Zero if `winner` does not beat `loser`.
    pub fn margin(&self, winner: CandidateId, loser: CandidateId) -> u64 {
        self.get(winner, loser).saturating_sub(self.get(loser, winner))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn ballots(&self) -> u64 {
        self.ballots
    }

    pub fn to_rows(&self) -> Vec<Vec<u64>> {
        self.counts
            .chunks(self.size.max(1))
            .take(self.size)
            .map(|row| row.to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ballot(v: &[usize]) -> Ballot {
        Ballot::new(v.iter().map(|x| CandidateId(*x)).collect(), v.len()).unwrap()
    }

    #[test]
    fn record_counts_every_ordered_pair() {
        let mut m = PreferenceMatrix::new(3);
        m.record(&ballot(&[1, 2, 0])).unwrap();
        assert_eq!(m.to_rows(), vec![vec![0, 0, 0], vec![1, 0, 1], vec![1, 0, 0]]);
        assert_eq!(m.ballots(), 1);
    }

    #[test]
    fn record_is_order_independent() {
        let ballots = [ballot(&[0, 1, 2]), ballot(&[2, 1, 0]), ballot(&[1, 0, 2])];
        let mut forward = PreferenceMatrix::new(3);
        for b in ballots.iter() {
            forward.record(b).unwrap();
        }
        let mut backward = PreferenceMatrix::new(3);
        for b in ballots.iter().rev() {
            backward.record(b).unwrap();
        }
        assert_eq!(forward, backward);
    }

    #[test]
    fn pair_counts_never_exceed_ballots() {
        let mut m = PreferenceMatrix::new(4);
        m.record(&ballot(&[3, 1, 0, 2])).unwrap();
        m.record(&ballot(&[0, 1, 2, 3])).unwrap();
        m.record(&ballot(&[2, 3, 1, 0])).unwrap();
        for i in 0..4 {
            assert_eq!(m.get(CandidateId(i), CandidateId(i)), 0);
            for j in 0..4 {
                if i != j {
                    let total = m.get(CandidateId(i), CandidateId(j))
                        + m.get(CandidateId(j), CandidateId(i));
                    assert_eq!(total, m.ballots());
                }
            }
        }
    }

    #[test]
    fn margin_of_a_defeat_is_zero() {
        let mut m = PreferenceMatrix::new(2);
        m.record(&ballot(&[0, 1])).unwrap();
        m.record(&ballot(&[0, 1])).unwrap();
        m.record(&ballot(&[1, 0])).unwrap();
        assert_eq!(m.margin(CandidateId(0), CandidateId(1)), 1);
        assert_eq!(m.margin(CandidateId(1), CandidateId(0)), 0);
    }

    #[test]
    fn ballots_of_the_wrong_size_are_refused() {
        let mut m = PreferenceMatrix::new(3);
        assert!(matches!(
            m.record(&ballot(&[1, 0])),
            Err(VotingErrors::InvalidBallot(_))
        ));
        assert!(matches!(
            m.record(&ballot(&[3, 1, 0, 2])),
            Err(VotingErrors::InvalidBallot(_))
        ));
        assert_eq!(m, PreferenceMatrix::new(3));
    }

    #[test]
    fn empty_matrix() {
        let m = PreferenceMatrix::new(0);
        assert!(m.to_rows().is_empty());
        assert_eq!(m.ballots(), 0);
    }
}
