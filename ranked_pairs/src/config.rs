// ********* Input data structures ***********

use std::collections::HashSet;
use std::error::Error;
use std::fmt::Display;

/// The position of a candidate in the list given at the start of an election.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub usize);

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Candidate {
    pub name: String,
}

/// A complete ranking of all the candidates, most preferred first.
///
/// A ballot can only be built from a permutation of all the candidate ids,
/// so the tally never has to deal with repeated or missing candidates.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Ballot {
    ranks: Vec<CandidateId>,
}

impl Ballot {
    pub fn new(ranks: Vec<CandidateId>, num_candidates: usize) -> Result<Ballot, VotingErrors> {
        if ranks.len() != num_candidates {
            return Err(VotingErrors::InvalidBallot(format!(
                "expected {} ranks, got {}",
                num_candidates,
                ranks.len()
            )));
        }
        let mut seen: HashSet<CandidateId> = HashSet::new();
        for cid in ranks.iter() {
            if cid.0 >= num_candidates {
                return Err(VotingErrors::InvalidBallot(format!(
                    "unknown candidate index {}",
                    cid.0
                )));
            }
            if !seen.insert(*cid) {
                return Err(VotingErrors::InvalidBallot(format!(
                    "candidate index {} ranked more than once",
                    cid.0
                )));
            }
        }
        Ok(Ballot { ranks })
    }

    pub fn ranks(&self) -> &[CandidateId] {
        &self.ranks
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }
}

// ******** Output data structures *********

/// One pairwise victory, as it was processed by the locking step.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairStats {
    pub winner: String,
    pub loser: String,
    /// Ballots ranking the winner above the loser.
    pub votes_for: u64,
    /// Ballots ranking the loser above the winner.
    pub votes_against: u64,
    pub margin: u64,
    pub locked: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub winner: String,
    pub winner_id: CandidateId,
    pub ballots: u64,
    pub candidates: Vec<String>,
    /// preferences[i][j] is the number of ballots ranking i above j.
    pub preferences: Vec<Vec<u64>>,
    /// All the pairwise victories, strongest first.
    pub pairs: Vec<PairStats>,
    /// The candidates without any locked defeat, in candidate order.
    pub sources: Vec<String>,
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum VotingErrors {
    EmptyElection,
    TooManyCandidates { count: usize, max: usize },
    DuplicateCandidate(String),
    UnknownCandidate(String),
    InvalidBallot(String),
    /// The locked graph has no source. This can only come from a broken invariant.
    NoWinnerFound,
    /// Several candidates are undefeated and the rules ask for a unique one.
    AmbiguousWinner(Vec<String>),
}

impl Error for VotingErrors {}

impl Display for VotingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VotingErrors::EmptyElection => write!(f, "no candidates in the election"),
            VotingErrors::TooManyCandidates { max, .. } => {
                write!(f, "Maximum number of candidates is {}", max)
            }
            VotingErrors::DuplicateCandidate(name) => {
                write!(f, "candidate {:?} is declared more than once", name)
            }
            VotingErrors::UnknownCandidate(name) => write!(f, "unknown candidate {:?}", name),
            VotingErrors::InvalidBallot(msg) => write!(f, "Invalid vote: {}", msg),
            VotingErrors::NoWinnerFound => {
                write!(f, "internal error: the locked graph has no source")
            }
            VotingErrors::AmbiguousWinner(names) => {
                write!(f, "no unique winner, undefeated candidates: {}", names.join(", "))
            }
        }
    }
}

// ********* Configuration **********

/// How to pick the winner among the candidates that have no locked defeat.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum WinnerSelection {
    /// The first undefeated candidate in the order of declaration.
    /// This also decides elections in which every pair is tied.
    FirstSource,
    /// Fail if more than one candidate is undefeated.
    UniqueSource,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionRules {
    pub max_candidates: usize,
    pub winner_selection: WinnerSelection,
}

impl ElectionRules {
    pub const DEFAULT_MAX_CANDIDATES: usize = 9;

    pub const DEFAULT_RULES: ElectionRules = ElectionRules {
        max_candidates: ElectionRules::DEFAULT_MAX_CANDIDATES,
        winner_selection: WinnerSelection::FirstSource,
    };
}

impl Default for ElectionRules {
    fn default() -> Self {
        ElectionRules::DEFAULT_RULES
    }
}
