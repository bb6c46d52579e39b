mod config;
mod lock;
mod pairs;
mod tally;

pub mod builder;
pub mod manual;

use log::{debug, info, warn};

use std::collections::HashSet;

pub use crate::config::*;
pub use crate::lock::{LockDecision, LockGraph};
pub use crate::pairs::Pair;
pub use crate::tally::PreferenceMatrix;

use crate::lock::lock_pairs;
use crate::pairs::{extract_pairs, rank_pairs};

/// The state of one election: the candidates, the rules and the tally so far.
///
/// Nothing is shared between two elections. The candidate list is fixed at
/// creation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    candidates: Vec<Candidate>,
    rules: ElectionRules,
    preferences: PreferenceMatrix,
}

impl Election {
    pub fn new(candidate_names: &[String], rules: &ElectionRules) -> Result<Election, VotingErrors> {
        if candidate_names.is_empty() {
            return Err(VotingErrors::EmptyElection);
        }
        if candidate_names.len() > rules.max_candidates {
            return Err(VotingErrors::TooManyCandidates {
                count: candidate_names.len(),
                max: rules.max_candidates,
            });
        }
        let mut seen: HashSet<String> = HashSet::new();
        for name in candidate_names.iter() {
            if !seen.insert(name.to_lowercase()) {
                return Err(VotingErrors::DuplicateCandidate(name.clone()));
            }
        }
        for (idx, name) in candidate_names.iter().enumerate() {
            info!("Candidate: {}: {}", idx, name);
        }
        Ok(Election {
            candidates: candidate_names
                .iter()
                .map(|name| Candidate { name: name.clone() })
                .collect(),
            rules: rules.clone(),
            preferences: PreferenceMatrix::new(candidate_names.len()),
        })
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn rules(&self) -> &ElectionRules {
        &self.rules
    }

    pub fn preferences(&self) -> &PreferenceMatrix {
        &self.preferences
    }

    /// Finds a candidate by name, ignoring case.
    pub fn candidate_id(&self, name: &str) -> Result<CandidateId, VotingErrors> {
        let lname = name.to_lowercase();
        self.candidates
            .iter()
            .position(|c| c.name.to_lowercase() == lname)
            .map(CandidateId)
            .ok_or_else(|| VotingErrors::UnknownCandidate(name.to_string()))
    }

    /// Turns a list of names, most preferred first, into a ballot.
    pub fn ballot_from_names(&self, names: &[String]) -> Result<Ballot, VotingErrors> {
        let mut ranks: Vec<CandidateId> = Vec::with_capacity(names.len());
        for name in names.iter() {
            ranks.push(self.candidate_id(name)?);
        }
        Ballot::new(ranks, self.candidates.len())
    }

    /// Records one ballot.
    pub fn tally(&mut self, ballot: &Ballot) -> Result<(), VotingErrors> {
        self.preferences.record(ballot)
    }

    /// The locked graph for the ballots recorded so far.
    pub fn lock_graph(&self) -> LockGraph {
        let ranked = rank_pairs(&self.preferences, &extract_pairs(&self.preferences));
        lock_pairs(self.candidates.len(), &ranked).0
    }

    /// Runs the ranked pairs method on the ballots recorded so far.
    ///
    /// The tally is left untouched, calling this again gives the same result.
    pub fn compute_winner(&self) -> Result<ElectionResult, VotingErrors> {
        let matrix = &self.preferences;
        info!(
            "compute_winner: {} candidates, {} ballots",
            self.candidates.len(),
            matrix.ballots()
        );
        if matrix.ballots() == 0 {
            warn!("compute_winner: no ballots were recorded");
        }
        debug!("compute_winner: preferences: {:?}", matrix.to_rows());

        let pairs = extract_pairs(matrix);
        let ranked = rank_pairs(matrix, &pairs);
        let (graph, decisions) = lock_pairs(self.candidates.len(), &ranked);
        debug!("compute_winner: locked: {:?}", graph.to_rows());

        let winner_id = resolve_winner(&graph, self.rules.winner_selection, &self.candidates)?;
        let winner = self.name(winner_id);
        info!("compute_winner: winner: {}", winner);

        let pair_stats: Vec<PairStats> = decisions
            .iter()
            .map(|d| PairStats {
                winner: self.name(d.pair.winner),
                loser: self.name(d.pair.loser),
                votes_for: matrix.get(d.pair.winner, d.pair.loser),
                votes_against: matrix.get(d.pair.loser, d.pair.winner),
                margin: matrix.margin(d.pair.winner, d.pair.loser),
                locked: d.locked,
            })
            .collect();

        Ok(ElectionResult {
            winner,
            winner_id,
            ballots: matrix.ballots(),
            candidates: self.candidates.iter().map(|c| c.name.clone()).collect(),
            preferences: matrix.to_rows(),
            pairs: pair_stats,
            sources: graph.sources().iter().map(|cid| self.name(*cid)).collect(),
        })
    }

    fn name(&self, cid: CandidateId) -> String {
        self.candidates[cid.0].name.clone()
    }
}

/// Picks the winner among the candidates without a locked defeat.
pub fn resolve_winner(
    graph: &LockGraph,
    selection: WinnerSelection,
    candidates: &[Candidate],
) -> Result<CandidateId, VotingErrors> {
    let sources = graph.sources();
    debug!("resolve_winner: sources: {:?}", sources);
    match (selection, sources.as_slice()) {
        (_, []) => Err(VotingErrors::NoWinnerFound),
        (_, [single]) => Ok(*single),
        (WinnerSelection::FirstSource, [first, ..]) => {
            warn!(
                "resolve_winner: {} undefeated candidates, picking the first one in candidate order",
                sources.len()
            );
            Ok(*first)
        }
        (WinnerSelection::UniqueSource, _) => Err(VotingErrors::AmbiguousWinner(
            sources
                .iter()
                .map(|cid| {
                    candidates
                        .get(cid.0)
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| cid.0.to_string())
                })
                .collect(),
        )),
    }
}

/// Runs a complete election from ballots written as candidate names.
pub fn run_election(
    candidates: &[String],
    votes: &[Vec<String>],
    rules: &ElectionRules,
) -> Result<ElectionResult, VotingErrors> {
    info!("run_election: Processing {} votes", votes.len());
    let mut election = Election::new(candidates, rules)?;
    for v in votes.iter() {
        let ballot = election.ballot_from_names(v)?;
        election.tally(&ballot)?;
    }
    election.compute_winner()
}
