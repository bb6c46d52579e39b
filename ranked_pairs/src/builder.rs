use crate::config::*;
use crate::Election;

/// A builder for adding votes.
///
/// ```
/// pub use ranked_pairs::builder::Builder;
/// pub use ranked_pairs::ElectionRules;
/// # use ranked_pairs::VotingErrors;
///
/// let mut builder = Builder::new(&ElectionRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_vote_simple(&["bob".to_string(), "Anna".to_string()])?;
///
/// let result = builder.build()?.compute_winner()?;
/// assert_eq!(result.winner, "Bob");
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ElectionRules,
    pub(crate) _election: Option<Election>,
}

impl Builder {
    pub fn new(rules: &ElectionRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _election: None,
        })
    }

    /// Declares the candidates. Any vote added before is discarded.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        let election = Election::new(cands, &self._rules)?;
        Ok(Builder {
            _rules: self._rules,
            _election: Some(election),
        })
    }

    /// Adds a vote given as the names of all the candidates, most preferred first.
    ///
    /// Names are matched without regard to case.
    pub fn add_vote_simple(&mut self, candidates: &[String]) -> Result<(), VotingErrors> {
        let election = self._election.as_mut().ok_or(VotingErrors::EmptyElection)?;
        let ballot = election.ballot_from_names(candidates)?;
        election.tally(&ballot)
    }

    /// Adds a vote given as candidate indices, most preferred first.
    pub fn add_vote(&mut self, ranks: &[CandidateId]) -> Result<(), VotingErrors> {
        let election = self._election.as_mut().ok_or(VotingErrors::EmptyElection)?;
        let ballot = Ballot::new(ranks.to_vec(), election.candidates().len())?;
        election.tally(&ballot)
    }

    pub fn build(self) -> Result<Election, VotingErrors> {
        self._election.ok_or(VotingErrors::EmptyElection)
    }
}
