use log::{debug, info, warn};

use ranked_pairs::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::tideman::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_prompt;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum TidemanError {
    #[snafu(display("Usage: tideman [candidate ...]"))]
    MissingCandidates {},
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Unexpected cell on line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("CSV line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Cannot read a column or row index from {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Error while prompting for ballots"))]
    Prompt { source: std::io::Error },
    #[snafu(display("Unexpected end of input"))]
    EndOfInput {},
    #[snafu(display("Invalid vote. (ballot {ballot}: {source})"))]
    InvalidVote {
        ballot: String,
        source: VotingErrors,
    },
    #[snafu(display("{source}"))]
    Voting { source: VotingErrors },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

impl TidemanError {
    /// The process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            TidemanError::MissingCandidates {} => 1,
            TidemanError::Voting {
                source: VotingErrors::TooManyCandidates { .. },
            } => 2,
            TidemanError::InvalidVote { .. } => 3,
            _ => 4,
        }
    }
}

pub type TidemanResult<T> = Result<T, TidemanError>;

/// A ballot, as parsed by the readers.
/// Names are not resolved to candidates yet.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub choices: Vec<String>,
}

fn pairs_to_json(pairs: &[PairStats]) -> Vec<JSValue> {
    pairs
        .iter()
        .map(|p| {
            json!({
                "winner": p.winner,
                "loser": p.loser,
                "votesFor": p.votes_for,
                "votesAgainst": p.votes_against,
                "margin": p.margin,
                "locked": p.locked,
            })
        })
        .collect()
}

fn build_summary_js(c: &OutputConfig, result: &ElectionResult) -> JSValue {
    json!({
        "config": c,
        "candidates": result.candidates,
        "ballots": result.ballots,
        "preferences": result.preferences,
        "pairs": pairs_to_json(&result.pairs),
        "sources": result.sources,
        "winner": result.winner,
    })
}

fn read_ranking_data(root_path: &Path, cfs: &FileSource) -> TidemanResult<Vec<ParsedBallot>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read rank file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ranking(p2, cfs),
        "json" => io_json::read_json(p2),
        "xlsx" | "excel" => io_xlsx::read_excel_file(p2, cfs),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

/// Resolves the parsed ballots against the candidates and adds them to the tally.
fn validate_ballots(election: &mut Election, parsed_ballots: &[ParsedBallot]) -> TidemanResult<()> {
    for (idx, pb) in parsed_ballots.iter().enumerate() {
        let ballot_id = pb
            .id
            .clone()
            .unwrap_or_else(|| format!("#{}", idx + 1));
        let choices = io_common::clean_choices(&pb.choices);
        debug!("Choices for ballot {:?}: {:?}", ballot_id, choices);
        let ballot = election
            .ballot_from_names(&choices)
            .context(InvalidVoteSnafu { ballot: ballot_id })?;
        election.tally(&ballot).context(VotingSnafu {})?;
    }
    Ok(())
}

fn rules_from_args(base: ElectionRules, args: &Args) -> ElectionRules {
    let mut rules = base;
    if let Some(max) = args.max_candidates {
        rules.max_candidates = max;
    }
    if args.strict {
        rules.winner_selection = WinnerSelection::UniqueSource;
    }
    rules
}

/// Writes the summary where requested and checks it against the reference, if any.
fn finish_summary<W: Write>(
    summary: &JSValue,
    out: Option<&str>,
    check_summary_path: Option<&str>,
    output: &mut W,
) -> TidemanResult<()> {
    let pretty_js_stats = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    match out {
        Some("stdout") => {
            writeln!(output, "{}", pretty_js_stats).context(WritingFileSnafu { path: "stdout" })?;
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, &pretty_js_stats).context(WritingFileSnafu { path })?;
        }
        None => {}
    }

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            return ReferenceMismatchSnafu {}.fail();
        }
        info!("Summary matches the reference {:?}", summary_p);
    }
    Ok(())
}

/// Runs an election described by a JSON configuration file.
pub fn run_election<W: Write>(
    config_path: &str,
    args: &Args,
    output: &mut W,
) -> TidemanResult<ElectionResult> {
    let config = read_config(config_path)?;
    info!("config: {:?}", config);

    let rules = rules_from_args(config.election_rules()?, args);
    let candidate_names: Vec<String> = config.candidates.iter().map(|c| c.name.clone()).collect();
    let mut election = Election::new(&candidate_names, &rules).context(VotingSnafu {})?;

    if config.cvr_file_sources.is_empty() {
        warn!("run_election: no ballot sources in {:?}", config_path);
    }
    let root_p = Path::new(config_path)
        .parent()
        .unwrap_or_else(|| Path::new(""));
    for cfs in config.cvr_file_sources.iter() {
        let parsed = read_ranking_data(root_p, cfs)?;
        info!("Read {} ballots from {:?}", parsed.len(), cfs.file_path);
        validate_ballots(&mut election, &parsed)?;
    }

    let result = election.compute_winner().context(VotingSnafu {})?;
    let result_js = build_summary_js(&config.output_config(), &result);
    finish_summary(
        &result_js,
        args.out.as_deref(),
        args.reference.as_deref(),
        output,
    )?;
    Ok(result)
}

/// Runs an election with the candidates given on the command line.
///
/// Ballots come from `--input`, or are asked on `input` when no file is given.
pub fn run_candidates<R: BufRead, W: Write>(
    args: &Args,
    input: &mut R,
    output: &mut W,
) -> TidemanResult<ElectionResult> {
    if args.candidates.is_empty() {
        return MissingCandidatesSnafu {}.fail();
    }
    let rules = rules_from_args(ElectionRules::DEFAULT_RULES, args);
    let mut election = Election::new(&args.candidates, &rules).context(VotingSnafu {})?;

    let (parsed, contest) = if let Some(path) = args.input.as_deref() {
        let cfs = FileSource::from_args(args, path);
        (
            read_ranking_data(Path::new(""), &cfs)?,
            io_common::simplify_file_name(path),
        )
    } else {
        (
            io_prompt::read_ballots(input, output, &election)?,
            "interactive".to_string(),
        )
    };
    validate_ballots(&mut election, &parsed)?;

    let result = election.compute_winner().context(VotingSnafu {})?;
    let c = OutputConfig {
        contest,
        date: None,
        jurisdiction: None,
        office: None,
    };
    let result_js = build_summary_js(&c, &result);
    finish_summary(
        &result_js,
        args.out.as_deref(),
        args.reference.as_deref(),
        output,
    )?;
    Ok(result)
}

/// The ballot file options that only apply without a configuration file.
fn ignored_input_flags(args: &Args) -> Vec<&'static str> {
    let flags = [
        ("--input", args.input.is_some()),
        ("--input-type", args.input_type.is_some()),
        ("--first-vote-column", args.first_vote_column.is_some()),
        ("--first-vote-row", args.first_vote_row.is_some()),
        ("--id-column", args.id_column.is_some()),
        ("--excel-worksheet-name", args.excel_worksheet_name.is_some()),
    ];
    flags
        .iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| *name)
        .collect()
}

/// Entry point of the program: runs the election and prints the winner.
pub fn run<R: BufRead, W: Write>(
    args: &Args,
    input: &mut R,
    output: &mut W,
) -> TidemanResult<ElectionResult> {
    let result = if let Some(config_path) = args.config.as_deref() {
        if !args.candidates.is_empty() {
            warn!("Candidates given on the command line are ignored when using --config");
        }
        let ignored = ignored_input_flags(args);
        if !ignored.is_empty() {
            warn!(
                "Input options are ignored when using --config: {}",
                ignored.join(", ")
            );
        }
        run_election(config_path, args, output)?
    } else {
        run_candidates(args, input, output)?
    };
    writeln!(output, "{}", result.winner).context(WritingFileSnafu { path: "stdout" })?;
    Ok(result)
}

#[cfg(test)]
fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) -> ElectionResult {
    let dir = test_data_dir().join(test_name);
    let config = dir.join(format!("{}_config.json", test_name));
    let summary = dir.join(format!("{}_expected_summary.json", test_name));
    info!("Running test {}", test_name);
    let args = Args {
        reference: Some(summary.display().to_string()),
        ..Args::default()
    };
    let mut out: Vec<u8> = Vec::new();
    match run_election(&config.display().to_string(), &args, &mut out) {
        Ok(result) => result,
        Err(e) => panic!("test {} failed: {}", test_name, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn cli_args(cands: &[&str]) -> Args {
        Args {
            candidates: names(cands),
            ..Args::default()
        }
    }

    fn run_with_input(args: &Args, input: &str) -> (TidemanResult<ElectionResult>, String) {
        let mut reader = Cursor::new(input.as_bytes().to_vec());
        let mut out: Vec<u8> = Vec::new();
        let res = run(args, &mut reader, &mut out);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn full_tie() {
        let r = test_wrapper("full_tie");
        assert_eq!(r.winner, "A");
        assert_eq!(r.sources.len(), 3);
    }

    #[test]
    fn margin_ties() {
        let r = test_wrapper("margin_ties");
        assert_eq!(r.winner, "A");
    }

    #[test]
    fn skip_cycle() {
        let r = test_wrapper("skip_cycle");
        assert_eq!(r.winner, "A");
        assert!(!r.pairs[2].locked);
    }

    #[test]
    fn json_ballots() {
        let r = test_wrapper("json_ballots");
        assert_eq!(r.winner, "Charlie");
    }

    #[test]
    fn xlsx_ballots() {
        let r = test_wrapper("xlsx_ballots");
        assert_eq!(r.winner, "Bob");
        assert_eq!(r.ballots, 3);
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let dir = test_data_dir().join("margin_ties");
        let args = Args {
            // The summary of another election.
            reference: Some(
                test_data_dir()
                    .join("skip_cycle")
                    .join("skip_cycle_expected_summary.json")
                    .display()
                    .to_string(),
            ),
            ..Args::default()
        };
        let mut out: Vec<u8> = Vec::new();
        let res = run_election(
            &dir.join("margin_ties_config.json").display().to_string(),
            &args,
            &mut out,
        );
        assert!(matches!(res, Err(TidemanError::ReferenceMismatch {})));
    }

    #[test]
    fn input_flags_are_ignored_with_config() {
        assert!(ignored_input_flags(&Args::default()).is_empty());
        let args = Args {
            config: Some(
                test_data_dir()
                    .join("skip_cycle")
                    .join("skip_cycle_config.json")
                    .display()
                    .to_string(),
            ),
            input: Some("other.csv".to_string()),
            input_type: Some("json".to_string()),
            id_column: Some(3),
            ..Args::default()
        };
        assert_eq!(
            ignored_input_flags(&args),
            vec!["--input", "--input-type", "--id-column"]
        );
        // The ballots still come from the configuration.
        let (res, out) = run_with_input(&args, "");
        assert_eq!(res.unwrap().ballots, 9);
        assert_eq!(out, "A\n");
    }

    #[test]
    fn interactive_election() {
        let input = "2\nAlice\nCharlie\nBob\nbob\nalice\ncharlie\n";
        let (res, out) = run_with_input(&cli_args(&["Alice", "Bob", "Charlie"]), input);
        assert_eq!(res.unwrap().winner, "Alice");
        assert!(out.starts_with("Number of voters: Rank 1: Rank 2: Rank 3: \n"));
        assert!(out.ends_with("Alice\n"));
    }

    #[test]
    fn interactive_invalid_name() {
        let input = "1\nAlice\nZoe\nBob\n";
        let (res, _) = run_with_input(&cli_args(&["Alice", "Bob", "Charlie"]), input);
        let e = res.unwrap_err();
        assert_eq!(e.exit_code(), 3);
        assert!(matches!(&e, TidemanError::InvalidVote { ballot, .. } if ballot == "voter-1"));
        assert!(e.to_string().starts_with("Invalid vote."));
    }

    #[test]
    fn interactive_repeated_name() {
        let input = "1\nAlice\nalice\nBob\n";
        let (res, _) = run_with_input(&cli_args(&["Alice", "Bob", "Charlie"]), input);
        let e = res.unwrap_err();
        assert_eq!(e.exit_code(), 3);
        assert!(matches!(&e, TidemanError::InvalidVote { ballot, .. } if ballot == "voter-1"));
    }

    #[test]
    fn missing_candidates() {
        let (res, _) = run_with_input(&Args::default(), "");
        assert_eq!(res.unwrap_err().exit_code(), 1);
    }

    #[test]
    fn too_many_candidates() {
        let cands = ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"];
        let (res, _) = run_with_input(&cli_args(&cands), "0\n");
        let e = res.unwrap_err();
        assert_eq!(e.exit_code(), 2);
        assert_eq!(e.to_string(), "Maximum number of candidates is 9");

        let args = Args {
            max_candidates: Some(10),
            ..cli_args(&cands)
        };
        let (res, _) = run_with_input(&args, "0\n");
        assert_eq!(res.unwrap().winner, "A");
    }

    #[test]
    fn strict_mode_reports_ties() {
        let args = Args {
            strict: true,
            ..cli_args(&["A", "B"])
        };
        let (res, _) = run_with_input(&args, "2\nA\nB\nB\nA\n");
        let e = res.unwrap_err();
        assert_eq!(e.exit_code(), 4);
        assert!(matches!(
            e,
            TidemanError::Voting {
                source: VotingErrors::AmbiguousWinner(_)
            }
        ));
    }

    #[test]
    fn csv_input_with_summary_file() {
        let dir = tempfile::tempdir().unwrap();
        let ballots = dir.path().join("ballots.csv");
        fs::write(
            &ballots,
            "id,first,second,third\nb1,Bob,Alice,Charlie\nb2,Bob,Charlie,Alice\nb3,Alice,Charlie,Bob\n",
        )
        .unwrap();
        let summary = dir.path().join("summary.json");
        let args = Args {
            input: Some(ballots.display().to_string()),
            first_vote_column: Some(2),
            first_vote_row: Some(2),
            id_column: Some(1),
            out: Some(summary.display().to_string()),
            ..cli_args(&["Alice", "Bob", "Charlie"])
        };
        let (res, out) = run_with_input(&args, "");
        let r = res.unwrap();
        assert_eq!(r.winner, "Bob");
        assert_eq!(out, "Bob\n");

        let js: JSValue = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        assert_eq!(js["winner"], json!("Bob"));
        assert_eq!(js["ballots"], json!(3));
        assert_eq!(js["config"]["contest"], json!("ballots.csv"));
        assert_eq!(js["preferences"][1], json!([2, 0, 2]));
    }

    #[test]
    fn csv_input_reports_ballot_id() {
        let dir = tempfile::tempdir().unwrap();
        let ballots = dir.path().join("ballots.csv");
        fs::write(&ballots, "b1,Bob,Alice\nb2,Bob,Bob\n").unwrap();
        let args = Args {
            input: Some(ballots.display().to_string()),
            first_vote_column: Some(2),
            id_column: Some(1),
            ..cli_args(&["Alice", "Bob"])
        };
        let (res, _) = run_with_input(&args, "");
        match res {
            Err(TidemanError::InvalidVote { ballot, .. }) => assert_eq!(ballot, "b2"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn summary_to_stdout() {
        let args = Args {
            out: Some("stdout".to_string()),
            ..cli_args(&["A", "B"])
        };
        let (res, out) = run_with_input(&args, "1\nB\nA\n");
        assert_eq!(res.unwrap().winner, "B");
        let (summary, winner) = out.trim_end().rsplit_once('\n').unwrap();
        assert_eq!(winner, "B");
        let js_start = summary.find('{').unwrap();
        let js: JSValue = serde_json::from_str(&summary[js_start..]).unwrap();
        assert_eq!(js["pairs"][0]["margin"], json!(1));
        assert_eq!(js["pairs"][0]["locked"], json!(true));
        assert_eq!(js["sources"], json!(["B"]));
    }

    #[test]
    fn unknown_provider() {
        let args = Args {
            input: Some("ballots.txt".to_string()),
            input_type: Some("txt".to_string()),
            ..cli_args(&["A", "B"])
        };
        let (res, _) = run_with_input(&args, "");
        assert_eq!(res.unwrap_err().exit_code(), 4);
    }
}
