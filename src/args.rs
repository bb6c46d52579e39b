use clap::Parser;

/// This is a ranked pairs (Tideman) tabulation program.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The names of the candidates, in order. Ignored when --config is provided.
    #[clap(value_parser)]
    pub candidates: Vec<String>,

    /// (file path, optional) The file containing the election description in JSON.
    /// See the manual of the ranked_pairs library for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, tideman will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file containing the ballots. If not provided (and no --config is given),
    /// the ballots are asked interactively.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv, json or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default 1) The column of the first rank in csv and xlsx inputs, starting at 1.
    #[clap(long, value_parser)]
    pub first_vote_column: Option<usize>,

    /// (default 1) The row of the first ballot in csv inputs, starting at 1. Use 2 to skip a header row.
    #[clap(long, value_parser)]
    pub first_vote_row: Option<usize>,

    /// (optional) The column holding the ballot identifiers in csv and xlsx inputs, starting at 1.
    #[clap(long, value_parser)]
    pub id_column: Option<usize>,

    /// When using an Excel file, indicates the name of the worksheet to use (default: the first one).
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 9) The maximum number of candidates.
    #[clap(long, value_parser)]
    pub max_candidates: Option<usize>,

    /// If set, fails instead of picking the first candidate when several candidates are undefeated.
    #[clap(long, takes_value = false)]
    pub strict: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
