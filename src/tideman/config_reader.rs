use crate::tideman::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub date: Option<String>,
    pub jurisdiction: Option<String>,
    pub office: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    _id_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// The source described by the command line flags.
    pub fn from_args(args: &Args, path: &str) -> FileSource {
        FileSource {
            provider: args.input_type.clone().unwrap_or_else(|| "csv".to_string()),
            file_path: path.to_string(),
            _first_vote_column_index: args.first_vote_column.map(JSValue::from),
            _first_vote_row_index: args.first_vote_row.map(JSValue::from),
            _id_column_index: args.id_column.map(JSValue::from),
            excel_worksheet_name: args.excel_worksheet_name.clone(),
        }
    }

    /// 0-based index of the column of the first rank. Defaults to the first column.
    pub fn first_vote_column_index(&self) -> TidemanResult<usize> {
        let x = read_js_int(&self._first_vote_column_index)?.unwrap_or(1);
        Ok(x - 1)
    }

    /// 0-based index of the row of the first ballot.
    pub fn first_vote_row_index(&self, default_row: usize) -> TidemanResult<usize> {
        let x = read_js_int(&self._first_vote_row_index)?.unwrap_or(default_row);
        Ok(x - 1)
    }

    /// 0-based index of the id column, if any.
    pub fn id_column_index(&self) -> TidemanResult<Option<usize>> {
        Ok(read_js_int(&self._id_column_index)?.map(|x| x - 1))
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigCandidate {
    pub name: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ConfigRules {
    #[serde(rename = "maxCandidates")]
    pub max_candidates: Option<usize>,
    #[serde(rename = "winnerSelection")]
    pub winner_selection: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TidemanConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "cvrFileSources")]
    pub cvr_file_sources: Vec<FileSource>,
    pub candidates: Vec<ConfigCandidate>,
    pub rules: Option<ConfigRules>,
}

impl TidemanConfig {
    pub fn election_rules(&self) -> TidemanResult<ElectionRules> {
        let mut res = ElectionRules::DEFAULT_RULES;
        if let Some(rules) = &self.rules {
            if let Some(max) = rules.max_candidates {
                res.max_candidates = max;
            }
            res.winner_selection = match rules.winner_selection.as_deref() {
                None | Some("firstSource") => WinnerSelection::FirstSource,
                Some("uniqueSource") => WinnerSelection::UniqueSource,
                Some(x) => whatever!("unknown winner selection rule: {}", x),
            };
        }
        Ok(res)
    }

    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            contest: self.output_settings.contest_name.clone(),
            date: self.output_settings.contest_date.clone(),
            jurisdiction: self.output_settings.contest_jurisdiction.clone(),
            office: self.output_settings.contest_office.clone(),
        }
    }
}

pub fn read_config(path: &str) -> TidemanResult<TidemanConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> TidemanResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

/// Reads a 1-based index: a number, a string holding a number, or an Excel column letter.
fn read_js_int(x: &Option<JSValue>) -> TidemanResult<Option<usize>> {
    let res = match x {
        None | Some(JSValue::Null) => return Ok(None),
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        // Parsing the Excel-style columns
        Some(JSValue::String(s)) if s.chars().count() == 1 && s.chars().all(char::is_alphabetic) => {
            s.to_lowercase()
                .chars()
                .next()
                .filter(|c| c.is_ascii_lowercase())
                .map(|c| (c as usize) - ('a' as usize) + 1)
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok(),
        Some(_) => None,
    };
    match res {
        Some(idx) if idx >= 1 => Ok(Some(idx)),
        _ => ParsingJsonNumberSnafu {
            content: format!("{:?}", x),
        }
        .fail(),
    }
}
