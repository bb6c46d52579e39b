use serde::Deserialize;

use crate::tideman::*;

#[derive(Debug, Deserialize)]
struct JsonBallot {
    id: Option<String>,
    ranks: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct JsonBallots {
    ballots: Vec<JsonBallot>,
}

/// Reads a file of the form `{"ballots": [{"id": "b1", "ranks": ["A", "B"]}]}`.
pub fn read_json(path: String) -> TidemanResult<Vec<ParsedBallot>> {
    let contents = fs::read_to_string(&path).context(OpeningFileSnafu { path: &path })?;
    let js: JsonBallots = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_json: {} ballots in {:?}", js.ballots.len(), path);
    Ok(js
        .ballots
        .into_iter()
        .map(|b| ParsedBallot {
            id: b.id,
            choices: b.ranks,
        })
        .collect())
}
