// Asks the ballots on the terminal.

use crate::tideman::*;

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> TidemanResult<String> {
    write!(output, "{}", prompt).context(PromptSnafu {})?;
    output.flush().context(PromptSnafu {})?;
    let mut line = String::new();
    let n = input.read_line(&mut line).context(PromptSnafu {})?;
    if n == 0 {
        return EndOfInputSnafu {}.fail();
    }
    Ok(line.trim().to_string())
}

/// Asks for the number of voters, then for every voter the name at each rank.
///
/// A name that is not a candidate stops the input right away.
pub fn read_ballots<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    election: &Election,
) -> TidemanResult<Vec<ParsedBallot>> {
    let voter_count: usize = loop {
        let line = ask(input, output, "Number of voters: ")?;
        match line.parse::<usize>() {
            Ok(n) => break n,
            Err(_) => debug!("read_ballots: not a number: {:?}", line),
        }
    };
    info!("read_ballots: {} voters", voter_count);

    let num_candidates = election.candidates().len();
    let mut res: Vec<ParsedBallot> = Vec::with_capacity(voter_count);
    for voter in 1..=voter_count {
        let ballot_id = format!("voter-{}", voter);
        let mut choices: Vec<String> = Vec::with_capacity(num_candidates);
        for rank in 1..=num_candidates {
            let name = ask(input, output, &format!("Rank {}: ", rank))?;
            election.candidate_id(&name).context(InvalidVoteSnafu {
                ballot: ballot_id.as_str(),
            })?;
            choices.push(name);
        }
        writeln!(output).context(PromptSnafu {})?;
        res.push(ParsedBallot {
            id: Some(ballot_id),
            choices,
        });
    }
    Ok(res)
}
