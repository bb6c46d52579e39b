/*!

This is the long-form manual for `ranked_pairs` and `tideman`.

## The method

Every ballot ranks all the candidates. For every pair of candidates, the
program counts how many ballots prefer one over the other. When a strict
majority prefers `X` over `Y`, the pair `X -> Y` is a pairwise victory,
with a margin equal to the difference between both counts. Tied pairs are
ignored.

Victories are then sorted from the largest margin to the smallest (pairs with
the same margin stay in candidate order) and locked one by one into a graph.
A victory that would create a cycle with the pairs already locked is skipped.
The winner is the candidate with no locked defeat.

When several candidates have no locked defeat (for example when every pair is
tied), the first of them in the order of declaration wins. Use `--strict`
(or `"winnerSelection": "uniqueSource"`) to report an error instead.

## Interactive mode

```bash
tideman Alice Bob Charlie
```

The program asks for the number of voters, then for each voter the name of
the candidate at every rank:

```text
Number of voters: 2
Rank 1: Alice
Rank 2: Charlie
Rank 3: Bob

Rank 1: bob
Rank 2: alice
Rank 3: charlie

Alice
```

Names are not case sensitive. Every ballot must rank all the candidates
exactly once, otherwise the program stops with `Invalid vote.`
At most 9 candidates are accepted unless `--max-candidates` says otherwise.

## Input formats

The following formats are supported with `--input` and `--input-type`:
* `csv` Comma Separated Values (default)
* `json` a JSON list of ballots
* `xlsx` an Excel spreadsheet

### csv

Each row is a ballot and each column, in order, is a rank:

```text
id,choice 1,choice 2,choice 3
b1,Alice,Bob,Charlie
b2,Charlie,Alice,Bob
```

Use `--first-vote-column` (1-based) when the ranks do not start in the first
column and `--id-column` to name ballots in error messages. `--first-vote-row`
(1-based, `firstVoteRowIndex` in a configuration file) tells which row holds
the first ballot, so that header rows are skipped. The example above needs
`--first-vote-column 2 --first-vote-row 2 --id-column 1`.

Empty cells are ignored and names are trimmed.

### json

```text
{"ballots": [
  {"id": "b1", "ranks": ["Alice", "Bob", "Charlie"]},
  {"ranks": ["Charlie", "Alice", "Bob"]}
]}
```

### xlsx

By default the first row of the worksheet is a header and every other row is
a ballot. `--first-vote-row` changes the row of the first ballot.
The ranks start at `--first-vote-column`. The worksheet is chosen with
`--excel-worksheet-name`, or the first worksheet is used.

## Configuration

An election can also be described in a JSON file passed with `--config`:

```text
{
  "outputSettings": {"contestName": "Board election", "contestDate": "2024-05-01"},
  "candidates": [{"name": "Alice"}, {"name": "Bob"}, {"name": "Charlie"}],
  "cvrFileSources": [
    {"provider": "csv", "filePath": "ballots.csv", "firstVoteColumnIndex": 2, "firstVoteRowIndex": 2}
  ],
  "rules": {"maxCandidates": 9, "winnerSelection": "firstSource"}
}
```

File paths are relative to the configuration file. Column indexes may be
numbers, strings holding numbers, or a single Excel column letter.

## Output

The winner is printed on the standard output. With `--out`, a summary of the
election (preference counts, pairs with their margins and whether they were
locked, undefeated candidates and winner) is written in JSON to the given
file, or to the standard output with `--out stdout`. With `--reference`, the
summary is compared with a previously saved summary and any difference is
reported as an error.

*/
