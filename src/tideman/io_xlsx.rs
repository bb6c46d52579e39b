use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::tideman::{io_common::make_default_id, *};

/// Reads the ballots of an Excel sheet. The first row is a header unless
/// the source says otherwise.
pub fn read_excel_file(path: String, cfs: &FileSource) -> TidemanResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(&path);
    let wrange = get_range(&path, cfs)?;

    let first_row = cfs.first_vote_row_index(2)?;
    let start_col = cfs.first_vote_column_index()?;
    let id_idx_o = cfs.id_column_index()?;
    debug!(
        "read_excel_file: first_row: {:?} start_col: {:?}",
        first_row, start_col
    );

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in wrange.rows().enumerate().skip(first_row) {
        let lineno = idx + 1;
        let id = match id_idx_o {
            Some(id_idx) => match row.get(id_idx) {
                Some(cell) => read_cell(cell, lineno)?,
                None => default_id(lineno),
            },
            None => default_id(lineno),
        };
        let choices = row
            .iter()
            .skip(start_col)
            .map(|cell| read_cell(cell, lineno))
            .collect::<TidemanResult<Vec<String>>>()?;
        debug!("read_excel_file: lineno: {:?} choices: {:?}", lineno, &choices);
        res.push(ParsedBallot {
            id: Some(id),
            choices,
        });
    }
    Ok(res)
}

fn read_cell(cell: &DataType, lineno: usize) -> TidemanResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Empty => Ok("".to_string()),
        // Numeric identifiers are common in spreadsheets. Excel stores them as floats.
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(format!("{}", *f as i64)),
        DataType::Float(f) => Ok(f.to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, cfs: &FileSource) -> TidemanResult<Range<DataType>> {
    debug!(
        "read_excel_file: path: {:?} worksheet: {:?}",
        path, &cfs.excel_worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    match cfs.excel_worksheet_name.as_deref() {
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningExcelSnafu { path }),
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path }),
    }
}
