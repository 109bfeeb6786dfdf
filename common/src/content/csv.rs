//! CSV解析
//!
//! 1行目をヘッダーとして読み、空行は読み飛ばす。
//! 列数の揃わない行があればファイル全体をパース失敗（0行）として扱う。

use crate::types::CsvAnalysis;

/// レポートに載せるデータ行の上限
pub const SAMPLE_ROW_LIMIT: usize = 5;

/// 行数・列数・ヘッダーを求める（データ行が0ならヘッダーも空）
pub fn analyze_csv(bytes: &[u8]) -> CsvAnalysis {
    read_records(bytes).unwrap_or_default()
}

fn read_records(bytes: &[u8]) -> Result<CsvAnalysis, ::csv::Error> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    // 重複した見出しは最初の位置にまとめる（値は後の列が優先）
    let mut headers: Vec<String> = Vec::new();
    let mut column_of: Vec<usize> = Vec::new();
    for name in reader.headers()?.iter() {
        match headers.iter().position(|h| h == name) {
            Some(pos) => column_of.push(pos),
            None => {
                column_of.push(headers.len());
                headers.push(name.to_string());
            }
        }
    }

    let mut rows = 0;
    let mut sample_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows += 1;

        if sample_rows.len() < SAMPLE_ROW_LIMIT {
            let mut row = vec![String::new(); headers.len()];
            for (idx, cell) in record.iter().enumerate() {
                if let Some(&col) = column_of.get(idx) {
                    row[col] = cell.to_string();
                }
            }
            sample_rows.push(row);
        }
    }

    if rows == 0 {
        return Ok(CsvAnalysis::default());
    }

    Ok(CsvAnalysis {
        rows,
        columns: headers.len(),
        headers,
        sample_rows,
    })
}
