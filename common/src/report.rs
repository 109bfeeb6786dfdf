//! CSVレポート生成
//!
//! - 画像/テキスト/JSON/XML: `metric,value` 形式
//! - CSV: ヘッダー + 先頭5行
//! - 複数ファイルの結合（`file_N,` プレフィックス）とJSONエクスポート

use crate::error::{Error, Result};
use crate::types::{
    CategoryAnalysis, ContentAnalysis, CsvAnalysis, ImageFindings, JsonAnalysis, TextAnalysis,
    XmlAnalysis,
};
use crate::metrics;
use serde_json::{json, Value};

const METRIC_HEADER: [&str; 2] = ["metric", "value"];

/// カテゴリ別のCSVレポートを生成
pub fn csv_report(analysis: &CategoryAnalysis) -> Result<String> {
    match analysis {
        CategoryAnalysis::Image(findings) => image_report(findings),
        CategoryAnalysis::Content(ContentAnalysis::Text(text)) => text_report(text),
        CategoryAnalysis::Content(ContentAnalysis::Json(json)) => json_report(json),
        CategoryAnalysis::Content(ContentAnalysis::Csv(csv)) => csv_sample_report(csv),
        CategoryAnalysis::Content(ContentAnalysis::Xml(xml)) => xml_report(xml),
    }
}

pub fn image_report(findings: &ImageFindings) -> Result<String> {
    metric_report(&[
        ("width", findings.width.to_string()),
        ("height", findings.height.to_string()),
        (
            "megapixels",
            metrics::megapixels(findings.width, findings.height).to_string(),
        ),
        ("colors", findings.visual.colors.len().to_string()),
        ("objects", findings.visual.objects.len().to_string()),
    ])
}

pub fn text_report(text: &TextAnalysis) -> Result<String> {
    metric_report(&[
        ("characters", text.character_count.to_string()),
        ("words", text.word_count.to_string()),
        ("lines", text.line_count.to_string()),
    ])
}

pub fn json_report(json: &JsonAnalysis) -> Result<String> {
    metric_report(&[
        ("parse_ok", json.parse_ok.to_string()),
        ("root_type", json.root_type.clone()),
        ("keys_count", json.keys_count.to_string()),
        ("depth", json.depth.to_string()),
    ])
}

pub fn xml_report(xml: &XmlAnalysis) -> Result<String> {
    metric_report(&[
        ("parse_ok", xml.parse_ok.to_string()),
        ("root", xml.root.clone()),
        ("depth", xml.depth.to_string()),
    ])
}

/// ヘッダー行 + サンプル行（データ行が0なら空文字列）
pub fn csv_sample_report(csv: &CsvAnalysis) -> Result<String> {
    if csv.headers.is_empty() {
        return Ok(String::new());
    }

    let mut rows: Vec<&[String]> = Vec::with_capacity(csv.sample_rows.len() + 1);
    rows.push(&csv.headers);
    rows.extend(csv.sample_rows.iter().map(Vec::as_slice));
    write_rows(rows)
}

fn metric_report(entries: &[(&str, String)]) -> Result<String> {
    let mut rows: Vec<Vec<&str>> = vec![METRIC_HEADER.to_vec()];
    rows.extend(entries.iter().map(|(name, value)| vec![*name, value.as_str()]));
    write_rows(rows)
}

/// 行を `\n` 区切りのCSVに書き出す（区切り文字を含むセルは引用符で囲む）
fn write_rows<R, C>(rows: impl IntoIterator<Item = R>) -> Result<String>
where
    R: IntoIterator<Item = C>,
    C: AsRef<[u8]>,
{
    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
    let mut report =
        String::from_utf8(bytes).map_err(|e| Error::Parse(format!("report is not UTF-8: {}", e)))?;

    if report.ends_with('\n') {
        report.pop();
    }
    Ok(report)
}

// =============================================
// エクスポート
// =============================================

/// 複数ファイルのレポートを1つのCSVに結合
///
/// i番目のレポートの各行（空行を除く）に `file_{i+1},` を付ける。
pub fn combine_csv_reports(reports: &[&str]) -> String {
    reports
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            report
                .split('\n')
                .filter(|line| !line.is_empty())
                .map(|line| format!("file_{},{}", idx + 1, line))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSONエクスポート用のペイロード
///
/// 1件ならそのまま、複数なら `{success, count, reports}`、0件なら `{}`
pub fn export_json_payload(mut reports: Vec<Value>) -> Value {
    match reports.len() {
        0 => json!({}),
        1 => reports.remove(0),
        count => json!({
            "success": true,
            "count": count,
            "reports": reports,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColorSwatch, DetectedObject, VisualAnalysis};

    #[test]
    fn test_image_report() {
        let findings = ImageFindings {
            format_tag: "png".to_string(),
            width: 1920,
            height: 1080,
            exif: Default::default(),
            visual: VisualAnalysis {
                colors: vec![ColorSwatch::default(); 3],
                objects: vec![DetectedObject::default()],
                ..Default::default()
            },
        };
        let report = image_report(&findings).unwrap();
        assert_eq!(
            report,
            "metric,value\nwidth,1920\nheight,1080\nmegapixels,2.07\ncolors,3\nobjects,1"
        );
    }

    #[test]
    fn test_whole_megapixels_have_no_fraction() {
        let findings = ImageFindings {
            width: 4000,
            height: 3000,
            ..Default::default()
        };
        assert!(image_report(&findings).unwrap().contains("megapixels,12\n"));
    }

    #[test]
    fn test_text_report() {
        let text = TextAnalysis {
            character_count: 29,
            word_count: 5,
            line_count: 3,
            ..Default::default()
        };
        assert_eq!(
            text_report(&text).unwrap(),
            "metric,value\ncharacters,29\nwords,5\nlines,3"
        );
    }

    #[test]
    fn test_json_report_invalid() {
        let json = JsonAnalysis {
            parse_ok: false,
            root_type: "invalid".to_string(),
            keys_count: 0,
            depth: 0,
        };
        assert_eq!(
            json_report(&json).unwrap(),
            "metric,value\nparse_ok,false\nroot_type,invalid\nkeys_count,0\ndepth,0"
        );
    }

    #[test]
    fn test_xml_report() {
        let xml = XmlAnalysis {
            parse_ok: true,
            root: "catalog".to_string(),
            depth: 4,
        };
        assert_eq!(
            xml_report(&xml).unwrap(),
            "metric,value\nparse_ok,true\nroot,catalog\ndepth,4"
        );
    }

    #[test]
    fn test_csv_sample_report() {
        let csv = crate::content::analyze_csv(b"a,b,c\n1,2,3\n4,5,6\n");
        let report = csv_sample_report(&csv).unwrap();
        assert_eq!(report, "a,b,c\n1,2,3\n4,5,6");
        assert!(report.starts_with("a,b,c"));
        assert_eq!(report.lines().count(), 3);
    }

    #[test]
    fn test_csv_report_quotes_separators() {
        let csv = crate::content::analyze_csv(b"city,country\n\"Paris, FR\",France\n");
        assert_eq!(
            csv_sample_report(&csv).unwrap(),
            "city,country\n\"Paris, FR\",France"
        );
    }

    #[test]
    fn test_csv_report_empty_when_no_rows() {
        let csv = crate::content::analyze_csv(b"a,b\n");
        assert_eq!(csv_sample_report(&csv).unwrap(), "");
    }

    #[test]
    fn test_dispatch_by_category() {
        let analysis = CategoryAnalysis::Content(ContentAnalysis::Xml(XmlAnalysis::default()));
        assert!(csv_report(&analysis).unwrap().starts_with("metric,value\nparse_ok,false"));
    }

    #[test]
    fn test_combine_csv_reports() {
        let combined = combine_csv_reports(&["metric,value\nwidth,10", "", "a,b\n1,2\n"]);
        assert_eq!(
            combined,
            "file_1,metric,value\nfile_1,width,10\nfile_3,a,b\nfile_3,1,2"
        );
    }

    #[test]
    fn test_export_json_payload() {
        assert_eq!(export_json_payload(vec![]), json!({}));
        assert_eq!(export_json_payload(vec![json!({"a": 1})]), json!({"a": 1}));

        let payload = export_json_payload(vec![json!({"a": 1}), json!({"b": 2})]);
        assert_eq!(payload["success"], json!(true));
        assert_eq!(payload["count"], json!(2));
        assert_eq!(payload["reports"][1], json!({"b": 2}));
    }
}
