use crate::error::{ExtractAiError, Result};
use extract_ai_common::ExifMap;
use serde_json::Value;
use std::io::Cursor;

/// 埋め込みEXIFを読み、タグ名→値のマップにする（主画像のIFDのみ）
pub fn extract_exif(bytes: &[u8]) -> Result<ExifMap> {
    let mut cursor = Cursor::new(bytes);
    let exif = exif::Reader::new()
        .read_from_container(&mut cursor)
        .map_err(|e| ExtractAiError::ImageDecode(format!("EXIF: {}", e)))?;

    let mut map = ExifMap::new();
    for field in exif.fields().filter(|f| f.ifd_num == exif::In::PRIMARY) {
        let value = match &field.value {
            // ASCIIは引用符なしの文字列として保持
            exif::Value::Ascii(parts) => parts
                .iter()
                .map(|p| String::from_utf8_lossy(p).trim_end_matches('\0').trim().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            _ => field.display_value().with_unit(&exif).to_string(),
        };
        map.entry(field.tag.to_string())
            .or_insert_with(|| Value::String(value));
    }

    Ok(map)
}

/// EXIF読み取りの失敗は空マップに置き換える
pub fn exif_or_empty(bytes: &[u8]) -> ExifMap {
    match extract_exif(bytes) {
        Ok(map) => map,
        Err(e) => {
            tracing::debug!(error = %e, "no usable EXIF metadata");
            ExifMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_is_error() {
        assert!(extract_exif(b"not an image").is_err());
    }

    #[test]
    fn test_garbage_degrades_to_empty() {
        assert!(exif_or_empty(b"not an image").is_empty());
        assert!(exif_or_empty(&[]).is_empty());
    }

    #[test]
    fn test_png_without_exif() {
        let img = image::RgbImage::new(2, 2);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        assert!(exif_or_empty(buf.get_ref()).is_empty());
    }
}
