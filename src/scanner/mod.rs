//! 画像ヘッダーの読み取り
//!
//! 全体をデコードせず、フォーマットと寸法だけを取り出す。

mod exif;

pub use self::exif::{exif_or_empty, extract_exif};

use crate::error::{ExtractAiError, Result};
use image::{ImageFormat, ImageReader};
use std::io::Cursor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageHeader {
    /// 正規の拡張子（jpg, png, gif, webp ...）
    pub format_tag: String,
    pub width: u32,
    pub height: u32,
}

/// バイト列から画像フォーマットと寸法を読む
///
/// マジックバイトで判別できない場合は宣言MIMEタイプを手がかりにする。
pub fn read_image_header(bytes: &[u8], declared_mime: &str) -> Result<ImageHeader> {
    let mut reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| ExtractAiError::ImageDecode(e.to_string()))?;

    if reader.format().is_none() {
        if let Some(format) = ImageFormat::from_mime_type(declared_mime) {
            reader.set_format(format);
        }
    }

    let format = reader
        .format()
        .ok_or_else(|| ExtractAiError::ImageDecode("unrecognized image format".into()))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| ExtractAiError::ImageDecode(e.to_string()))?;

    let format_tag = format
        .extensions_str()
        .first()
        .copied()
        .unwrap_or("bin")
        .to_string();

    Ok(ImageHeader {
        format_tag,
        width,
        height,
    })
}
