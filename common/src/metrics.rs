//! サイズ・解像度の派生値

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// 小数点以下2桁に丸める
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `width*height/1,000,000` を2桁に丸めたメガピクセル
pub fn megapixels(width: u32, height: u32) -> f64 {
    round2(f64::from(width) * f64::from(height) / 1_000_000.0)
}

/// `"{width}:{height}"`（約分しない）
pub fn aspect_ratio(width: u32, height: u32) -> String {
    format!("{}:{}", width, height)
}

/// バイト数をMB（2桁丸め）に変換
pub fn size_mb(size_bytes: u64) -> f64 {
    round2(size_bytes as f64 / BYTES_PER_MB)
}
