use image::imageops::FilterType;
use image::GenericImageView;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::DbPool;
use crate::models::settings::Setting;

/// Extensions the optimizer will recompress. Everything else (pdf, gif,
/// svg) is stored as uploaded.
const OPTIMIZABLE: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub struct OptimizeOptions {
    pub max_width: u32,
    pub quality: u8,
}

impl OptimizeOptions {
    pub fn from_settings(pool: &DbPool) -> Self {
        let max_width = Setting::get_i64(pool, "images_max_width");
        let quality = Setting::get_i64(pool, "images_quality");
        OptimizeOptions {
            max_width: if max_width > 0 { max_width as u32 } else { 2200 },
            quality: if (1..=100).contains(&quality) {
                quality as u8
            } else {
                82
            },
        }
    }
}

/// Check if file size is within the configured limit
pub fn check_file_size(pool: &DbPool, size_bytes: usize) -> bool {
    let max_mb = Setting::get_i64(pool, "images_max_upload_mb").max(1) as usize;
    size_bytes <= max_mb * 1024 * 1024
}

/// Check an extension against the configured allowlist
pub fn is_allowed_type(pool: &DbPool, ext: &str) -> bool {
    let allowed = Setting::get_or(pool, "images_allowed_types", "jpg,jpeg,png,gif,webp,pdf");
    allowed
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .any(|e| e == ext.to_lowercase())
}

/// Recompress an uploaded image in place: resize down to `max_width`
/// (never enlarging) and re-encode as WebP at the configured quality.
/// Returns the replacement path, or the original path when the file is
/// not an optimizable image. Failures are non-fatal for the caller: keep
/// serving the original file and log a warning.
pub fn optimize_upload(path: &Path, opts: &OptimizeOptions) -> PathBuf {
    match try_optimize(path, opts) {
        Ok(replacement) => replacement,
        Err(e) => {
            log::warn!("Image optimization skipped for {}: {}", path.display(), e);
            path.to_path_buf()
        }
    }
}

fn try_optimize(path: &Path, opts: &OptimizeOptions) -> Result<PathBuf, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    if !OPTIMIZABLE.contains(&ext.as_str()) {
        return Ok(path.to_path_buf());
    }

    let img = image::open(path).map_err(|e| e.to_string())?;
    let img = if opts.max_width > 0 && img.width() > opts.max_width {
        img.resize(opts.max_width, img.height(), FilterType::Lanczos3)
    } else {
        img
    };

    let (w, h) = img.dimensions();
    let rgba = img.to_rgba8();
    let encoder = webp::Encoder::from_rgba(&rgba, w, h);
    let webp_data = encoder.encode(opts.quality as f32);

    let out_path = path.with_extension("webp");
    fs::write(&out_path, &*webp_data).map_err(|e| e.to_string())?;

    if out_path != path {
        let _ = fs::remove_file(path);
    }

    Ok(out_path)
}
