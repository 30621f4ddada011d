use std::fs::{self, File};
use std::io::{self, Read, Seek, Write};
use std::path::{Component, Path, PathBuf};

use serde_json::Value;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::backup;
use crate::db::DbPool;

pub const BACKUP_ENTRY: &str = "backup.json";
pub const UPLOADS_PREFIX: &str = "uploads/";

#[derive(Debug)]
pub struct PackageReport {
    /// Outcome of applying backup.json; the uploads restore runs either way.
    pub apply_result: Result<(), String>,
    pub restored_files: usize,
    pub skipped_entries: usize,
}

// ── Export ─────────────────────────────────────────────

fn collect_files(dir: &Path, prefix: &str, out: &mut Vec<(PathBuf, String)>) {
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let rel = format!("{}/{}", prefix, entry.file_name().to_string_lossy());
            if path.is_dir() {
                collect_files(&path, &rel, out);
            } else {
                out.push((path, rel));
            }
        }
    }
}

/// Write the full backup package: `backup.json` first, then every file
/// under the uploads root mirrored below an `uploads/` prefix. File
/// contents are streamed into the archive, never buffered whole.
pub fn write_backup_package<W: Write + Seek>(
    pool: &DbPool,
    uploads_root: &Path,
    writer: W,
) -> Result<(), String> {
    let payload = backup::build_backup_payload(pool)?;
    let json = serde_json::to_string_pretty(&payload).map_err(|e| e.to_string())?;

    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default();

    zip.start_file(BACKUP_ENTRY, options)
        .map_err(|e| e.to_string())?;
    zip.write_all(json.as_bytes()).map_err(|e| e.to_string())?;

    let mut files = Vec::new();
    if uploads_root.exists() {
        collect_files(uploads_root, "uploads", &mut files);
    }

    for (path, rel) in files {
        zip.start_file(rel.as_str(), options).map_err(|e| e.to_string())?;
        let mut src = File::open(&path).map_err(|e| e.to_string())?;
        io::copy(&mut src, &mut zip).map_err(|e| e.to_string())?;
    }

    zip.finish().map_err(|e| e.to_string())?;
    Ok(())
}

// ── Import ─────────────────────────────────────────────

/// Destination for an archive entry below the uploads root, or None when
/// the entry would escape it (absolute paths, `..` components, NULs).
fn safe_destination(uploads_root: &Path, relative: &str) -> Option<PathBuf> {
    if relative.contains('\0') {
        return None;
    }
    let rel = Path::new(relative);
    for component in rel.components() {
        match component {
            Component::Normal(_) => {}
            _ => return None,
        }
    }
    let dest = uploads_root.join(rel);
    // If the parent already exists on disk, double-check the canonical path
    if let (Ok(canon_base), Some(parent)) = (uploads_root.canonicalize(), dest.parent()) {
        if let Ok(canon_parent) = parent.canonicalize() {
            if !canon_parent.starts_with(&canon_base) {
                return None;
            }
        }
    }
    Some(dest)
}

fn find_backup_entry<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<usize> {
    for i in 0..archive.len() {
        if let Some(name) = archive.name_for_index(i) {
            let matches = Path::new(name)
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.eq_ignore_ascii_case(BACKUP_ENTRY))
                .unwrap_or(false);
            if matches {
                return Some(i);
            }
        }
    }
    None
}

/// Restore a backup package: apply `backup.json`, then rebuild the uploads
/// tree from the archive. The uploads restore runs even when applying the
/// JSON fails; entries that resolve outside the uploads root are skipped.
pub fn extract_backup_package(
    pool: &DbPool,
    zip_path: &Path,
    uploads_root: &Path,
) -> Result<PackageReport, String> {
    let file = File::open(zip_path).map_err(|e| e.to_string())?;
    let mut archive = ZipArchive::new(file).map_err(|e| format!("Invalid ZIP archive: {}", e))?;

    let backup_index =
        find_backup_entry(&mut archive).ok_or_else(|| "No backup.json found in archive".to_string())?;

    let apply_result = {
        let mut entry = archive.by_index(backup_index).map_err(|e| e.to_string())?;
        let mut raw = String::new();
        entry
            .read_to_string(&mut raw)
            .map_err(|e| e.to_string())?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(doc) => backup::apply_backup_data(pool, &doc),
            Err(e) => Err(format!("Invalid JSON in backup.json: {}", e)),
        }
    };

    // Rebuild the uploads tree from scratch
    if uploads_root.exists() {
        fs::remove_dir_all(uploads_root).map_err(|e| e.to_string())?;
    }
    fs::create_dir_all(uploads_root).map_err(|e| e.to_string())?;

    let mut restored_files = 0usize;
    let mut skipped_entries = 0usize;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| e.to_string())?;
        let name = entry.name().to_string();

        if !name.starts_with(UPLOADS_PREFIX) || entry.is_dir() {
            continue;
        }
        let relative = &name[UPLOADS_PREFIX.len()..];
        if relative.is_empty() {
            continue;
        }

        let dest = match safe_destination(uploads_root, relative) {
            Some(d) => d,
            None => {
                log::warn!("Skipping unsafe archive entry: {}", name);
                skipped_entries += 1;
                continue;
            }
        };

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        let mut out = File::create(&dest).map_err(|e| e.to_string())?;
        io::copy(&mut entry, &mut out).map_err(|e| e.to_string())?;
        restored_files += 1;
    }

    Ok(PackageReport {
        apply_result,
        restored_files,
        skipped_entries,
    })
}
