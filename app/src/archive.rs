//! ZIP export: one folder per class, one PNG per record.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use code_render::RenderedItem;
use roster::safe_file_name;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::ExportError;

/// Folder used when a class key normalises to nothing.
pub const FALLBACK_FOLDER: &str = "unassigned";

/// `"{name} - {id}.png"` with both parts made file-system safe.
pub fn entry_file_name(item: &RenderedItem) -> String {
    format!(
        "{} - {}.png",
        safe_file_name(&item.record.name),
        safe_file_name(&item.record.id)
    )
}

/// Build the whole archive in memory, entries in input order.
pub fn build_archive(items: &[RenderedItem]) -> Result<Vec<u8>, ExportError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut folders = HashSet::new();
    let mut entries = HashSet::new();

    for item in items {
        let folder = if item.folder_key.is_empty() {
            FALLBACK_FOLDER
        } else {
            item.folder_key.as_str()
        };
        if folders.insert(folder.to_string()) {
            zip.add_directory(format!("{folder}/"), options)?;
        }

        let path = unique_entry_path(&mut entries, folder, &entry_file_name(item));
        debug!(path = %path, bytes = item.bitmap.png.len(), "Adding archive entry");
        zip.start_file(path, options)?;
        zip.write_all(&item.bitmap.png)?;
    }

    let bytes = zip.finish()?.into_inner();
    info!(
        entries = entries.len(),
        folders = folders.len(),
        bytes = bytes.len(),
        "Archive built"
    );
    Ok(bytes)
}

/// `folder/file`, or `folder/stem (n).ext` for the n-th repeat of a name.
fn unique_entry_path(used: &mut HashSet<String>, folder: &str, file_name: &str) -> String {
    let path = format!("{folder}/{file_name}");
    if used.insert(path.clone()) {
        return path;
    }

    let (stem, ext) = match file_name.rsplit_once('.') {
        Some((stem, ext)) => (stem, format!(".{ext}")),
        None => (file_name, String::new()),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{folder}/{stem} ({n}){ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
