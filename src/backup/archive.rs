// backuptool/src/backup/archive.rs
use anyhow::{Context, Result};
use chrono::Local;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const ARCHIVE_EXTENSION: &str = "zip";

/// Archive file name for one backed-up entity, stamped with the local date
/// at the moment this step runs: `{database}_{DD_MM_YYYY}.zip`, or
/// `{database}_{DD_MM_YYYY}_filestore.zip` for the file-store companion.
pub fn archive_file_name(database: &str, filestore: bool) -> String {
    let date = Local::now().format("%d_%m_%Y");
    if filestore {
        format!("{}_{}_filestore.{}", database, date, ARCHIVE_EXTENSION)
    } else {
        format!("{}_{}.{}", database, date, ARCHIVE_EXTENSION)
    }
}

/// Creates a zip archive from the recursive contents of a source directory.
///
/// Entry paths inside the archive are relative to `source_dir`. An existing
/// file at `archive_dest_path` is overwritten. The source directory is never
/// modified.
///
/// # Returns
/// Path to the created archive file.
pub fn create_zip_archive(source_dir: &Path, archive_dest_path: &Path) -> Result<PathBuf> {
    if !source_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Source for archival is not a directory: {}",
            source_dir.display()
        ));
    }
    if let Some(parent) = archive_dest_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!(
                    "Failed to create parent directory for archive: {}",
                    parent.display()
                )
            })?;
        }
    }

    println!(
        "Creating zip archive from {} to {}",
        source_dir.display(),
        archive_dest_path.display()
    );

    let archive_file = File::create(archive_dest_path).with_context(|| {
        format!(
            "Failed to create archive file: {}",
            archive_dest_path.display()
        )
    })?;
    let mut zip = ZipWriter::new(archive_file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source_dir) {
        let entry = entry
            .with_context(|| format!("Failed to walk directory: {}", source_dir.display()))?;
        let path = entry.path();
        let name = path.strip_prefix(source_dir).with_context(|| {
            format!(
                "Failed to strip prefix {} from {}",
                source_dir.display(),
                path.display()
            )
        })?;

        if name.as_os_str().is_empty() {
            // Skip the root directory itself
            continue;
        }
        let name_in_archive = name.to_string_lossy().replace('\\', "/");

        if path.is_dir() {
            zip.add_directory(name_in_archive, options).with_context(|| {
                format!("Failed to append directory {} to archive", path.display())
            })?;
        } else if path.is_file() {
            zip.start_file(name_in_archive, options).with_context(|| {
                format!("Failed to append file {} to archive", path.display())
            })?;
            let mut source = File::open(path)
                .with_context(|| format!("Failed to open file for archival: {}", path.display()))?;
            io::copy(&mut source, &mut zip)
                .with_context(|| format!("Failed to compress file: {}", path.display()))?;
        }
    }

    let mut inner = zip.finish().with_context(|| {
        format!(
            "Failed to finish zip archive: {}",
            archive_dest_path.display()
        )
    })?;
    inner
        .flush()
        .with_context(|| format!("Failed to flush archive: {}", archive_dest_path.display()))?;

    println!(
        "✓ Zip archive created successfully at {}",
        archive_dest_path.display()
    );
    Ok(archive_dest_path.to_path_buf())
}
