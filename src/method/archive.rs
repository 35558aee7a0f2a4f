//! ZIP packaging of the artifact directory

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::IntensityError;

/// Zip the contents of `dir` into `<dir>.zip` next to it.
///
/// Entry names are relative to `dir` and use `/` separators.
pub fn archive(dir: &Path) -> Result<PathBuf, IntensityError> {
    let mut zip_path = dir.as_os_str().to_owned();
    zip_path.push(".zip");
    let zip_path = PathBuf::from(zip_path);

    let mut files = Vec::new();
    collect_files(dir, &mut files)?;
    files.sort();

    let mut writer = ZipWriter::new(File::create(&zip_path)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in &files {
        let relative = path
            .strip_prefix(dir)
            .map_err(|e| IntensityError::Internal(format!("{}: {}", path.display(), e)))?;
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        writer.start_file(name, options)?;
        writer.write_all(&fs::read(path)?)?;
    }
    writer.finish()?;

    info!(path = %zip_path.display(), entries = files.len(), "Method archive written");
    Ok(zip_path)
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), IntensityError> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}
