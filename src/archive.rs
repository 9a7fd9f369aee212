//! Zip archive plumbing: full-tree extraction and repacking.
//!
//! Packs travel as plain zip archives. Reads extract the whole archive
//! into a scratch directory; writes deflate the whole working tree with
//! pack-root-relative, forward-slash entry names.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{MewError, Result};
use crate::UPDATED_SUFFIX;

/// Extract a pack archive into `dest`.
pub fn extract_zip(zip_path: &Path, dest: &Path) -> Result<()> {
    let file = File::open(zip_path).map_err(|e| MewError::Archive {
        path: zip_path.to_path_buf(),
        message: format!("Failed to open archive: {}", e),
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| MewError::Archive {
        path: zip_path.to_path_buf(),
        message: format!("Failed to read archive: {}", e),
    })?;
    archive.extract(dest).map_err(|e| MewError::Archive {
        path: zip_path.to_path_buf(),
        message: format!("Failed to extract archive: {}", e),
    })
}

/// Archive a working tree into a deflate-compressed zip.
///
/// Entry names are relative to `src_dir` and forward-slash separated on
/// every platform.
pub fn zip_dir(src_dir: &Path, out_zip: &Path) -> Result<()> {
    let file = File::create(out_zip).map_err(|e| MewError::Archive {
        path: out_zip.to_path_buf(),
        message: format!("Failed to create archive: {}", e),
    })?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(src_dir).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(src_dir)
            .map_err(|_| MewError::Archive {
                path: entry.path().to_path_buf(),
                message: "File outside archive root".to_string(),
            })?;
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        writer
            .start_file(name, options)
            .map_err(|e| MewError::Archive {
                path: out_zip.to_path_buf(),
                message: format!("Failed to start entry: {}", e),
            })?;
        let mut input = File::open(entry.path()).map_err(|e| MewError::Io {
            path: entry.path().to_path_buf(),
            message: format!("Failed to read file for archiving: {}", e),
        })?;
        io::copy(&mut input, &mut writer).map_err(|e| MewError::Archive {
            path: out_zip.to_path_buf(),
            message: format!("Failed to write entry: {}", e),
        })?;
    }

    let mut inner = writer.finish().map_err(|e| MewError::Archive {
        path: out_zip.to_path_buf(),
        message: format!("Failed to finish archive: {}", e),
    })?;
    inner.flush().map_err(|e| MewError::Archive {
        path: out_zip.to_path_buf(),
        message: format!("Failed to flush archive: {}", e),
    })
}

/// Choose the output archive path for an input pack.
///
/// The archive lands beside the input as `<stem>-mewupdated.zip`, with a
/// numeric suffix appended before the extension while the name is taken.
pub fn output_name(input: &Path) -> PathBuf {
    let parent = input.parent().unwrap_or_else(|| Path::new("."));
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pack");
    let base = format!("{}{}", stem, UPDATED_SUFFIX);

    let mut candidate = parent.join(format!("{}.zip", base));
    let mut counter = 1;
    while candidate.exists() {
        candidate = parent.join(format!("{}_{}.zip", base, counter));
        counter += 1;
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path, contents: &[u8]) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_zip_roundtrip_preserves_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pack");
        touch(&src.join("pack.mcmeta"), b"{}");
        touch(
            &src.join("assets/minecraft/textures/block/stone.png"),
            b"png-bytes",
        );

        let archive = dir.path().join("pack.zip");
        zip_dir(&src, &archive).unwrap();

        let out = dir.path().join("extracted");
        extract_zip(&archive, &out).unwrap();

        assert_eq!(std::fs::read(out.join("pack.mcmeta")).unwrap(), b"{}");
        assert_eq!(
            std::fs::read(out.join("assets/minecraft/textures/block/stone.png")).unwrap(),
            b"png-bytes"
        );
    }

    #[test]
    fn test_zip_entry_names_use_forward_slashes() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pack");
        touch(&src.join("assets/minecraft/a.txt"), b"x");

        let archive = dir.path().join("pack.zip");
        zip_dir(&src, &archive).unwrap();

        let file = File::open(&archive).unwrap();
        let mut zip = ZipArchive::new(file).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["assets/minecraft/a.txt".to_string()]);
    }

    #[test]
    fn test_extract_missing_archive_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = extract_zip(&dir.path().join("absent.zip"), dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_output_name_beside_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("my-pack.zip");
        assert_eq!(
            output_name(&input),
            dir.path().join("my-pack-mewupdated.zip")
        );
    }

    #[test]
    fn test_output_name_disambiguates() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("my-pack.zip");
        std::fs::write(dir.path().join("my-pack-mewupdated.zip"), b"taken").unwrap();
        assert_eq!(
            output_name(&input),
            dir.path().join("my-pack-mewupdated_1.zip")
        );

        std::fs::write(dir.path().join("my-pack-mewupdated_1.zip"), b"taken").unwrap();
        assert_eq!(
            output_name(&input),
            dir.path().join("my-pack-mewupdated_2.zip")
        );
    }

    #[test]
    fn test_output_name_for_folder_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("my-pack");
        std::fs::create_dir_all(&input).unwrap();
        assert_eq!(
            output_name(&input),
            dir.path().join("my-pack-mewupdated.zip")
        );
    }
}
