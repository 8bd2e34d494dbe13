//! Snapshot command handlers
//!
//! Uploading local images and listing staged snapshots.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::*;
use sentinel_core::domain::session::Checkpoint;

use crate::api::{ApiClient, ImageFile};

/// Mime type for a supported image extension
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// Expand directories into their image files
///
/// Files named explicitly are kept as given. Directory contents are filtered
/// to supported images and sorted by path; subdirectories are not descended.
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut images = std::fs::read_dir(path)
                .with_context(|| format!("Failed to read directory {}", path.display()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && image_mime_type(p).is_some())
                .collect::<Vec<_>>();
            images.sort();
            files.extend(images);
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

/// Read image files into memory
pub async fn read_images(paths: &[PathBuf]) -> Result<Vec<ImageFile>> {
    let mut images = Vec::with_capacity(paths.len());

    for path in paths {
        let mime_type = image_mime_type(path).with_context(|| {
            format!(
                "{} is not a supported image (.jpg, .jpeg, .png)",
                path.display()
            )
        })?;
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        images.push(ImageFile {
            file_name,
            mime_type,
            bytes,
        });
    }

    Ok(images)
}

/// Upload local images to a checkpoint
pub async fn upload(client: &ApiClient, checkpoint: Checkpoint, paths: &[PathBuf]) -> Result<()> {
    let files = expand_paths(paths)?;
    if files.is_empty() {
        println!("{}", "No images found to upload.".yellow());
        return Ok(());
    }

    let images = read_images(&files).await?;
    let summary = client.upload_snapshots(checkpoint, images).await?;

    println!(
        "{} Uploaded {} {} snapshot(s), {} staged in total",
        "✓".green(),
        summary.staged,
        checkpoint,
        summary.total
    );

    Ok(())
}

/// List staged snapshots
pub async fn list(client: &ApiClient, checkpoint: Checkpoint) -> Result<()> {
    let snapshots = client.list_snapshots(checkpoint).await?;

    if snapshots.is_empty() {
        println!(
            "{}",
            format!("No {} snapshots staged.", checkpoint).yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("{} {} snapshot(s):", snapshots.len(), checkpoint).bold()
    );
    println!();
    for snapshot in snapshots {
        println!("  {} {}", "▸".cyan(), snapshot.id.dimmed());
        println!(
            "    Captured: {}",
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S")
        );
        if let Some(name) = &snapshot.file_name {
            println!("    File:     {}", name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "sentinel-cli-{}-{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_image_mime_type_by_extension() {
        assert_eq!(image_mime_type(Path::new("a/cam1.JPG")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("cam.jpeg")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("cam.png")), Some("image/png"));
        assert_eq!(image_mime_type(Path::new("notes.txt")), None);
        assert_eq!(image_mime_type(Path::new("README")), None);
    }

    #[test]
    fn test_expand_directory_sorted_and_filtered() {
        let dir = scratch_dir("expand");
        for name in ["b.png", "a.jpg", "notes.txt", "c.JPEG"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.join("nested.png")).unwrap();

        let files = expand_paths(std::slice::from_ref(&dir)).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.jpg", "b.png", "c.JPEG"]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_explicit_files_are_kept_in_order() {
        let files = expand_paths(&[PathBuf::from("z.png"), PathBuf::from("a.png")]).unwrap();
        assert_eq!(files, vec![PathBuf::from("z.png"), PathBuf::from("a.png")]);
    }

    #[tokio::test]
    async fn test_read_images_rejects_unsupported_extension() {
        let err = read_images(&[PathBuf::from("capture.gif")]).await.unwrap_err();
        assert!(err.to_string().contains("not a supported image"));
    }
}
