//! Photo ingestion: keep the uploaded original, derive a small JPEG for the map.
//!
//! Both files are written through a temp file in the target directory and renamed
//! into place, so a reader never sees a partial photo. Everything here is blocking
//! file and codec work: async callers go through `spawn_blocking`.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

/// Side of the box the small version must cover (fit "outside").
pub const SMALL_SIZE: u32 = 400;
pub const SMALL_JPEG_QUALITY: u8 = 80;

const MAX_NAME_CHARS: usize = 100;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("unsupported or corrupt image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("cannot encode small photo: {0}")]
    Encode(#[source] image::ImageError),

    #[error("photo i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot move photo into place: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl PhotoError {
    /// The upload itself is at fault, not the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PhotoError::Decode(_))
    }
}

/// File names of a stored photo pair, relative to their directories.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredPhoto {
    pub file_name_original: String,
    pub file_name_small: String,
}

/// The two photo directories: uploaded originals and derived small versions.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    original_dir: PathBuf,
    small_dir: PathBuf,
}

impl PhotoStore {
    pub fn new(original_dir: PathBuf, small_dir: PathBuf) -> Self {
        PhotoStore {
            original_dir,
            small_dir,
        }
    }

    pub fn original_dir(&self) -> &Path {
        &self.original_dir
    }

    pub fn small_dir(&self) -> &Path {
        &self.small_dir
    }

    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.original_dir)?;
        std::fs::create_dir_all(&self.small_dir)
    }

    /// Stores `data` under a unique name and writes its small version next to it.
    /// Undecodable data is rejected before anything touches the disk.
    pub fn store(&self, original_name: &str, data: &[u8]) -> Result<StoredPhoto, PhotoError> {
        let small = make_small_version(data)?;

        let prefix = format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple());
        let name = sanitize_file_name(original_name);
        let stem = Path::new(&name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("photo");

        let stored = StoredPhoto {
            file_name_original: format!("{prefix}-{name}"),
            file_name_small: format!("{prefix}-small-{stem}.jpg"),
        };
        write_atomically(&self.original_dir, &stored.file_name_original, data)?;
        if let Err(e) = write_atomically(&self.small_dir, &stored.file_name_small, &small) {
            self.remove(&stored);
            return Err(e);
        }
        Ok(stored)
    }

    /// Deletes both files of `stored`. Best effort: failures are logged, missing files
    /// are ignored.
    pub fn remove(&self, stored: &StoredPhoto) {
        let paths = [
            self.original_dir.join(&stored.file_name_original),
            self.small_dir.join(&stored.file_name_small),
        ];
        for path in paths {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Cannot remove orphaned photo"),
            }
        }
    }
}

fn write_atomically(dir: &Path, name: &str, bytes: &[u8]) -> Result<(), PhotoError> {
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.persist(dir.join(name))?;
    Ok(())
}

/// Decodes, applies the EXIF orientation, covers a `SMALL_SIZE` square and
/// re-encodes as JPEG.
pub fn make_small_version(data: &[u8]) -> Result<Vec<u8>, PhotoError> {
    let mut decoder = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_decoder()
        .map_err(PhotoError::Decode)?;
    let orientation = decoder.orientation().map_err(PhotoError::Decode)?;
    let mut photo = DynamicImage::from_decoder(decoder).map_err(PhotoError::Decode)?;
    photo.apply_orientation(orientation);

    let (width, height) = fit_outside(photo.width(), photo.height(), SMALL_SIZE);
    let small = photo
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_rgb8();

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, SMALL_JPEG_QUALITY)
        .encode_image(&small)
        .map_err(PhotoError::Encode)?;
    Ok(out)
}

/// Smallest size with the same aspect ratio that covers a `target`×`target` box.
pub fn fit_outside(width: u32, height: u32, target: u32) -> (u32, u32) {
    let scale = (target as f64 / width.max(1) as f64).max(target as f64 / height.max(1) as f64);
    (
        ((width as f64 * scale).round() as u32).max(1),
        ((height as f64 * scale).round() as u32).max(1),
    )
}

/// Keeps the last path component and replaces anything outside `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let source = RgbImage::from_pixel(width, height, Rgb([29, 79, 145]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(source)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_fit_outside_covers_box() {
        assert_eq!(fit_outside(800, 600, 400), (533, 400));
        assert_eq!(fit_outside(300, 900, 400), (400, 1200));
        assert_eq!(fit_outside(400, 400, 400), (400, 400));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("IMG 0042.JPG"), "IMG_0042.JPG");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\été.png"), "_t_.png");
        assert_eq!(sanitize_file_name(""), "photo");
        assert_eq!(sanitize_file_name(".."), "photo");
    }

    #[test]
    fn test_small_version_is_jpeg_covering_box() {
        let small = make_small_version(&png_bytes(800, 600)).unwrap();
        let decoded = image::load_from_memory(&small).unwrap();
        assert_eq!(image::guess_format(&small).unwrap(), ImageFormat::Jpeg);
        assert_eq!((decoded.width(), decoded.height()), (533, 400));
    }

    #[test]
    fn test_garbage_is_a_client_error() {
        let err = make_small_version(b"definitely not an image").unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_store_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path().join("original"), dir.path().join("small"));
        store.ensure_dirs().unwrap();

        let stored = store.store("vacances/panneau.png", &png_bytes(100, 50)).unwrap();
        assert!(stored.file_name_original.ends_with("-panneau.png"));
        assert!(stored.file_name_small.ends_with("-small-panneau.jpg"));
        assert!(store.original_dir().join(&stored.file_name_original).is_file());
        assert!(store.small_dir().join(&stored.file_name_small).is_file());
    }

    #[test]
    fn test_store_removes_original_when_small_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        // The small directory is never created, so the second write fails.
        let store = PhotoStore::new(dir.path().join("original"), dir.path().join("small"));
        std::fs::create_dir_all(store.original_dir()).unwrap();

        let err = store.store("panneau.png", &png_bytes(100, 50)).unwrap_err();
        assert!(matches!(err, PhotoError::Io(_)));
        assert!(!err.is_client_error());
        assert_eq!(std::fs::read_dir(store.original_dir()).unwrap().count(), 0);
    }

    #[test]
    fn test_remove_deletes_both_files_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path().join("original"), dir.path().join("small"));
        store.ensure_dirs().unwrap();

        let stored = store.store("panneau.png", &png_bytes(100, 50)).unwrap();
        store.remove(&stored);
        assert_eq!(std::fs::read_dir(store.original_dir()).unwrap().count(), 0);
        assert_eq!(std::fs::read_dir(store.small_dir()).unwrap().count(), 0);
        // Already gone: nothing to do.
        store.remove(&stored);
    }

    #[test]
    fn test_store_rejects_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path().join("original"), dir.path().join("small"));
        store.ensure_dirs().unwrap();

        assert!(store.store("x.png", b"nope").is_err());
        assert_eq!(std::fs::read_dir(store.original_dir()).unwrap().count(), 0);
        assert_eq!(std::fs::read_dir(store.small_dir()).unwrap().count(), 0);
    }
}
