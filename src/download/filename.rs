//! Output file naming for fetched media.
//!
//! Names follow `<kind>_<unix-millis>_<sequence>.<ext>`. The process-wide
//! sequence plus `create_new` keeps concurrent resolutions from ever writing
//! into the same file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::fs::{File, OpenOptions};

use super::error::FetchError;
use crate::media::MediaKind;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Attempts before giving up on finding an unused name.
const MAX_NAME_ATTEMPTS: usize = 16;

/// Guess a media extension (without dot) from a Content-Type header value.
pub(crate) fn extension_from_content_type(content_type: &str) -> Option<&'static str> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "video/mp4" => Some("mp4"),
        "video/webm" => Some("webm"),
        "video/quicktime" => Some("mov"),
        "video/x-m4v" => Some("m4v"),
        "video/x-matroska" => Some("mkv"),
        _ => None,
    }
}

/// Chooses the file extension: URL path first, then Content-Type, then the kind's default.
pub(crate) fn choose_extension(
    kind: MediaKind,
    url: &str,
    content_type: Option<&str>,
) -> &'static str {
    kind.extension_of(url)
        .or_else(|| content_type.and_then(extension_from_content_type))
        .unwrap_or_else(|| kind.default_extension())
}

/// Builds a candidate file name for `kind` with the given extension.
pub(crate) fn unique_filename(kind: MediaKind, extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}_{millis}_{sequence}.{extension}", kind.as_str())
}

/// Creates `dir` if needed and opens a brand-new output file inside it.
pub(crate) async fn create_output_file(
    dir: &Path,
    kind: MediaKind,
    extension: &str,
) -> Result<(File, PathBuf), FetchError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| FetchError::io(dir, e))?;

    let mut last_path = dir.to_path_buf();
    for _ in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(unique_filename(kind, extension));
        match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => return Ok((file, path)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => last_path = path,
            Err(e) => return Err(FetchError::io(path, e)),
        }
    }

    Err(FetchError::io(
        last_path,
        std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            "no unused output file name available",
        ),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_extension_from_content_type() {
        assert_eq!(extension_from_content_type("image/jpeg"), Some("jpg"));
        assert_eq!(extension_from_content_type("Video/MP4; codecs=avc1"), Some("mp4"));
        assert_eq!(extension_from_content_type("text/html"), None);
    }

    #[test]
    fn test_choose_extension_precedence() {
        assert_eq!(
            choose_extension(MediaKind::Image, "https://i.pinimg.com/a.png", Some("image/jpeg")),
            "png"
        );
        assert_eq!(
            choose_extension(MediaKind::Image, "https://i.pinimg.com/a", Some("image/webp")),
            "webp"
        );
        assert_eq!(
            choose_extension(MediaKind::Video, "https://v.pinimg.com/a", None),
            "mp4"
        );
    }

    #[test]
    fn test_unique_filename_has_kind_prefix_and_differs() {
        let first = unique_filename(MediaKind::Video, "mp4");
        let second = unique_filename(MediaKind::Video, "mp4");
        assert!(first.starts_with("video_"));
        assert!(first.ends_with(".mp4"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_create_output_file_creates_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested").join("out");

        let (_file, path) = create_output_file(&dir, MediaKind::Image, "jpg")
            .await
            .unwrap();
        assert!(path.exists());
        assert!(path.starts_with(&dir));
        assert!(
            path.file_name()
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("image_")
        );
    }

    #[test]
    fn test_create_output_file_fails_when_dir_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("occupied");
        std::fs::write(&blocker, b"x").unwrap();

        let result =
            tokio_test::block_on(create_output_file(&blocker, MediaKind::Video, "mp4"));
        assert!(matches!(result, Err(FetchError::Io { .. })));
    }
}
