//! Media lookup for the watch surface.

use std::path::{Path, PathBuf};

const MEDIA_EXTENSIONS: [&str; 4] = ["mp4", "webm", "mkv", "mov"];

/// Find the media file backing a video id inside the media directory.
pub fn find_media_file(media_dir: &Path, video_id: &str) -> Option<PathBuf> {
    MEDIA_EXTENSIONS
        .iter()
        .map(|ext| media_dir.join(format!("{video_id}.{ext}")))
        .find(|candidate| candidate.exists())
}

/// URL for a local media file, routed through the app's media protocol
/// handler. The whole path is percent-encoded; the handler decodes it.
pub fn media_url(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    format!(
        "http://watchnotes.localhost/{}",
        urlencoding::encode(&normalized)
    )
}

/// Display title for a video: the media file stem when one exists, otherwise
/// a generic label around the id.
pub fn display_title(media_file: Option<&Path>, video_id: &str) -> String {
    media_file
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().replace(['_', '-'], " "))
        .unwrap_or_else(|| format!("Video {video_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_media_file_by_extension_preference() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("abc.webm"), b"").unwrap();
        fs::write(dir.path().join("abc.mp4"), b"").unwrap();

        let found = find_media_file(dir.path(), "abc").unwrap();
        assert_eq!(found, dir.path().join("abc.mp4"));
        assert!(find_media_file(dir.path(), "missing").is_none());
    }

    #[test]
    fn test_media_url_is_fully_encoded() {
        let url = media_url(Path::new("media/my talk.mp4"));
        assert_eq!(url, "http://watchnotes.localhost/media%2Fmy%20talk.mp4");
    }

    #[test]
    fn test_display_title() {
        assert_eq!(
            display_title(Some(Path::new("media/rust_lifetimes-talk.mp4")), "abc"),
            "rust lifetimes talk"
        );
        assert_eq!(display_title(None, "abc"), "Video abc");
    }
}
