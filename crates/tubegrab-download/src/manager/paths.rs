//! Output path planning for jobs.
//!
//! Final and temporary paths are derived deterministically from the
//! sanitized item title, so two items with the same title map to the same
//! files.

use std::path::{Path, PathBuf};

use tubegrab_core::download::{DownloadError, Format};
use tubegrab_core::utils::sanitize_file_name;

/// Extension of the intermediate file an MP3 job downloads into.
const TEMP_EXTENSION: &str = "mp4";

/// Planned files for one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    /// Where the finished file lands.
    pub final_path: PathBuf,
    /// Intermediate download for jobs that transcode.
    pub temp_path: Option<PathBuf>,
}

impl JobPaths {
    /// Plan paths for an item titled `title` in `output_dir`.
    pub fn plan(output_dir: &Path, title: &str, format: Format) -> Self {
        let base = sanitize_file_name(title);
        let final_path = output_dir.join(format!("{base}.{}", format.extension()));
        let temp_path = format
            .needs_transcode()
            .then(|| output_dir.join(format!("{base}.{TEMP_EXTENSION}")));

        Self {
            final_path,
            temp_path,
        }
    }

    /// Where the fetched stream is written.
    pub fn download_target(&self) -> &Path {
        self.temp_path.as_deref().unwrap_or(&self.final_path)
    }

    /// Planned files that are already on disk and will be overwritten.
    pub fn existing(&self) -> Vec<&Path> {
        std::iter::once(self.final_path.as_path())
            .chain(self.temp_path.as_deref())
            .filter(|p| p.exists())
            .collect()
    }

    /// Ensure the output directory exists.
    pub fn ensure_dir(&self) -> Result<(), DownloadError> {
        if let Some(dir) = self.final_path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            std::fs::create_dir_all(dir)
                .map_err(|e| DownloadError::io("create_dir", e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mp4_downloads_straight_to_final_path() {
        let paths = JobPaths::plan(Path::new("/music"), "My Song", Format::Mp4);
        assert_eq!(paths.final_path, PathBuf::from("/music/My Song.mp4"));
        assert!(paths.temp_path.is_none());
        assert_eq!(paths.download_target(), Path::new("/music/My Song.mp4"));
    }

    #[test]
    fn mp3_uses_intermediate_file() {
        let paths = JobPaths::plan(Path::new("/music"), "My Song", Format::Mp3);
        assert_eq!(paths.final_path, PathBuf::from("/music/My Song.mp3"));
        assert_eq!(paths.temp_path, Some(PathBuf::from("/music/My Song.mp4")));
        assert_eq!(paths.download_target(), Path::new("/music/My Song.mp4"));
    }

    #[test]
    fn titles_are_sanitized() {
        let paths = JobPaths::plan(Path::new("/out"), "AC/DC: Live?", Format::Mp3);
        assert_eq!(paths.final_path, PathBuf::from("/out/ACDC Live.mp3"));
    }

    #[test]
    fn ensure_dir_creates_missing_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("new").join("dir");
        let paths = JobPaths::plan(&dir, "x", Format::Mp4);
        paths.ensure_dir().unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn existing_reports_leftover_intermediate_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = JobPaths::plan(tmp.path(), "Song", Format::Mp3);
        assert!(paths.existing().is_empty());

        std::fs::write(tmp.path().join("Song.mp4"), b"stale").unwrap();
        assert_eq!(paths.existing(), vec![tmp.path().join("Song.mp4").as_path()]);

        std::fs::write(tmp.path().join("Song.mp3"), b"old").unwrap();
        assert_eq!(paths.existing().len(), 2);
    }
}
