//! Sound sources for the completion alert.
//!
//! A source is either a user-supplied audio file or the built-in chime,
//! synthesized at play time so the binary carries no audio assets.

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::source::SineWave;
use rodio::{Decoder, Source};

use super::error::SoundError;

/// A decoded, ready-to-play source.
pub type BoxedSource = Box<dyn Source<Item = f32> + Send>;

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SoundSource {
    /// An audio file on disk (any format rodio can decode).
    File {
        /// Path to the file.
        path: PathBuf,
    },
    /// The built-in two-tone chime.
    #[default]
    Chime,
}

impl SoundSource {
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns a short display name.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::File { path } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            Self::Chime => "chime".to_string(),
        }
    }
}

/// Reads and decodes an audio file.
///
/// # Errors
///
/// Returns `FileNotFound` if the file cannot be read and `DecodeError` if
/// rodio does not recognise its format.
pub fn load_file(path: &Path) -> Result<BoxedSource, SoundError> {
    let bytes = std::fs::read(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    decode(bytes)
}

/// Decodes in-memory audio data.
pub fn decode(bytes: Vec<u8>) -> Result<BoxedSource, SoundError> {
    let decoder =
        Decoder::new(Cursor::new(bytes)).map_err(|e| SoundError::DecodeError(e.to_string()))?;
    Ok(Box::new(decoder.convert_samples::<f32>()))
}

/// Builds the built-in chime: a short high note followed by a higher one.
#[must_use]
pub fn chime() -> Vec<BoxedSource> {
    vec![tone(880.0, 180), tone(1320.0, 320)]
}

fn tone(frequency: f32, millis: u64) -> BoxedSource {
    Box::new(
        SineWave::new(frequency)
            .take_duration(Duration::from_millis(millis))
            .amplify(0.25),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_is_chime() {
        assert_eq!(SoundSource::default(), SoundSource::Chime);
        assert_eq!(SoundSource::Chime.name(), "chime");
        assert!(!SoundSource::Chime.is_file());
    }

    #[test]
    fn test_file_source_name() {
        let source = SoundSource::file("/sounds/timer.mp3");
        assert!(source.is_file());
        assert_eq!(source.name(), "timer.mp3");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_file(Path::new("/nonexistent/pomodorik/alert.wav")).err().unwrap();
        assert!(matches!(err, SoundError::FileNotFound(_)));
        assert!(err.should_fallback_to_chime());
    }

    #[test]
    fn test_load_garbage_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not audio").unwrap();

        let err = load_file(file.path()).err().unwrap();
        assert!(matches!(err, SoundError::DecodeError(_)));
    }

    #[test]
    fn test_chime_is_finite() {
        let sources = chime();
        assert_eq!(sources.len(), 2);
        for source in sources {
            assert!(source.total_duration().is_some());
        }
    }
}
