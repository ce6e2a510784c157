use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub library: LibraryConfig,
    #[serde(default)]
    pub cover: CoverConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

impl Config {
    /// Builds a configuration with defaults for everything but the root.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            library: LibraryConfig { root: root.into() },
            cover: CoverConfig::default(),
            audio: AudioConfig::default(),
            run: RunConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Library location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Directory walked recursively for tracks.
    pub root: PathBuf,
}

/// Cover art configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CoverConfig {
    /// Target square edge in pixels.
    #[serde(default = "default_cover_size")]
    pub size: u32,
    /// File name of the per-album resized cover.
    #[serde(default = "default_cache_file_name")]
    pub cache_file_name: String,
    /// How long to wait for a freshly written cover to show up on disk.
    #[serde(default = "default_settle_timeout")]
    pub settle_timeout_ms: u64,
    /// Poll interval while waiting.
    #[serde(default = "default_settle_poll")]
    pub settle_poll_ms: u64,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            size: default_cover_size(),
            cache_file_name: default_cache_file_name(),
            settle_timeout_ms: default_settle_timeout(),
            settle_poll_ms: default_settle_poll(),
        }
    }
}

fn default_cover_size() -> u32 {
    600
}

fn default_cache_file_name() -> String {
    "cover-resized.jpg".to_string()
}

fn default_settle_timeout() -> u64 {
    2000
}

fn default_settle_poll() -> u64 {
    100
}

/// Codec used when encoding to the portable container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortableCodec {
    /// Apple Lossless
    Alac,
    /// Advanced Audio Coding
    Aac,
}

impl PortableCodec {
    /// Returns the ffmpeg encoder name.
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            Self::Alac => "alac",
            Self::Aac => "aac",
        }
    }

    /// Maps a probed codec name to the family it should be re-encoded with.
    pub fn from_probed(codec_name: &str) -> Self {
        if codec_name.eq_ignore_ascii_case("aac") {
            Self::Aac
        } else {
            Self::Alac
        }
    }
}

/// Audio configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioConfig {
    /// Highest sample rate left untouched, in Hz.
    #[serde(default = "default_max_sample_rate")]
    pub max_sample_rate: u32,
    /// Codec for lossless sources.
    #[serde(default = "default_lossless_codec")]
    pub lossless_codec: PortableCodec,
    /// Bitrate used whenever AAC is encoded.
    #[serde(default = "default_aac_bitrate")]
    pub aac_bitrate_kbps: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            max_sample_rate: default_max_sample_rate(),
            lossless_codec: default_lossless_codec(),
            aac_bitrate_kbps: default_aac_bitrate(),
        }
    }
}

fn default_max_sample_rate() -> u32 {
    48000
}

fn default_lossless_codec() -> PortableCodec {
    PortableCodec::Alac
}

fn default_aac_bitrate() -> u32 {
    256
}

/// Run mode flags
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunConfig {
    /// Print planned commands instead of running them.
    #[serde(default)]
    pub dry_run: bool,
    /// Remove the lossless source once its output exists.
    #[serde(default = "default_true")]
    pub delete_source_on_success: bool,
    /// Tag outputs with an acoustic fingerprint when a fingerprinter is available.
    #[serde(default)]
    pub enable_fingerprinting: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            delete_source_on_success: true,
            enable_fingerprinting: false,
        }
    }
}

fn default_true() -> bool {
    true
}

/// External tool locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolsConfig {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: PathBuf,
    #[serde(default = "default_fpcalc_path")]
    pub fpcalc_path: PathBuf,
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            ffprobe_path: default_ffprobe_path(),
            fpcalc_path: default_fpcalc_path(),
            ffmpeg_log_level: default_log_level(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_ffprobe_path() -> PathBuf {
    PathBuf::from("ffprobe")
}

fn default_fpcalc_path() -> PathBuf {
    PathBuf::from("fpcalc")
}

fn default_log_level() -> String {
    "error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[library]
root = "/music"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.library.root, PathBuf::from("/music"));
        assert_eq!(config.cover.size, 600);
        assert_eq!(config.cover.cache_file_name, "cover-resized.jpg");
        assert_eq!(config.audio.max_sample_rate, 48000);
        assert_eq!(config.audio.lossless_codec, PortableCodec::Alac);
        assert!(!config.run.dry_run);
        assert!(config.run.delete_source_on_success);
        assert!(!config.run.enable_fingerprinting);
        assert_eq!(config.tools.ffmpeg_path, PathBuf::from("ffmpeg"));
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[library]
root = "/srv/music"

[cover]
size = 500
settle_timeout_ms = 50

[audio]
max_sample_rate = 44100
lossless_codec = "aac"
aac_bitrate_kbps = 320

[run]
dry_run = true
delete_source_on_success = false
enable_fingerprinting = true

[tools]
ffmpeg_path = "/opt/ffmpeg/bin/ffmpeg"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.cover.size, 500);
        assert_eq!(config.cover.settle_timeout_ms, 50);
        assert_eq!(config.cover.settle_poll_ms, 100);
        assert_eq!(config.audio.lossless_codec, PortableCodec::Aac);
        assert_eq!(config.audio.aac_bitrate_kbps, 320);
        assert!(config.run.dry_run);
        assert!(!config.run.delete_source_on_success);
        assert_eq!(
            config.tools.ffmpeg_path,
            PathBuf::from("/opt/ffmpeg/bin/ffmpeg")
        );
        assert_eq!(config.tools.ffprobe_path, PathBuf::from("ffprobe"));
    }

    #[test]
    fn test_deserialize_missing_library_fails() {
        let toml = r#"
[cover]
size = 600
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_codec_from_probed_name() {
        assert_eq!(PortableCodec::from_probed("aac"), PortableCodec::Aac);
        assert_eq!(PortableCodec::from_probed("AAC"), PortableCodec::Aac);
        assert_eq!(PortableCodec::from_probed("alac"), PortableCodec::Alac);
        assert_eq!(PortableCodec::from_probed("mp3"), PortableCodec::Alac);
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let config = Config::for_root("/music");
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.cover.size, config.cover.size);
        assert_eq!(parsed.library.root, config.library.root);
    }
}
