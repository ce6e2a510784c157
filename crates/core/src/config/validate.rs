use std::path::Path;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Cover size is not 0
/// - Max sample rate is at least 44100
/// - Cache file name is a bare image file name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.cover.size == 0 {
        return Err(ConfigError::ValidationError(
            "cover.size cannot be 0".to_string(),
        ));
    }

    if config.audio.max_sample_rate < 44100 {
        return Err(ConfigError::ValidationError(format!(
            "audio.max_sample_rate must be at least 44100, got {}",
            config.audio.max_sample_rate
        )));
    }

    let name = &config.cover.cache_file_name;
    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Err(ConfigError::ValidationError(format!(
            "cover.cache_file_name must be a bare file name, got {:?}",
            name
        )));
    }

    if !crate::cover::is_image_path(Path::new(name)) {
        return Err(ConfigError::ValidationError(format!(
            "cover.cache_file_name must have an image extension, got {:?}",
            name
        )));
    }

    Ok(())
}
