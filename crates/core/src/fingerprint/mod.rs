//! Optional acoustic fingerprinting.
//!
//! The fingerprinter is chosen once at startup. When fingerprinting is
//! disabled or `fpcalc` is missing, [`NoopFingerprinter`] is used and the
//! rest of the pipeline never checks the flag again.

mod fpcalc;
mod traits;

pub use fpcalc::FpcalcFingerprinter;
pub use traits::{Fingerprinter, NoopFingerprinter};

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::converter::ToolCapabilities;

/// Picks the fingerprinter for this run.
pub fn select_fingerprinter(
    config: &Config,
    capabilities: &ToolCapabilities,
) -> Arc<dyn Fingerprinter> {
    if !config.run.enable_fingerprinting {
        return Arc::new(NoopFingerprinter);
    }

    if capabilities.fpcalc {
        info!("Fingerprinting with {:?}", config.tools.fpcalc_path);
        Arc::new(FpcalcFingerprinter::new(config.tools.fpcalc_path.clone()))
    } else {
        warn!(
            "Fingerprinting enabled but {:?} is unavailable, continuing without it",
            config.tools.fpcalc_path
        );
        Arc::new(NoopFingerprinter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_selects_noop() {
        let config = Config::for_root("/music");
        let caps = ToolCapabilities {
            fpcalc: true,
            ..Default::default()
        };
        assert_eq!(select_fingerprinter(&config, &caps).name(), "noop");
    }

    #[test]
    fn test_enabled_without_tool_selects_noop() {
        let mut config = Config::for_root("/music");
        config.run.enable_fingerprinting = true;
        let caps = ToolCapabilities::default();
        assert_eq!(select_fingerprinter(&config, &caps).name(), "noop");
    }

    #[test]
    fn test_enabled_with_tool_selects_fpcalc() {
        let mut config = Config::for_root("/music");
        config.run.enable_fingerprinting = true;
        let caps = ToolCapabilities {
            fpcalc: true,
            ..Default::default()
        };
        assert_eq!(select_fingerprinter(&config, &caps).name(), "fpcalc");
    }
}
