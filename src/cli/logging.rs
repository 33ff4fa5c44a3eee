//! Log filter selection

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Build the log filter from `RUST_LOG` (when set and valid) or the verbosity flag
pub fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        if let Ok(filter) = EnvFilter::try_new(directives) {
            return filter;
        }
    }

    let level = if verbose { Level::DEBUG } else { Level::INFO };
    EnvFilter::new(level.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_default_is_info() {
        assert_eq!(log_filter(false, None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_verbose_is_debug() {
        assert_eq!(log_filter(true, None).max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn test_rust_log_overrides_default() {
        assert_eq!(
            log_filter(false, Some("warn")).max_level_hint(),
            Some(LevelFilter::WARN)
        );
        assert_eq!(
            log_filter(true, Some("error")).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
    }

    #[test]
    fn test_empty_rust_log_falls_back() {
        assert_eq!(
            log_filter(false, Some("  ")).max_level_hint(),
            Some(LevelFilter::INFO)
        );
    }
}
