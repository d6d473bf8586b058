// ABOUTME: Shared logging setup for hwssh binaries
// ABOUTME: Logs to stderr so stdout stays free for keys and parsed output

use tracing_subscriber::EnvFilter;

/// Logging to stderr with RUST_LOG override.
/// Default: WARN for dependencies, INFO for hwssh crates (DEBUG when verbose).
pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

fn filter(verbose: bool) -> EnvFilter {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    filter_from(rust_log.as_deref(), verbose)
}

/// RUST_LOG directives replace the defaults entirely; an empty or
/// unparsable value falls back to them.
fn filter_from(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let level = if verbose { "debug" } else { "info" };
    let defaults = format!("warn,hwssh={level},hwssh_core={level},hwssh_cli={level}");

    rust_log
        .map(str::trim)
        .filter(|directives| !directives.is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(defaults))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels() {
        let quiet = filter_from(None, false).to_string();
        assert!(quiet.contains("hwssh_core=info"));
        assert!(quiet.contains("warn"));
        assert!(filter_from(None, true).to_string().contains("hwssh_core=debug"));
    }

    #[test]
    fn test_rust_log_overrides_defaults() {
        let rendered = filter_from(Some("hwssh_core=trace"), false).to_string();
        assert!(rendered.contains("hwssh_core=trace"));
        assert!(!rendered.contains("hwssh_core=info"));
        assert!(!rendered.contains("hwssh_cli=info"));
    }

    #[test]
    fn test_rust_log_overrides_verbose() {
        let rendered = filter_from(Some("error"), true).to_string();
        assert_eq!(rendered, "error");
    }

    #[test]
    fn test_blank_or_invalid_rust_log_uses_defaults() {
        assert!(filter_from(Some("  "), false)
            .to_string()
            .contains("hwssh_core=info"));
        assert!(filter_from(Some("hwssh_core=notalevel"), false)
            .to_string()
            .contains("hwssh_core=info"));
    }

    #[test]
    fn test_filter_reads_rust_log_from_environment() {
        std::env::set_var(EnvFilter::DEFAULT_ENV, "hwssh_core=trace");
        let rendered = filter(false).to_string();
        std::env::remove_var(EnvFilter::DEFAULT_ENV);

        assert!(rendered.contains("hwssh_core=trace"));
        assert!(!rendered.contains("hwssh_core=info"));
    }
}
