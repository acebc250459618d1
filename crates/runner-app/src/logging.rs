use env_logger::{Builder, Env};
use log::LevelFilter;

/// Crates whose records follow the `--verbose` level. Everything else
/// stays at `warn`.
const RUNNER_CRATES: [&str; 4] = ["runner_core", "runner_pursuit", "runner_sim", "runner_app"];

/// Filter used when `RUST_LOG` is unset, e.g. `warn,runner_sim=debug,...`.
pub fn default_filter(verbose: bool) -> String {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let mut filter = LevelFilter::Warn.to_string().to_lowercase();
    for name in RUNNER_CRATES {
        filter.push_str(&format!(",{name}={}", level.to_string().to_lowercase()));
    }
    filter
}

/// Initializes the global logger.
///
/// Pursuit transitions log at debug, spawns and despawns at info. `RUST_LOG`
/// replaces the default filter entirely.
pub fn init(verbose: bool) {
    let env = Env::default().default_filter_or(default_filter(verbose));
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis().format_target(true);

    // Already initialised (tests call this repeatedly).
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_quiet() {
        let filter = default_filter(false);
        assert!(filter.starts_with("warn,"));
        assert!(filter.contains("runner_sim=info"));
        assert!(!filter.contains("debug"));
    }

    #[test]
    fn test_default_filter_verbose_covers_every_crate() {
        let filter = default_filter(true);
        for name in RUNNER_CRATES {
            assert!(filter.contains(&format!("{name}=debug")), "{filter}");
        }
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
