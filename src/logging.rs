use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Set to `json` for machine-readable log lines.
pub const LOG_FORMAT_VAR: &str = "HARVEST_LOG_FORMAT";

const DEFAULT_DIRECTIVE: &str = "review_harvest=info";

/// Install the global subscriber: `RUST_LOG` plus `review_harvest=info`.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(DEFAULT_DIRECTIVE.parse()?);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if json_requested(std::env::var(LOG_FORMAT_VAR).ok().as_deref()) {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn json_requested(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_json_selects_json_output() {
        assert!(json_requested(Some("json")));
        assert!(json_requested(Some(" JSON ")));
        assert!(!json_requested(Some("pretty")));
        assert!(!json_requested(None));
    }
}
