//! Tests for log level selection and subscriber installation

#[cfg(test)]
mod tests {
    use engraving::EngravingError;
    use engraving::io::logging::{build_filter, init, level_for};

    // Tests verbosity maps to increasingly detailed levels
    // Verified by starting the scale at info
    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for(0, false), "warn");
        assert_eq!(level_for(1, false), "info");
        assert_eq!(level_for(2, false), "debug");
        assert_eq!(level_for(3, false), "trace");
        assert_eq!(level_for(9, false), "trace");
    }

    // Tests quiet overrides any verbosity
    // Verified by checking verbosity before quiet
    #[test]
    fn test_quiet_wins() {
        assert_eq!(level_for(0, true), "error");
        assert_eq!(level_for(3, true), "error");
    }

    // Tests a filter is built for every level name
    // Verified by panicking on unknown directives
    #[test]
    fn test_build_filter() {
        for level in ["error", "warn", "info", "debug", "trace"] {
            let filter = build_filter(level);
            assert!(!filter.to_string().is_empty());
        }
    }

    // Tests a second global subscriber is reported, not fatal
    // Verified by ignoring try_init failures
    #[test]
    fn test_init_twice_reports_error() {
        // Only one global subscriber can exist per process
        let _ = init(0, true);
        match init(0, true) {
            Err(EngravingError::Logging { reason }) => assert!(!reason.is_empty()),
            other => unreachable!("Expected Logging error, got {other:?}"),
        }
    }
}
