//! Log filter selection.

/// Default filter directive for a `LOG_LEVEL` value.
///
/// Accepts `DEBUG`, `INFO`, `WARN` and `ERROR` in any case; anything else
/// falls back to `INFO`.
pub fn filter_directive(log_level: Option<&str>) -> String {
    let level = match log_level.map(|l| l.trim().to_ascii_uppercase()).as_deref() {
        Some("DEBUG") => "debug",
        Some("WARN") | Some("WARNING") => "warn",
        Some("ERROR") => "error",
        _ => "info",
    };
    format!("jpid_server={0},jpid_core={0},tower_http={0}", level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(
            filter_directive(Some("debug")),
            "jpid_server=debug,jpid_core=debug,tower_http=debug"
        );
        assert!(filter_directive(Some("WARN")).starts_with("jpid_server=warn"));
        assert!(filter_directive(Some("verbose")).starts_with("jpid_server=info"));
        assert!(filter_directive(None).starts_with("jpid_server=info"));
    }
}
