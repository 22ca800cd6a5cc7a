//! Read-only unit state queries.

use std::time::Duration;

use tracing::{debug, trace};

use crate::error::ReconcileError;
use crate::systemctl::Systemctl;

/// Queries the observed state of a unit: existence, activation, enablement.
///
/// All three queries are read-only and idempotent. Results are never cached;
/// every call asks the service manager again, so callers always see current
/// state rather than a stale snapshot.
///
/// `is-active` and `is-enabled` report a negative answer through a non-zero
/// exit status. That is a result, not an error: only a query whose process
/// never completed (missing binary, timeout) surfaces as `Err`.
pub struct StateObserver<'a> {
    ctl: &'a dyn Systemctl,
    timeout: Duration,
}

impl<'a> StateObserver<'a> {
    pub fn new(ctl: &'a dyn Systemctl, timeout: Duration) -> Self {
        Self { ctl, timeout }
    }

    /// True iff the service manager knows of a unit file matching `unit`.
    ///
    /// Matching is exact-prefix-to-boundary against the listing, never bare
    /// prefix or substring: `foo` matches `foo.service` and `foo@.service`
    /// but not `foo-bar.service`. Newer systemctl exits non-zero from
    /// `list-unit-files` when nothing matches; the listing is parsed
    /// regardless of exit status, so both generations behave the same.
    pub fn exists(&self, unit: &str) -> Result<bool, ReconcileError> {
        trace!(unit = %unit, "Querying unit file listing");
        let result = self
            .ctl
            .invoke(&["list-unit-files".to_string(), unit.to_string()], self.timeout)?;

        let found = listing_has_unit(&result.stdout, unit);
        debug!(unit = %unit, exists = found, "Unit existence queried");
        Ok(found)
    }

    /// True iff the unit is currently running.
    pub fn is_active(&self, unit: &str) -> Result<bool, ReconcileError> {
        trace!(unit = %unit, "Querying activation state");
        let result = self
            .ctl
            .invoke(&["is-active".to_string(), unit.to_string()], self.timeout)?;

        // Non-zero exit is systemctl's way of saying "inactive".
        debug!(unit = %unit, active = result.success, "Activation state queried");
        Ok(result.success)
    }

    /// True iff the unit is configured to start automatically at boot.
    pub fn is_enabled(&self, unit: &str) -> Result<bool, ReconcileError> {
        trace!(unit = %unit, "Querying enablement state");
        let result = self
            .ctl
            .invoke(&["is-enabled".to_string(), unit.to_string()], self.timeout)?;

        // Non-zero exit is systemctl's way of saying "disabled".
        debug!(unit = %unit, enabled = result.success, "Enablement state queried");
        Ok(result.success)
    }
}

/// Scan a `list-unit-files` table for a row naming `unit`.
///
/// The first line is the column header and the table ends at the first blank
/// line (the footer repeats a count). A row matches when its first token is
/// the unit name itself or the unit name followed by a `.` type suffix or
/// `@` template marker. Anything else after the name (like `-bar` in
/// `foo-bar.service` against `foo`) is a different unit.
fn listing_has_unit(stdout: &str, unit: &str) -> bool {
    for line in stdout.lines().skip(1) {
        if line.trim().is_empty() {
            break;
        }
        let Some(token) = line.split_whitespace().next() else {
            continue;
        };
        if token == unit {
            return true;
        }
        if let Some(rest) = token.strip_prefix(unit) {
            if rest.starts_with('.') || rest.starts_with('@') {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "UNIT FILE                              STATE           VENDOR PRESET";

    fn listing(rows: &[&str]) -> String {
        let mut out = String::from(HEADER);
        out.push('\n');
        for row in rows {
            out.push_str(row);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&format!("{} unit files listed.\n", rows.len()));
        out
    }

    #[test]
    fn test_exact_unit_file_name_matches() {
        let out = listing(&["nginx.service                          enabled         enabled"]);
        assert!(listing_has_unit(&out, "nginx.service"));
    }

    #[test]
    fn test_bare_name_matches_type_suffix() {
        let out = listing(&["foo.service                            disabled        enabled"]);
        assert!(listing_has_unit(&out, "foo"));
    }

    #[test]
    fn test_template_unit_matches() {
        let out = listing(&["getty@.service                         enabled         enabled"]);
        assert!(listing_has_unit(&out, "getty"));
    }

    #[test]
    fn test_prefix_of_longer_name_does_not_match() {
        // "foo" is a textual prefix of "foo-bar.service" but names a
        // different unit.
        let out = listing(&["foo-bar.service                        enabled         enabled"]);
        assert!(!listing_has_unit(&out, "foo"));
    }

    #[test]
    fn test_empty_listing_does_not_match() {
        let out = format!("{}\n\n0 unit files listed.\n", HEADER);
        assert!(!listing_has_unit(&out, "foo"));
        assert!(!listing_has_unit("", "foo"));
    }

    #[test]
    fn test_footer_count_is_not_scanned() {
        // The blank line terminates the table before the footer.
        let out = listing(&["bar.service                            enabled         enabled"]);
        assert!(!listing_has_unit(&out, "1"));
    }
}
