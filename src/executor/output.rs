//! Diagnostic output sanitization.

/// Sanitize command output for inclusion in error messages.
///
/// Truncates long output to a reasonable length and limits the number of
/// lines shown, so a chatty systemctl failure does not flood logs or
/// upstream error reports.
pub fn sanitize_output(output: &str, max_lines: usize) -> String {
    const MAX_LINE_LENGTH: usize = 200;
    const MAX_TOTAL_LENGTH: usize = 1000;

    let lines: Vec<&str> = output.lines().take(max_lines).collect();
    let mut result = String::new();

    for line in lines {
        // Truncate long lines
        let truncated = if line.len() > MAX_LINE_LENGTH {
            format!("{}...", truncate_at_char_boundary(line, MAX_LINE_LENGTH))
        } else {
            line.to_string()
        };

        if result.len() + truncated.len() > MAX_TOTAL_LENGTH {
            result.push_str("...[truncated]");
            break;
        }

        if !result.is_empty() {
            result.push('\n');
        }
        result.push_str(&truncated);
    }

    if output.lines().count() > max_lines {
        result.push_str("\n...[additional output truncated]");
    }

    result
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a
/// UTF-8 character. systemd localizes its messages, so captured stderr is
/// not guaranteed to be ASCII.
fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
