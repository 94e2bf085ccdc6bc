//! Timing-text to clock-time display mapping.

/// Substring rules in priority order; the first group with a hit wins.
///
/// Display times are fixed by convention with the practice, not computed.
const RULES: &[(&[&str], &str)] = &[
    (&["after dinner", "once a night", "at night"], "10:00 PM"),
    (&["before breakfast", "empty stomach"], "07:00 AM"),
    (&["once a morning", "every morning"], "09:00 AM"),
    (
        &["two times a day", "twice a day", "twice daily"],
        "09:00 AM & 09:00 PM",
    ),
    (
        &["three times a day", "thrice a day"],
        "09:00 AM & 02:00 PM & 09:00 PM",
    ),
    (&["once a day", "once daily"], "09:00 AM"),
];

/// Map a free-text timing description to a display clock time.
///
/// Matching is case-insensitive. Returns the empty string when no rule
/// matches, which renders as "no scheduled time".
pub fn clock_display(timing_text: &str) -> String {
    let timing = timing_text.to_lowercase();
    for (patterns, display) in RULES {
        if patterns.iter().any(|p| timing.contains(p)) {
            return (*display).to_string();
        }
    }
    String::new()
}
