//! Display labels for audit viewers.
//!
//! Both mappings are total: a known value gets its fixed label, anything
//! else is title-cased from the raw tag, and blank input renders as
//! [`UNKNOWN_LABEL`].

/// Label for values with no usable text.
pub const UNKNOWN_LABEL: &str = "Unknown";

const RESOURCE_LABELS: &[(&str, &str)] = &[
    ("company", "Company"),
    ("user", "User"),
    ("employee", "Employee"),
    ("department", "Department"),
    ("leave", "Leave Request"),
    ("performance", "Performance Review"),
    ("payroll", "Payroll"),
    ("training", "Training Program"),
    ("report", "Report"),
    ("audit_log", "Audit Log"),
    ("settings", "Settings"),
];

/// Label for a resource type string.
pub fn resource_label(resource: &str) -> String {
    let key = resource.trim().to_lowercase();
    RESOURCE_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| title_case(&key))
}

/// `leave_approved` -> `Leave Approved`; blank -> [`UNKNOWN_LABEL`].
pub fn title_case(tag: &str) -> String {
    let words: Vec<String> = tag
        .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|w| {
            let lower = w.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect();

    if words.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        words.join(" ")
    }
}
