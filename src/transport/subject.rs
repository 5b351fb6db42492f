// Subject helpers shared by the transports.
//
// Subjects are `.`-separated tokens. In patterns `*` matches exactly one
// token and `>` matches one or more trailing tokens.

/// Check whether `subject` matches the subscription `pattern`
pub fn subject_matches(pattern: &str, subject: &str) -> bool {
    if pattern.is_empty() || subject.is_empty() {
        return false;
    }

    let mut subject_tokens = subject.split('.');

    for pattern_token in pattern.split('.') {
        match pattern_token {
            ">" => return subject_tokens.next().is_some(),
            "*" => {
                if subject_tokens.next().is_none() {
                    return false;
                }
            }
            literal => match subject_tokens.next() {
                Some(token) if token == literal => {}
                _ => return false,
            },
        }
    }

    subject_tokens.next().is_none()
}

/// Derive the sender id from the subject a message arrived on.
///
/// `chatroom.alice` → `alice`. Subjects with a single token have no sender
/// segment, so the whole subject is used.
pub fn sender_from_subject(subject: &str) -> &str {
    subject.split('.').nth(1).unwrap_or(subject)
}
