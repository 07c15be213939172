//! Line format of the console transport.

/// Split a console line into `(user, message)`.
///
/// `alice: !forex cnyusd` is spoken by `alice`; a line without a speaker
/// is attributed to `default_user`. Blank lines yield nothing.
pub fn parse_line(line: &str, default_user: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some((user, message)) = line.split_once(": ") {
        if !user.is_empty() && !user.chars().any(char::is_whitespace) {
            return Some((user.to_string(), message.trim().to_string()));
        }
    }

    Some((default_user.to_string(), line.to_string()))
}
