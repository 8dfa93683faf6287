//! Flat `Key=Value; ` connection string encoding.
//!
//! Keys are matched case-insensitively by the callers. Values that would not
//! survive a plain split (a `;`, a quote, surrounding whitespace) are written
//! in double quotes with `""` escaping.

/// Replacement text for secrets in rendered connection strings.
pub const MASK: &str = "***";

/// Accumulates `Key=Value; ` pairs, skipping blank values.
#[derive(Debug, Default)]
pub(crate) struct ConnectionStringWriter {
    buf: String,
}

impl ConnectionStringWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, key: &str, value: &str) {
        if value.trim().is_empty() {
            return;
        }
        self.buf.push_str(key);
        self.buf.push('=');
        if needs_quotes(value) {
            self.buf.push('"');
            self.buf.push_str(&value.replace('"', "\"\""));
            self.buf.push('"');
        } else {
            self.buf.push_str(value);
        }
        self.buf.push_str("; ");
    }

    pub(crate) fn push_opt(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Push a secret, replacing it with [`MASK`] when requested.
    pub(crate) fn push_secret(&mut self, key: &str, value: Option<&str>, mask: bool) {
        match value {
            Some(value) if mask && !value.trim().is_empty() => self.push(key, MASK),
            other => self.push_opt(key, other),
        }
    }

    pub(crate) fn finish(self) -> String {
        self.buf
    }
}

fn needs_quotes(value: &str) -> bool {
    value.contains(';')
        || value.starts_with('"')
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
}

/// Split a connection string into `(key, value)` pairs.
///
/// Tokens without `=`, or with a blank key or value, are skipped.
pub(crate) fn pairs(input: &str) -> Vec<(String, String)> {
    let mut result = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.next_if(|c| *c == ';' || c.is_whitespace()).is_some() {}
        if chars.peek().is_none() {
            break;
        }

        let mut key = String::new();
        let mut has_value = false;
        while let Some(c) = chars.next_if(|c| *c != ';') {
            if c == '=' {
                has_value = true;
                break;
            }
            key.push(c);
        }
        if !has_value {
            continue;
        }

        while chars.next_if(|c| *c != ';' && c.is_whitespace()).is_some() {}

        let value = if chars.next_if_eq(&'"').is_some() {
            let mut value = String::new();
            while let Some(c) = chars.next() {
                if c == '"' {
                    if chars.next_if_eq(&'"').is_some() {
                        value.push('"');
                    } else {
                        break;
                    }
                } else {
                    value.push(c);
                }
            }
            // discard anything between the closing quote and the separator
            while chars.next_if(|c| *c != ';').is_some() {}
            value
        } else {
            let mut value = String::new();
            while let Some(c) = chars.next_if(|c| *c != ';') {
                value.push(c);
            }
            value.trim().to_string()
        };

        let key = key.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        result.push((key.to_string(), value));
    }

    result
}

/// Interpret a boolean connection string value.
pub(crate) fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
        || value.eq_ignore_ascii_case("yes")
        || value.eq_ignore_ascii_case("sspi")
}
