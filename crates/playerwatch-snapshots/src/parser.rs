use std::collections::BTreeMap;

use serde::Serialize;

/// A single parsed value from a snapshot file.
///
/// The source format is loosely typed: anything that looks like a number is
/// a number, everything else (dates, times, names, ip:port pairs) stays a
/// string. Making that split explicit here means consumers never re-guess
/// types at use sites.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Num(f64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            Value::Num(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64().map(|n| n as i64)
    }

    /// String form regardless of variant, for display-oriented fields.
    pub fn display(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Num(n) => {
                if n.fract() == 0.0 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }
}

/// One section of a snapshot file: key → value.
pub type Section = BTreeMap<String, Value>;

/// A fully parsed snapshot file: section name → section.
///
/// Keys appearing before any `[section]` header land in the section named
/// `""`.
pub type SnapshotDoc = BTreeMap<String, Section>;

/// Parse the INI-like per-player record format.
///
/// Grammar: blank lines and lines starting with `;` or `#` are skipped;
/// `[name]` opens a section; `key=value` pairs belong to the current
/// section. Values that parse fully as a decimal number become
/// [`Value::Num`]; dates and times keep their `.`/`:` separators and stay
/// strings.
pub fn parse_snapshot(content: &str) -> SnapshotDoc {
    let mut doc = SnapshotDoc::new();
    let mut current = String::new();

    for raw_line in content.lines() {
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') && line.len() > 2 {
            current = line[1..line.len() - 1].to_string();
            doc.entry(current.clone()).or_default();
            continue;
        }

        let Some(eq) = line.find('=') else {
            continue;
        };

        let key = line[..eq].trim().to_string();
        let raw_value = line[eq + 1..].trim();

        let value = if is_numeric(raw_value) {
            // is_numeric guarantees this parses
            Value::Num(raw_value.parse().unwrap_or(0.0))
        } else {
            Value::Str(raw_value.to_string())
        };

        doc.entry(current.clone()).or_default().insert(key, value);
    }

    doc
}

/// `-?\d+(\.\d+)?` without pulling in a regex engine.
fn is_numeric(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    if s.is_empty() {
        return false;
    }
    let mut parts = s.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();

    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        None => true,
        Some(f) => !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()),
    }
}
