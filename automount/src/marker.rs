use std::borrow::Cow;

use crate::error::MountError;

/// Attribute name recognized when no other marker is configured.
pub const DEFAULT_MARKER: &str = "data-rivus";

/// The attribute that opts an element in to activation.
///
/// Only the presence of the attribute matters. Its value is never read, so
/// `<div data-rivus>` and `<div data-rivus="anything">` are equivalent.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Marker {
    name: Cow<'static, str>,
}

impl Marker {
    /// Create a marker from an attribute name.
    ///
    /// The name must start with an ASCII letter and may only contain ASCII
    /// alphanumerics, `-`, `_`, `.` and `:`. Anything else is rejected up
    /// front. `.` and `:` are escaped when rendering the selector.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Result<Self, MountError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The CSS attribute selector matching every element carrying the
    /// marker, e.g. `[data-rivus]`.
    ///
    /// `.` and `:` are not valid in a CSS identifier, so they are
    /// backslash-escaped: `x:mount` renders as `[x\:mount]`.
    pub fn selector(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + 4);
        out.push('[');
        for c in self.name.chars() {
            if matches!(c, '.' | ':') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push(']');
        out
    }

    /// Attribute names are ASCII case-insensitive in HTML documents.
    pub fn matches(&self, attribute: &str) -> bool {
        self.name.eq_ignore_ascii_case(attribute)
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            name: Cow::Borrowed(DEFAULT_MARKER),
        }
    }
}

impl std::fmt::Display for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl std::str::FromStr for Marker {
    type Err = MountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

fn validate(name: &str) -> Result<(), MountError> {
    let invalid = |reason: &'static str| MountError::InvalidMarker {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    match chars.next() {
        None => return Err(invalid("attribute name is empty")),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Err(invalid("attribute name must start with an ASCII letter"));
        }
        Some(_) => {}
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'))) {
        return Err(invalid("attribute name contains a character outside [A-Za-z0-9-_.:]"));
    }

    Ok(())
}
