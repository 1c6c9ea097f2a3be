//! The record line appended to the locations data file, and the splice that
//! inserts it.
//!
//! The data file is a JavaScript source holding one array literal of records:
//!
//! ```text
//! const ukCities = [
//!     { name: "Bath", phoneCode: "01225", population: 94782, latitude: 51.38, longitude: -2.36 },
//! ];
//! ```
//!
//! New records go on their own line directly before the last `];`. Every other
//! byte of the file is left exactly as it was.

use crate::{BranchName, Coordinates, LocationName, Population, RepoPath, TargetFileError};

/// Marks the end of the record list.
pub const SENTINEL: &str = "];";

/// Prefix of every branch opened for a new location.
const BRANCH_PREFIX: &str = "add-location-";

/// One location entry as written to the data file.
///
/// The phone code is always left empty for a reviewer to fill in.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationRecord {
    pub name: LocationName,
    pub population: Population,
    pub coordinates: Coordinates,
}

impl LocationRecord {
    /// Renders the record as a single line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "    {{ name: \"{}\", phoneCode: \"\", population: {}, latitude: {:?}, longitude: {:?} }},",
            escape_js_string(self.name.as_str()),
            self.population.as_record_value(),
            self.coordinates.latitude(),
            self.coordinates.longitude(),
        )
    }
}

/// Escapes the characters that would terminate or corrupt a double-quoted
/// JavaScript string literal.
fn escape_js_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Returns the branch a location's change is proposed on: the name
/// lower-cased with spaces replaced by hyphens, after `add-location-`.
pub fn branch_name_for(name: &LocationName) -> BranchName {
    let slug = name.as_str().to_lowercase().replace(' ', "-");
    BranchName::new(format!("{BRANCH_PREFIX}{slug}")).expect("prefixed branch name is never empty")
}

/// Inserts `record` on its own line immediately before the last [`SENTINEL`]
/// in `content`.
///
/// # Errors
///
/// - [`TargetFileError::NotUtf8`] if `content` is not valid UTF-8.
/// - [`TargetFileError::MissingSentinel`] if `content` has no `];`.
pub fn splice_record(
    path: &RepoPath,
    content: &[u8],
    record: &LocationRecord,
) -> Result<Vec<u8>, TargetFileError> {
    let text = std::str::from_utf8(content)
        .map_err(|_| TargetFileError::NotUtf8 { path: path.clone() })?;
    let insertion_point = text
        .rfind(SENTINEL)
        .ok_or_else(|| TargetFileError::MissingSentinel { path: path.clone() })?;

    let line = record.to_line();
    let mut updated = String::with_capacity(text.len() + line.len() + 1);
    updated.push_str(&text[..insertion_point]);
    updated.push_str(&line);
    updated.push('\n');
    updated.push_str(&text[insertion_point..]);
    Ok(updated.into_bytes())
}
