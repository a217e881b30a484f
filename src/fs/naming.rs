//! Filename generation and manipulation.

use chrono::NaiveDate;

use crate::error::{Error, Result};

/// Validate and sanitize a filename by removing or replacing invalid characters.
///
/// Returns an error if the filename contains path traversal patterns.
pub fn sanitize_filename(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed in filename: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// Splice a `YYYYMMDD` date into a filename at its extension boundary.
///
/// `("WEBPXTICK_DT.zip", '-', 2023-03-03)` becomes `WEBPXTICK_DT-20230303.zip`.
pub fn inject_date_into_filename(filename: &str, separator: char, date: NaiveDate) -> String {
    let stamp = date.format("%Y%m%d");
    if let Some(dot_pos) = filename.rfind('.') {
        let name = &filename[..dot_pos];
        let ext = &filename[dot_pos..];
        format!("{}{}{}{}", name, separator, stamp, ext)
    } else {
        format!("{}{}{}", filename, separator, stamp)
    }
}

/// Extract the filename from a `Content-Disposition` header value.
///
/// Accepts quoted and unquoted values, e.g. `attachment; filename="TC_20230303.txt"`.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| {
            let (key, value) = part.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("filename")
                .then(|| value.trim().trim_matches('"').trim().to_string())
        })
        .filter(|name| !name.is_empty())
}
