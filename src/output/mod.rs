//! Output formatting for CLI display
//!
//! Renders pages of the navigation stack, either as colored text or as
//! JSON for scripting.

use crate::entry::{EntryKind, FileEntry};
use crate::stack::Page;
use colored::Colorize;

/// Format one entry line (folders blue with a trailing slash)
#[must_use]
pub fn format_entry(entry: &FileEntry, quiet: bool) -> String {
    let name = entry.display_name();
    if quiet {
        return name.to_string();
    }
    let modified = entry.last_modified.format("%Y-%m-%d %H:%M");
    match entry.kind {
        EntryKind::Folder => format!("  {modified}  {}", format!("{name}/").blue().bold()),
        EntryKind::File => format!("  {modified}  {name}"),
    }
}

/// Format the header line of a page
///
/// `index` is the 0-based stack position, `title` the display name of the
/// folder shown by the page.
#[must_use]
pub fn format_page_header(index: usize, title: &str, page: &Page) -> String {
    format!(
        "{} {} ({} entries)",
        format!("[{index}]").yellow(),
        title.bold(),
        page.entries.len()
    )
}

/// Format the whole stack, one block per page
///
/// `titles` holds the display name of each page's folder, root first.
#[must_use]
pub fn format_stack(pages: &[Page], titles: &[String], quiet: bool) -> String {
    let mut out = String::new();
    for (index, page) in pages.iter().enumerate() {
        let title = titles.get(index).map_or(page.folder_token.as_str(), String::as_str);
        if !quiet {
            out.push_str(&format_page_header(index, title, page));
            out.push('\n');
        }
        for entry in &page.entries {
            out.push_str(&format_entry(entry, quiet));
            out.push('\n');
        }
    }
    out
}

/// Serialize pages as pretty JSON
///
/// # Errors
///
/// Returns `serde_json::Error` if serialization fails.
pub fn stack_json(pages: &[Page]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{file, folder};

    fn sample_page() -> Page {
        Page::new("R", vec![folder("docs", "R"), file("legacy/a.txt", "R")], 1)
    }

    #[test]
    fn test_quiet_entry_is_display_name() {
        let entry = file("legacy/a.txt", "R");
        assert_eq!(format_entry(&entry, true), "a.txt");
    }

    #[test]
    fn test_folder_entry_has_slash() {
        colored::control::set_override(false);
        let line = format_entry(&folder("docs", "R"), false);
        assert!(line.ends_with("docs/"));
        assert!(line.contains("1970-01-01 00:00"));
    }

    #[test]
    fn test_stack_quiet_lists_entries_only() {
        let out = format_stack(&[sample_page()], &["/".to_string()], true);
        assert_eq!(out, "docs\na.txt\n");
    }

    #[test]
    fn test_stack_header_falls_back_to_token() {
        colored::control::set_override(false);
        let out = format_stack(&[sample_page()], &[], false);
        assert!(out.starts_with("[0] R (2 entries)"));
    }

    #[test]
    fn test_stack_json() {
        let json = stack_json(&[sample_page()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["folder_token"], "R");
        assert_eq!(value[0]["entries"][0]["kind"], "Folder");
    }
}
