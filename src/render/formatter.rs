//! Box-drawn, fixed-width rendering of search results.
//!
//! Widths are counted in `char`s. Every content line is padded to
//! `width - 4` columns so the box stays rectangular.

use crate::storage::cves::CveRecord;

const TITLE: &str = "CVE Search Results";
const DESCRIPTION_PREFIX: &str = "Description: ";
const EXPLOIT_TAG: &str = "[EXPLOIT]";
const NO_EXPLOIT_TAG: &str = "[NO EXPLOIT]";

/// Block shown when a search matches nothing
pub const NO_RESULTS: [&str; 3] = [
    "╔════════════════════════════════════╗",
    "║         No results found!          ║",
    "╚════════════════════════════════════╝",
];

/// Render search results into a box `width` columns wide
pub fn render_results(results: &[CveRecord], width: usize) -> Vec<String> {
    if results.is_empty() {
        return NO_RESULTS.iter().map(|line| line.to_string()).collect();
    }

    let inner = width.saturating_sub(2);
    let content = width.saturating_sub(4);
    let rule = "═".repeat(inner);

    let mut output = Vec::new();
    output.push(format!("╔{}╗", rule));
    output.push(format!("║{:^inner$}║", TITLE));
    output.push(format!("╠{}╣", rule));

    for record in results {
        output.push(bordered(&info_line(record), content));
        let description = format!("{}{}", DESCRIPTION_PREFIX, record.description);
        for line in wrap_words(&description, content) {
            output.push(bordered(&line, content));
        }
        output.push(format!("╠{}╣", rule));
    }

    output.push(format!("╚{}╝", rule));
    output
}

/// `<id>  <severity>  <published>  <tag>`
pub fn info_line(record: &CveRecord) -> String {
    let tag = if record.exploit_available {
        EXPLOIT_TAG
    } else {
        NO_EXPLOIT_TAG
    };
    format!(
        "{}  {}  {}  {}",
        record.id, record.severity, record.published, tag
    )
}

fn bordered(text: &str, content: usize) -> String {
    // Left-justified and padded, never truncated.
    format!("║ {:<content$} ║", text)
}

/// Greedy word wrap to `width` columns.
///
/// Lines may break after the hyphens of a hyphenated word. Whitespace runs
/// collapse to single spaces; pieces longer than `width` are split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        for (i, mut piece) in hyphen_pieces(word).into_iter().enumerate() {
            // Only the first piece of a word is preceded by a space.
            let mut gap = usize::from(i == 0 && current_len > 0);

            if piece.len() <= width && current_len + gap + piece.len() > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                gap = 0;
            }

            // Oversized pieces fill the rest of the current line first.
            while current_len + gap + piece.len() > width {
                let room = width.saturating_sub(current_len + gap);
                if room > 0 {
                    if gap > 0 {
                        current.push(' ');
                    }
                    current.extend(piece.drain(..room));
                }
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                gap = 0;
            }

            if gap > 0 {
                current.push(' ');
            }
            current_len += gap + piece.len();
            current.extend(piece);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split `word` after each hyphen that follows two letters and precedes a
/// letter, so "cross-site" gives "cross-" and "site" but "CVE-2024" stays whole.
fn hyphen_pieces(word: &str) -> Vec<Vec<char>> {
    let chars: Vec<char> = word.chars().collect();
    let mut pieces = Vec::new();
    let mut start = 0;

    for i in 2..chars.len().saturating_sub(1) {
        if chars[i] == '-'
            && chars[i - 1].is_alphabetic()
            && chars[i - 2].is_alphabetic()
            && chars[i + 1].is_alphabetic()
        {
            pieces.push(chars[start..=i].to_vec());
            start = i + 1;
        }
    }
    pieces.push(chars[start..].to_vec());
    pieces
}
