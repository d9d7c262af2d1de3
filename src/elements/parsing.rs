/// A TLE pair as found in a file, before any orbital-model parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawElementSet {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

/// Split concatenated TLE text into element sets.
///
/// Accepts both 2-line blocks and 3-line blocks with a leading name line;
/// lines that fit neither are skipped.
pub fn parse_element_sets(content: &str) -> Vec<RawElementSet> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push(RawElementSet {
                name: None,
                line1: lines[i].to_string(),
                line2: lines[i + 1].to_string(),
            });
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push(RawElementSet {
                name: Some(lines[i].to_string()),
                line1: lines[i + 1].to_string(),
                line2: lines[i + 2].to_string(),
            });
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}

/// NORAD catalog number from columns 3-7 of line 1.
pub fn catalog_number(line1: &str) -> Option<u64> {
    line1.get(2..7)?.trim().parse().ok()
}
