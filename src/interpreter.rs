//! Turns the free-form text a model returns for prompt generation into
//! structured [`ParsedPromptRecord`]s.
//!
//! Responses are split into segments on lines consisting of `---`. Inside a
//! segment a small state machine tracks which section (prompt, localized
//! description, negative prompt) the current line belongs to. Header lines
//! switch the section; any text after the header's label (ended by `:` or a
//! closing `**`) on the same line is kept as content. Segments without prompt text are dropped and the
//! remaining ones are numbered from 1.

use crate::models::ParsedPromptRecord;

const SEGMENT_DELIMITER: &str = "---";

const PROMPT_MARKERS: &[&str] = &["**Prompt"];
const LOCALIZED_MARKERS: &[&str] = &[
    "**Mô tả tiếng Việt",
    "**Vietnamese Description",
    "**Localized Description",
];
const NEGATIVE_MARKERS: &[&str] = &["**Negative Prompt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Prompt,
    Localized,
    Negative,
}

#[derive(Default)]
struct SegmentAccumulator {
    prompt: String,
    localized: String,
    negative: String,
}

impl SegmentAccumulator {
    fn push(&mut self, section: Section, text: &str) {
        let target = match section {
            Section::Prompt => &mut self.prompt,
            Section::Localized => &mut self.localized,
            Section::Negative => &mut self.negative,
            Section::None => return,
        };
        target.push_str(text);
        target.push(' ');
    }
}

/// Parses a model response. Never fails; unusable input yields an empty list.
pub fn parse(raw_text: &str) -> Vec<ParsedPromptRecord> {
    split_segments(raw_text)
        .iter()
        .filter_map(|segment| parse_segment(segment))
        .enumerate()
        .map(|(index, (prompt_text, localized_description, negative_prompt))| {
            ParsedPromptRecord {
                ordinal: index + 1,
                prompt_text,
                localized_description,
                negative_prompt,
            }
        })
        .collect()
}

fn split_segments(raw_text: &str) -> Vec<Vec<&str>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for line in raw_text.lines() {
        if line.trim() == SEGMENT_DELIMITER {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    segments.push(current);

    segments
        .into_iter()
        .filter(|lines| lines.iter().any(|line| !line.trim().is_empty()))
        .collect()
}

fn parse_segment(lines: &[&str]) -> Option<(String, String, String)> {
    let mut section = Section::None;
    let mut acc = SegmentAccumulator::default();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some((next, inline)) = match_header(line) {
            section = next;
            if let Some(content) = inline {
                acc.push(section, content);
            }
        } else {
            acc.push(section, line);
        }
    }

    let prompt = acc.prompt.trim();
    if prompt.is_empty() {
        return None;
    }

    Some((
        prompt.to_string(),
        acc.localized.trim().to_string(),
        acc.negative.trim().to_string(),
    ))
}

/// Recognises a section header and returns any content that follows it on
/// the same line.
fn match_header(line: &str) -> Option<(Section, Option<&str>)> {
    let (section, marker) = [
        (Section::Prompt, PROMPT_MARKERS),
        (Section::Localized, LOCALIZED_MARKERS),
        (Section::Negative, NEGATIVE_MARKERS),
    ]
    .into_iter()
    .find_map(|(section, markers)| {
        markers
            .iter()
            .find(|marker| line.starts_with(*marker))
            .map(|marker| (section, *marker))
    })?;

    Some((section, inline_content(&line[marker.len()..])))
}

/// Content after a header's label. The label ends at the first `:` or
/// closing `**`, whichever comes first.
fn inline_content(rest: &str) -> Option<&str> {
    let label_end = match (rest.find(':'), rest.find("**")) {
        (Some(colon), Some(close)) if close < colon => close + 2,
        (Some(colon), _) => colon + 1,
        (None, Some(close)) => close + 2,
        (None, None) => return None,
    };

    let content = rest[label_end..].trim_matches(|c: char| c == '*' || c == ':' || c.is_whitespace());
    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}
