use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*```[A-Za-z]*\s*").unwrap());
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```\s*$").unwrap());
static WRAPPER_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(?:OUTPUT|INPUT)\]").unwrap());
static TRAILING_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(?P<close>\s*[}\]])").unwrap());

/// One rewrite applied to near-JSON backend output before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairTransform {
    /// Removes `[OUTPUT]`/`[INPUT]` markers and a markdown code fence
    /// wrapping the whole completion. Fences inside answers are kept.
    StripWrapperMarkers,
    /// Keeps only the outermost `{ ... }` span, dropping surrounding prose.
    ExtractJsonEnvelope,
    /// Turns curly double quotes into straight ones when the text has no
    /// straight double quotes at all.
    NormalizeSmartQuotes,
    /// Drops commas that directly precede `}` or `]`.
    RemoveTrailingCommas,
    /// Escapes backslashes that do not start a JSON escape we keep, so
    /// LaTeX such as `\frac` survives parsing.
    EscapeStrayBackslashes,
}

pub const DEFAULT_REPAIRS: [RepairTransform; 5] = [
    RepairTransform::StripWrapperMarkers,
    RepairTransform::ExtractJsonEnvelope,
    RepairTransform::NormalizeSmartQuotes,
    RepairTransform::RemoveTrailingCommas,
    RepairTransform::EscapeStrayBackslashes,
];

impl RepairTransform {
    pub fn name(&self) -> &'static str {
        match self {
            RepairTransform::StripWrapperMarkers => "strip_wrapper_markers",
            RepairTransform::ExtractJsonEnvelope => "extract_json_envelope",
            RepairTransform::NormalizeSmartQuotes => "normalize_smart_quotes",
            RepairTransform::RemoveTrailingCommas => "remove_trailing_commas",
            RepairTransform::EscapeStrayBackslashes => "escape_stray_backslashes",
        }
    }

    pub fn apply<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match self {
            RepairTransform::StripWrapperMarkers => strip_wrapper_markers(input),
            RepairTransform::ExtractJsonEnvelope => extract_json_envelope(input),
            RepairTransform::NormalizeSmartQuotes => normalize_smart_quotes(input),
            RepairTransform::RemoveTrailingCommas => TRAILING_COMMA.replace_all(input, "$close"),
            RepairTransform::EscapeStrayBackslashes => escape_stray_backslashes(input),
        }
    }
}

/// Runs `transforms` in order.
pub fn repair(input: &str, transforms: &[RepairTransform]) -> String {
    let mut current = input.trim().to_string();
    for transform in transforms {
        if let Cow::Owned(changed) = transform.apply(&current) {
            tracing::trace!(transform = transform.name(), "Applied repair transform");
            current = changed;
        }
    }
    current.trim().to_string()
}

fn strip_wrapper_markers(input: &str) -> Cow<'_, str> {
    let without_markers = WRAPPER_MARKER.replace_all(input, "");
    let without_leading = LEADING_FENCE.replace(&without_markers, "");
    let stripped = TRAILING_FENCE.replace(&without_leading, "");
    if stripped.len() == input.len() {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(stripped.into_owned())
    }
}

fn extract_json_envelope(input: &str) -> Cow<'_, str> {
    match (input.find('{'), input.rfind('}')) {
        (Some(start), Some(end)) if start < end => {
            let envelope = &input[start..=end];
            if envelope.len() == input.len() {
                Cow::Borrowed(input)
            } else {
                Cow::Owned(envelope.to_string())
            }
        }
        _ => Cow::Borrowed(input),
    }
}

fn normalize_smart_quotes(input: &str) -> Cow<'_, str> {
    if input.contains('"') || !input.contains(['\u{201C}', '\u{201D}']) {
        return Cow::Borrowed(input);
    }
    Cow::Owned(input.replace(['\u{201C}', '\u{201D}'], "\""))
}

fn escape_stray_backslashes(input: &str) -> Cow<'_, str> {
    if !input.contains('\\') {
        return Cow::Borrowed(input);
    }

    let chars: Vec<char> = input.chars().collect();
    let mut output = String::with_capacity(input.len() + 8);
    let mut changed = false;
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            output.push(chars[i]);
            i += 1;
            continue;
        }

        match chars.get(i + 1) {
            Some(next @ ('\\' | '"' | '/')) => {
                output.push('\\');
                output.push(*next);
                i += 2;
            }
            // `\neq`, `\nu` and friends are LaTeX, not a newline escape.
            Some('n') if !chars.get(i + 2).is_some_and(|c| c.is_ascii_alphabetic()) => {
                output.push('\\');
                output.push('n');
                i += 2;
            }
            Some('u') if is_unicode_escape(&chars[i + 2..]) => {
                output.push('\\');
                i += 1;
            }
            _ => {
                output.push_str("\\\\");
                changed = true;
                i += 1;
            }
        }
    }

    if changed {
        Cow::Owned(output)
    } else {
        Cow::Borrowed(input)
    }
}

fn is_unicode_escape(rest: &[char]) -> bool {
    rest.len() >= 4 && rest[..4].iter().all(|c| c.is_ascii_hexdigit())
}
