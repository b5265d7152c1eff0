//! Content sanitization
//!
//! Every piece of user-controlled text (names, notes, rule metadata,
//! next-step URLs) passes through here before it is persisted, exported,
//! or rendered. All functions are pure, never fail, and are idempotent:
//! sanitizing already-safe input returns it unchanged.
//!
//! Tag stripping iterates to a fixed point, so fragments like
//! `<scr<b>ipt>` cannot reassemble into live markup after one pass.

use crate::models::EligibilityResults;

/// Tags permitted in print-document rich text
pub const DEFAULT_ALLOWED_TAGS: &[&str] = &[
    "div", "h1", "h2", "h3", "p", "span", "em", "strong", "ul", "ol", "li", "br", "a",
];

/// Attributes permitted on allowed tags
pub const DEFAULT_ALLOWED_ATTRS: &[&str] = &["style", "href", "class", "aria-label"];

/// Strip all markup, leaving only text content.
///
/// Used for names, notes, and any field stored or re-displayed without
/// rich formatting. A lone `<` that does not open a tag is kept as text.
pub fn sanitize_text(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let stripped = strip_tags_once(&current);
        if stripped == current {
            return current;
        }
        current = stripped;
    }
}

/// Keep only allow-listed tags and attributes; everything else is reduced
/// to its text content. Only the print document body uses this.
///
/// `href` values are additionally run through [`sanitize_url`]; an href
/// that fails URL sanitization is dropped from the rebuilt tag.
pub fn sanitize_rich_text(input: &str, allowed_tags: &[&str], allowed_attrs: &[&str]) -> String {
    let mut current = input.to_string();
    loop {
        let pass = rich_text_pass(&current, allowed_tags, allowed_attrs);
        if pass == current {
            return current;
        }
        current = pass;
    }
}

/// Accept only absolute `http://` / `https://` URLs.
///
/// Anything else (`javascript:`, `data:`, relative paths, garbage) yields
/// an empty string, which callers must treat as "no link".
pub fn sanitize_url(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| !c.is_control() && !c.is_whitespace())
        .collect();

    let lower = cleaned.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        cleaned
    } else {
        String::new()
    }
}

/// Strip markup from every text field of a result set, and drop every
/// next-step URL that fails URL sanitization.
///
/// Runs on the export write path, again on the import read path (a forged
/// package can carry malicious metadata past the password check), and on
/// vault saves.
pub fn sanitize_results(results: &mut EligibilityResults) {
    for program in results.all_programs_mut() {
        program.program_id = sanitize_text(&program.program_id);
        program.program_name = sanitize_text(&program.program_name);
        program.program_description = sanitize_text(&program.program_description);
        program.jurisdiction = sanitize_text(&program.jurisdiction);
        program.confidence = sanitize_text(&program.confidence);
        program.rules_version = sanitize_text(&program.rules_version);

        program.explanation.reason = sanitize_text(&program.explanation.reason);
        for detail in &mut program.explanation.details {
            *detail = sanitize_text(detail);
        }
        for rule in &mut program.explanation.rules_cited {
            *rule = sanitize_text(rule);
        }

        if let Some(benefit) = &mut program.estimated_benefit {
            benefit.frequency = sanitize_text(&benefit.frequency);
        }

        for doc in &mut program.required_documents {
            *doc = sanitize_text(doc);
        }

        for step in &mut program.next_steps {
            step.step = sanitize_text(&step.step);
            step.url = step
                .url
                .take()
                .map(|url| sanitize_url(&url))
                .filter(|url| !url.is_empty());
        }
    }
}

/// One pass of tag removal. Well-formed tags (`<letter…>`, `</…>`,
/// `<!…>`) are removed; stray `<` characters are preserved as text.
fn strip_tags_once(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let opens_tag = after
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?')
            .unwrap_or(false);

        match (opens_tag, after.find('>')) {
            (true, Some(end)) => {
                // Drop the whole tag
                rest = &after[end + 1..];
            }
            _ => {
                out.push('<');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// One rich-text pass: rebuild allowed tags canonically, reduce the rest
/// to text.
fn rich_text_pass(input: &str, allowed_tags: &[&str], allowed_attrs: &[&str]) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let opens_tag = after
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?')
            .unwrap_or(false);

        let end = match (opens_tag, after.find('>')) {
            (true, Some(end)) => end,
            _ => {
                out.push('<');
                rest = after;
                continue;
            }
        };

        let body = &after[..end];
        rest = &after[end + 1..];

        if let Some(rebuilt) = rebuild_tag(body, allowed_tags, allowed_attrs) {
            out.push_str(&rebuilt);
        }
        // Disallowed tags vanish; their inner text stays in the stream
    }

    out.push_str(rest);
    out
}

/// Rebuild a tag body (`a href="…"`, `/p`, `br/`) from the allow-lists,
/// or return None to drop it.
fn rebuild_tag(body: &str, allowed_tags: &[&str], allowed_attrs: &[&str]) -> Option<String> {
    let (closing, body) = match body.strip_prefix('/') {
        Some(stripped) => (true, stripped),
        None => (false, body),
    };
    let body = body.strip_suffix('/').unwrap_or(body).trim();

    let name_end = body
        .find(|c: char| c.is_whitespace())
        .unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();

    if !allowed_tags.contains(&name.as_str()) {
        return None;
    }

    if closing {
        return Some(format!("</{}>", name));
    }

    let mut tag = format!("<{}", name);
    for (attr, value) in parse_attrs(&body[name_end..]) {
        let attr_lower = attr.to_ascii_lowercase();
        if !allowed_attrs.contains(&attr_lower.as_str()) {
            continue;
        }
        let value = if attr_lower == "href" {
            let safe = sanitize_url(&value);
            if safe.is_empty() {
                continue;
            }
            safe
        } else {
            value
        };
        tag.push_str(&format!(" {}=\"{}\"", attr_lower, value.replace('"', "&quot;")));
    }
    tag.push('>');
    Some(tag)
}

/// Parse `name="value"` / `name='value'` / bare `name` attribute pairs.
/// Bare attributes get an empty value.
fn parse_attrs(input: &str) -> Vec<(String, String)> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut attrs = Vec::new();
    let mut i = 0;

    while i < len {
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            break;
        }

        let name_start = i;
        while i < len && bytes[i] != b'=' && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let name = input[name_start..i].to_string();
        if name.is_empty() {
            break;
        }

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len || bytes[i] != b'=' {
            attrs.push((name, String::new()));
            continue;
        }
        i += 1; // '='
        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= len {
            attrs.push((name, String::new()));
            break;
        }

        let value = if bytes[i] == b'"' || bytes[i] == b'\'' {
            let quote = bytes[i];
            i += 1;
            let value_start = i;
            while i < len && bytes[i] != quote {
                i += 1;
            }
            let value = input[value_start..i].to_string();
            if i < len {
                i += 1; // closing quote
            }
            value
        } else {
            let value_start = i;
            while i < len && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            input[value_start..i].to_string()
        };

        attrs.push((name, value));
    }

    attrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(sanitize_text("SNAP benefits for March"), "SNAP benefits for March");
    }

    #[test]
    fn test_script_tag_stripped() {
        let out = sanitize_text("<script>alert(1)</script>SNAP");
        assert!(out.contains("SNAP"));
        assert!(!out.contains("<script>"));
        assert!(!out.contains("</script>"));
    }

    #[test]
    fn test_nested_fragments_cannot_reassemble() {
        // One naive pass would turn this into "<script>"
        let out = sanitize_text("<scr<b>ipt>alert(1)</scr</b>ipt>");
        assert!(!out.contains("<script>"));
        assert!(!out.contains("</script>"));
    }

    #[test]
    fn test_lone_angle_bracket_preserved() {
        assert_eq!(sanitize_text("income < 2000"), "income < 2000");
    }

    #[test]
    fn test_sanitize_text_idempotent() {
        let inputs = [
            "plain",
            "<b>bold</b> text",
            "a < b > c",
            "<scr<b>ipt>x</script>",
            "",
        ];
        for input in inputs {
            let once = sanitize_text(input);
            assert_eq!(sanitize_text(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_url_accepts_http_and_https() {
        assert_eq!(
            sanitize_url("https://benefits.gov/apply"),
            "https://benefits.gov/apply"
        );
        assert_eq!(sanitize_url("http://example.org"), "http://example.org");
        assert_eq!(sanitize_url("HTTPS://EXAMPLE.ORG"), "HTTPS://EXAMPLE.ORG");
    }

    #[test]
    fn test_url_rejects_other_schemes() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "");
        assert_eq!(sanitize_url("data:text/html,<script>"), "");
        assert_eq!(sanitize_url("ftp://host/file"), "");
        assert_eq!(sanitize_url("/relative/path"), "");
        assert_eq!(sanitize_url(""), "");
    }

    #[test]
    fn test_url_rejects_scheme_with_embedded_whitespace() {
        assert_eq!(sanitize_url("java\tscript:alert(1)"), "");
        assert_eq!(sanitize_url("  javascript:alert(1)  "), "");
    }

    #[test]
    fn test_url_idempotent() {
        let safe = sanitize_url("https://benefits.gov/apply");
        assert_eq!(sanitize_url(&safe), safe);
        assert_eq!(sanitize_url(&sanitize_url("javascript:x")), "");
    }

    #[test]
    fn test_rich_text_keeps_allowed_tags() {
        let out = sanitize_rich_text(
            "<p>hello <em>world</em></p>",
            DEFAULT_ALLOWED_TAGS,
            DEFAULT_ALLOWED_ATTRS,
        );
        assert_eq!(out, "<p>hello <em>world</em></p>");
    }

    #[test]
    fn test_rich_text_drops_script_keeps_text() {
        let out = sanitize_rich_text(
            "<p>ok</p><script>alert(1)</script>",
            DEFAULT_ALLOWED_TAGS,
            DEFAULT_ALLOWED_ATTRS,
        );
        assert!(out.contains("<p>ok</p>"));
        assert!(!out.contains("script"));
        assert!(out.contains("alert(1)")); // text content survives as text
    }

    #[test]
    fn test_rich_text_filters_attributes() {
        let out = sanitize_rich_text(
            r#"<a href="https://benefits.gov" onclick="evil()">apply</a>"#,
            DEFAULT_ALLOWED_TAGS,
            DEFAULT_ALLOWED_ATTRS,
        );
        assert!(out.contains(r#"href="https://benefits.gov""#));
        assert!(!out.contains("onclick"));
    }

    #[test]
    fn test_rich_text_drops_javascript_href() {
        let out = sanitize_rich_text(
            r#"<a href="javascript:alert(1)">apply</a>"#,
            DEFAULT_ALLOWED_TAGS,
            DEFAULT_ALLOWED_ATTRS,
        );
        assert!(!out.contains("javascript:"));
        assert!(out.contains("<a>apply</a>"));
    }

    #[test]
    fn test_rich_text_idempotent() {
        let inputs = [
            r#"<p class="x">text</p>"#,
            r#"<a href="https://example.org">link</a>"#,
            "<div><span>nested</span></div>",
            "<iframe src=evil></iframe>plain",
        ];
        for input in inputs {
            let once = sanitize_rich_text(input, DEFAULT_ALLOWED_TAGS, DEFAULT_ALLOWED_ATTRS);
            let twice = sanitize_rich_text(&once, DEFAULT_ALLOWED_TAGS, DEFAULT_ALLOWED_ATTRS);
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_sanitize_results_walks_every_partition() {
        use crate::models::{
            EligibilityResults, EligibilityStatus, Explanation, NextStep,
            ProgramEligibilityResult,
        };
        use chrono::Utc;

        let mut results = EligibilityResults {
            qualified: vec![ProgramEligibilityResult {
                program_id: "snap".into(),
                program_name: "<script>alert(1)</script>SNAP".into(),
                program_description: "<b>food</b> assistance".into(),
                jurisdiction: "CA".into(),
                status: EligibilityStatus::Qualified,
                confidence: "high".into(),
                confidence_score: 0.95,
                explanation: Explanation {
                    reason: "<em>income</em> below threshold".into(),
                    details: vec!["<i>detail</i>".into()],
                    rules_cited: vec!["rule-7".into()],
                },
                estimated_benefit: None,
                required_documents: vec!["<u>ID card</u>".into()],
                next_steps: vec![
                    NextStep {
                        step: "apply online".into(),
                        url: Some("javascript:alert(1)".into()),
                    },
                    NextStep {
                        step: "call office".into(),
                        url: Some("https://benefits.gov/apply".into()),
                    },
                ],
                evaluated_at: Utc::now(),
                rules_version: "2025.1".into(),
            }],
            likely: vec![],
            maybe: vec![],
            not_qualified: vec![],
            total_programs: 1,
            evaluated_at: Utc::now(),
        };

        sanitize_results(&mut results);

        let program = &results.qualified[0];
        assert_eq!(program.program_name, "alert(1)SNAP");
        assert_eq!(program.program_description, "food assistance");
        assert_eq!(program.explanation.reason, "income below threshold");
        assert_eq!(program.explanation.details[0], "detail");
        assert_eq!(program.required_documents[0], "ID card");
        assert_eq!(program.next_steps[0].url, None);
        assert_eq!(
            program.next_steps[1].url.as_deref(),
            Some("https://benefits.gov/apply")
        );
    }

    #[test]
    fn test_non_ascii_text_passes_through() {
        assert_eq!(sanitize_text("Ayuda alimentaria — más información"), "Ayuda alimentaria — más información");
    }
}
