//! Print document builder
//!
//! Assembles a self-contained, print-styled HTML document from a result
//! set: totals up front, then one section per program with its
//! explanation, estimated benefit, required documents, and next steps.
//!
//! Every interpolated field is sanitized and then HTML-escaped; next-step
//! links are dropped entirely when URL sanitization rejects them. The
//! caller is expected to hand the output to a non-executing print/PDF
//! pipeline, not a script-capable renderer. Building never fails: missing
//! optional fields and pathological strings render best-effort.

use crate::models::{EligibilityResults, ProgramEligibilityResult};
use crate::sanitize::{sanitize_text, sanitize_url};

/// Optional header context for the printed document
#[derive(Debug, Clone, Default)]
pub struct UserInfo {
    /// Name to show in the document header
    pub name: Option<String>,
    /// State/jurisdiction label for the header
    pub state: Option<String>,
}

const STYLESHEET: &str = "\
body { font-family: Georgia, serif; margin: 2rem; color: #1a1a1a; }\n\
h1 { font-size: 1.6rem; border-bottom: 2px solid #1a1a1a; padding-bottom: 0.3rem; }\n\
h2 { font-size: 1.2rem; margin-top: 1.5rem; }\n\
h3 { font-size: 1rem; margin-bottom: 0.2rem; }\n\
.summary { margin: 1rem 0; padding: 0.8rem; border: 1px solid #999; }\n\
.program { margin: 1.2rem 0; page-break-inside: avoid; }\n\
.jurisdiction { color: #555; font-style: italic; }\n\
.benefit { font-weight: bold; }\n\
ul { margin: 0.3rem 0 0.8rem 1.2rem; }\n\
@media print { body { margin: 0.5in; } }";

/// Build the printable HTML document.
///
/// `user` fills in the header; pass `None` for an anonymous document.
pub fn build_document(results: &EligibilityResults, user: Option<&UserInfo>) -> String {
    let mut doc = String::with_capacity(4096);

    doc.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    doc.push_str("<title>Benefit Eligibility Results</title>\n<style>\n");
    doc.push_str(STYLESHEET);
    doc.push_str("\n</style>\n</head>\n<body>\n");

    doc.push_str("<h1>Benefit Eligibility Results</h1>\n");

    if let Some(user) = user {
        if let Some(name) = &user.name {
            doc.push_str(&format!("<p>Prepared for: {}</p>\n", field(name)));
        }
        if let Some(state) = &user.state {
            doc.push_str(&format!("<p>State: {}</p>\n", field(state)));
        }
    }

    doc.push_str(&format!(
        "<p>Evaluated: {}</p>\n",
        results.evaluated_at.format("%B %-d, %Y")
    ));

    doc.push_str("<div class=\"summary\">\n");
    doc.push_str(&format!(
        "<p>{} programs evaluated: {} qualified, {} likely, {} need more information, {} not qualified.</p>\n",
        results.total_programs,
        results.qualified.len(),
        results.likely.len(),
        results.maybe.len(),
        results.not_qualified.len(),
    ));
    doc.push_str("</div>\n");

    push_partition(&mut doc, "Programs You Qualify For", &results.qualified);
    push_partition(&mut doc, "Programs You Likely Qualify For", &results.likely);
    push_partition(&mut doc, "Programs Needing More Information", &results.maybe);
    push_partition(&mut doc, "Programs You Do Not Qualify For", &results.not_qualified);

    doc.push_str("</body>\n</html>\n");
    doc
}

fn push_partition(doc: &mut String, heading: &str, programs: &[ProgramEligibilityResult]) {
    if programs.is_empty() {
        return;
    }

    doc.push_str(&format!("<h2>{}</h2>\n", heading));
    for program in programs {
        push_program(doc, program);
    }
}

fn push_program(doc: &mut String, program: &ProgramEligibilityResult) {
    doc.push_str("<div class=\"program\">\n");
    doc.push_str(&format!("<h3>{}</h3>\n", field(&program.program_name)));

    if !program.jurisdiction.is_empty() {
        doc.push_str(&format!(
            "<p class=\"jurisdiction\">{}</p>\n",
            field(&program.jurisdiction)
        ));
    }

    if !program.program_description.is_empty() {
        doc.push_str(&format!("<p>{}</p>\n", field(&program.program_description)));
    }

    if let Some(benefit) = &program.estimated_benefit {
        doc.push_str(&format!(
            "<p class=\"benefit\">Estimated benefit: ${:.2} {}</p>\n",
            benefit.amount,
            field(&benefit.frequency)
        ));
    }

    if !program.explanation.reason.is_empty() {
        doc.push_str(&format!("<p>Why: {}</p>\n", field(&program.explanation.reason)));
    }
    if !program.explanation.details.is_empty() {
        doc.push_str("<ul>\n");
        for detail in &program.explanation.details {
            doc.push_str(&format!("<li>{}</li>\n", field(detail)));
        }
        doc.push_str("</ul>\n");
    }

    if !program.required_documents.is_empty() {
        doc.push_str("<p>Required documents:</p>\n<ul>\n");
        for document in &program.required_documents {
            doc.push_str(&format!("<li>{}</li>\n", field(document)));
        }
        doc.push_str("</ul>\n");
    }

    if !program.next_steps.is_empty() {
        doc.push_str("<p>Next steps:</p>\n<ul>\n");
        for step in &program.next_steps {
            let text = field(&step.step);
            let safe_url = step.url.as_deref().map(sanitize_url).unwrap_or_default();
            if safe_url.is_empty() {
                doc.push_str(&format!("<li>{}</li>\n", text));
            } else {
                doc.push_str(&format!(
                    "<li><a href=\"{}\">{}</a></li>\n",
                    escape(&safe_url),
                    text
                ));
            }
        }
        doc.push_str("</ul>\n");
    }

    doc.push_str("</div>\n");
}

/// Sanitize then escape one interpolated field
fn field(raw: &str) -> String {
    escape(&sanitize_text(raw))
}

/// Minimal HTML escaping for text and attribute positions
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        EligibilityStatus, EstimatedBenefit, Explanation, NextStep, ProgramEligibilityResult,
    };
    use chrono::Utc;

    fn program(name: &str) -> ProgramEligibilityResult {
        ProgramEligibilityResult {
            program_id: "p1".into(),
            program_name: name.into(),
            program_description: "Food assistance".into(),
            jurisdiction: "CA".into(),
            status: EligibilityStatus::Qualified,
            confidence: "high".into(),
            confidence_score: 0.9,
            explanation: Explanation {
                reason: "income below threshold".into(),
                details: vec!["household of 3".into()],
                rules_cited: vec![],
            },
            estimated_benefit: Some(EstimatedBenefit {
                amount: 1234.56,
                frequency: "monthly".into(),
            }),
            required_documents: vec!["ID card".into()],
            next_steps: vec![NextStep {
                step: "apply online".into(),
                url: Some("https://benefits.gov/apply".into()),
            }],
            evaluated_at: Utc::now(),
            rules_version: "2025.1".into(),
        }
    }

    fn results_with(programs: Vec<ProgramEligibilityResult>) -> EligibilityResults {
        let total = programs.len();
        EligibilityResults {
            qualified: programs,
            likely: vec![],
            maybe: vec![],
            not_qualified: vec![],
            total_programs: total,
            evaluated_at: Utc::now(),
        }
    }

    #[test]
    fn test_document_contains_program_fields() {
        let results = results_with(vec![program("SNAP")]);
        let doc = build_document(&results, None);

        assert!(doc.contains("SNAP"));
        assert!(doc.contains("Food assistance"));
        assert!(doc.contains("$1234.56 monthly"));
        assert!(doc.contains("income below threshold"));
        assert!(doc.contains("ID card"));
        assert!(doc.contains("https://benefits.gov/apply"));
        assert!(doc.contains("<style>"));
    }

    #[test]
    fn test_javascript_url_never_rendered() {
        let mut p = program("SNAP");
        p.next_steps[0].url = Some("javascript:alert(1)".into());
        let results = results_with(vec![p]);

        let doc = build_document(&results, None);
        assert!(!doc.contains("javascript:"));
        assert!(doc.contains("apply online")); // step text still renders
    }

    #[test]
    fn test_markup_in_fields_neutralized() {
        let mut p = program("<script>alert(1)</script>SNAP");
        p.program_description = "<img src=x onerror=alert(1)>desc".into();
        let results = results_with(vec![p]);

        let doc = build_document(&results, None);
        assert!(!doc.contains("<script>"));
        assert!(!doc.contains("<img"));
        assert!(doc.contains("SNAP"));
        assert!(doc.contains("desc"));
    }

    #[test]
    fn test_user_info_rendered_and_escaped() {
        let results = results_with(vec![program("SNAP")]);
        let user = UserInfo {
            name: Some("Alex <admin>".into()),
            state: Some("CA".into()),
        };

        let doc = build_document(&results, Some(&user));
        assert!(doc.contains("Prepared for: Alex"));
        assert!(doc.contains("State: CA"));
        assert!(!doc.contains("<admin>"));
    }

    #[test]
    fn test_empty_results_still_builds() {
        let results = results_with(vec![]);
        let doc = build_document(&results, None);
        assert!(doc.contains("0 programs evaluated"));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_missing_optionals_render_best_effort() {
        let mut p = program("SNAP");
        p.estimated_benefit = None;
        p.required_documents.clear();
        p.next_steps.clear();
        p.program_description.clear();
        p.jurisdiction.clear();
        let results = results_with(vec![p]);

        let doc = build_document(&results, None);
        assert!(doc.contains("SNAP"));
        assert!(!doc.contains("Estimated benefit"));
        assert!(!doc.contains("Required documents"));
        assert!(!doc.contains("Next steps"));
    }

    #[test]
    fn test_pathological_input_does_not_break_document() {
        let long = "x".repeat(100_000);
        let mut p = program("");
        p.program_name = long.clone();
        p.explanation.reason = "emoji 🎉 and ünïcode".into();
        let results = results_with(vec![p]);

        let doc = build_document(&results, None);
        assert!(doc.contains(&long));
        assert!(doc.contains("ünïcode"));
    }
}
