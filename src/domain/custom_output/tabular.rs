//! Two-column CSV export of a tabular custom step.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::journey::CustomStep;

use super::StepSources;

const LIST_SEPARATOR: &str = "; ";

/// Renders the step as `"Field","Value"` rows.
///
/// Every value is double-quoted with embedded quotes doubled. Each row,
/// including the last, ends with `\n`.
pub fn render_csv(step: &CustomStep, sources: &StepSources) -> Result<String, DomainError> {
    let rows: [(&str, String); 7] = [
        ("Title", step.title.clone()),
        ("Description", step.description.clone().unwrap_or_default()),
        ("Model", step.model_id.clone()),
        ("Output Type", step.output_type().display_name().to_string()),
        ("Prompt", step.prompt.clone().unwrap_or_default()),
        ("Documents", sources.documents.join(LIST_SEPARATOR)),
        ("Transcripts", sources.transcripts.join(LIST_SEPARATOR)),
    ];

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(["Field", "Value"]).map_err(csv_failed)?;
    for (field, value) in &rows {
        writer.write_record([*field, value.as_str()]).map_err(csv_failed)?;
    }

    let bytes = writer.into_inner().map_err(|err| csv_failed(err.into_error()))?;
    String::from_utf8(bytes).map_err(csv_failed)
}

fn csv_failed(err: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::InternalError, format!("CSV rendering failed: {}", err))
}

/// File name offered for the export.
pub fn csv_file_name(step: &CustomStep) -> String {
    let slug: String = step
        .title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "custom-step.csv".to_string()
    } else {
        format!("{}.csv", slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::journey::{CustomStepDraft, OutputType};

    fn risk_review() -> CustomStep {
        CustomStep::from_draft(
            CustomStepDraft::new("Risk Review", OutputType::Tabular).with_model("model-x"),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn risk_review_exports_exact_rows() {
        let csv = render_csv(&risk_review(), &StepSources::default()).unwrap();

        let expected = [
            r#""Field","Value""#,
            r#""Title","Risk Review""#,
            r#""Description","""#,
            r#""Model","model-x""#,
            r#""Output Type","Tabular""#,
            r#""Prompt","""#,
            r#""Documents","""#,
            r#""Transcripts","""#,
            "",
        ]
        .join("\n");
        assert_eq!(csv, expected);
    }

    #[test]
    fn quotes_are_doubled_and_lists_joined() {
        let mut step = risk_review();
        step.prompt = Some(r#"Rate each "critical" risk"#.to_string());
        let sources = StepSources {
            documents: vec!["a.txt".to_string(), "b.txt".to_string()],
            transcripts: vec!["AP sync".to_string()],
        };

        let csv = render_csv(&step, &sources).unwrap();

        assert!(csv.contains(r#""Prompt","Rate each ""critical"" risk""#));
        assert!(csv.contains(r#""Documents","a.txt; b.txt""#));
        assert!(csv.contains(r#""Transcripts","AP sync""#));
    }

    #[test]
    fn file_name_is_slugged() {
        assert_eq!(csv_file_name(&risk_review()), "risk-review.csv");
    }
}
