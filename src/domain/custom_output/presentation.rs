//! Plain-text outline of a presentation custom step.

use crate::domain::journey::CustomStep;

use super::StepSources;

const NONE_PROVIDED: &str = "(none provided)";

/// Renders the fixed-section outline.
///
/// Sections, in order: Objective, Prompt, Source Documents,
/// Source Transcripts, Suggested Output.
pub fn render_outline(step: &CustomStep, sources: &StepSources) -> String {
    let objective = match step.description.as_deref() {
        Some(description) => format!("{}\n{}", step.title, description),
        None => step.title.clone(),
    };
    let suggested = format!(
        "A slide deck for \"{}\" built from {} document(s) and {} transcript(s), generated with {}.",
        step.title,
        sources.documents.len(),
        sources.transcripts.len(),
        step.model_id
    );

    [
        section("Objective", &objective),
        section("Prompt", step.prompt.as_deref().unwrap_or(NONE_PROVIDED)),
        section("Source Documents", &bullets(&sources.documents)),
        section("Source Transcripts", &bullets(&sources.transcripts)),
        section("Suggested Output", &suggested),
    ]
    .join("\n\n")
}

fn section(heading: &str, body: &str) -> String {
    format!("## {}\n{}", heading, body)
}

fn bullets(labels: &[String]) -> String {
    if labels.is_empty() {
        return NONE_PROVIDED.to_string();
    }
    labels
        .iter()
        .map(|label| format!("- {}", label))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::journey::{CustomStepDraft, OutputType};

    fn step() -> CustomStep {
        CustomStep::from_draft(
            CustomStepDraft::new("Board Readout", OutputType::Presentation)
                .with_description("Summarize the engagement")
                .with_prompt("Keep it to five slides"),
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let outline = render_outline(&step(), &StepSources::default());

        let headings: Vec<&str> = outline.lines().filter(|l| l.starts_with("## ")).collect();
        assert_eq!(
            headings,
            vec![
                "## Objective",
                "## Prompt",
                "## Source Documents",
                "## Source Transcripts",
                "## Suggested Output"
            ]
        );
    }

    #[test]
    fn sources_are_bulleted_and_empty_lists_marked() {
        let sources = StepSources {
            documents: vec!["kickoff.txt".to_string()],
            transcripts: vec![],
        };
        let outline = render_outline(&step(), &sources);

        assert!(outline.contains("## Source Documents\n- kickoff.txt"));
        assert!(outline.contains("## Source Transcripts\n(none provided)"));
        assert!(outline.contains("Summarize the engagement"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let s = step();
        assert_eq!(
            render_outline(&s, &StepSources::default()),
            render_outline(&s, &StepSources::default())
        );
    }
}
