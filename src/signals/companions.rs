//! `companion_extracted`: companion plugins a document does not mention

use super::{SignalEnv, TrackedDoc};

/// Companions from the layout that never appear in the document (case-insensitive)
pub(super) fn missing_companions(doc: &TrackedDoc, env: &SignalEnv<'_>) -> usize {
    let Some(content) = doc.read_text() else {
        return 0;
    };
    let content = content.to_lowercase();
    env.layout
        .companions
        .iter()
        .filter(|name| !content.contains(&name.to_lowercase()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::tests::ScriptedRunner;
    use crate::signals::ProjectLayout;

    fn eval(layout: &ProjectLayout, text: Option<&str>) -> usize {
        let dir = tempfile::tempdir().unwrap();
        let doc_path = dir.path().join("README.md");
        if let Some(t) = text {
            std::fs::write(&doc_path, t).unwrap();
        }
        let doc = TrackedDoc::inspect(&doc_path);
        let runner = ScriptedRunner::new();
        let env = SignalEnv {
            root: dir.path(),
            layout,
            runner: &runner,
        };
        missing_companions(&doc, &env)
    }

    fn layout_with(names: &[&str]) -> ProjectLayout {
        ProjectLayout {
            companions: names.iter().map(|s| s.to_string()).collect(),
            ..ProjectLayout::default()
        }
    }

    #[test]
    fn test_case_insensitive_match() {
        let layout = layout_with(&["interphase", "tldr-swinton", "tool-time"]);
        assert_eq!(eval(&layout, Some("Works with InterPhase and TLDR-Swinton.")), 1);
    }

    #[test]
    fn test_all_mentioned() {
        let layout = layout_with(&["interphase", "interline"]);
        assert_eq!(eval(&layout, Some("interphase, interline")), 0);
    }

    #[test]
    fn test_default_list_against_empty_doc() {
        let layout = ProjectLayout::default();
        assert_eq!(eval(&layout, Some("")), layout.companions.len());
    }

    #[test]
    fn test_missing_doc() {
        assert_eq!(eval(&ProjectLayout::default(), None), 0);
    }
}
