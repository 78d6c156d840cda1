//! Ordinal-addressed checkbox toggling
//!
//! The rendered view reports a clicked checkbox by its zero-based position
//! among all task-list checkboxes on the page. The same position is recovered
//! here by parsing the note's raw text with the renderer's own parser options
//! and counting task list markers in document order, so code blocks, HTML
//! and lines that cannot start a list never produce a token.
//!
//! When the position is past the last token the text is left alone; the view
//! is stale and the next render reconciles it.

use crate::error::NoteResult;
use crate::markdown::cmark_options;
use crate::note::Note;
use pulldown_cmark::{Event, Parser};
use std::ops::Range;

/// A checkable list item marker in raw note text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoToken {
    /// Zero-based position in document order
    pub ordinal: usize,
    /// Byte range of the marker as reported by the parser, e.g. `[ ]`
    pub range: Range<usize>,
    /// Byte range of the state character between the brackets
    pub state: Range<usize>,
    pub checked: bool,
}

/// Result of a toggle request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The token was flipped and the note saved
    Toggled { ordinal: usize, checked: bool },
    /// No token at that position; nothing changed
    OutOfRange { ordinal: usize, found: usize },
}

/// Byte range of the state character inside a task marker span
fn state_range(text: &str, marker: &Range<usize>) -> Option<Range<usize>> {
    let span = text.get(marker.clone())?;
    let open = span.find('[')?;
    let state_start = marker.start + open + 1;
    let state_char = text.get(state_start..)?.chars().next()?;
    let state_end = state_start + state_char.len_utf8();

    text.get(state_end..)?
        .starts_with(']')
        .then_some(state_start..state_end)
}

/// Every todo token in `text`, in document order
pub fn scan_todos(text: &str) -> Vec<TodoToken> {
    let mut tokens = Vec::new();

    for (event, range) in Parser::new_ext(text, cmark_options()).into_offset_iter() {
        let Event::TaskListMarker(checked) = event else {
            continue;
        };
        let Some(state) = state_range(text, &range) else {
            log::warn!("Task marker at {:?} has no state character", range);
            continue;
        };

        tokens.push(TodoToken {
            ordinal: tokens.len(),
            range,
            state,
            checked,
        });
    }

    tokens
}

/// Parse a checkbox channel payload into an ordinal
pub fn parse_ordinal(payload: &str) -> Option<usize> {
    payload.trim().parse().ok()
}

/// Flip the todo token at `ordinal` and persist the note
///
/// Returns [`ToggleOutcome::OutOfRange`] without touching the note when
/// the text has fewer tokens than the view reported.
pub fn toggle(note: &mut dyn Note, ordinal: usize) -> NoteResult<ToggleOutcome> {
    let text = note.raw_text();
    let tokens = scan_todos(&text);

    let Some(token) = tokens.get(ordinal) else {
        log::debug!(
            "Checkbox {} not found ({} in note {}), view is stale",
            ordinal,
            tokens.len(),
            note.id()
        );
        return Ok(ToggleOutcome::OutOfRange {
            ordinal,
            found: tokens.len(),
        });
    };

    let checked = !token.checked;
    let marker = if checked { "x" } else { " " };
    note.replace_range(token.state.clone(), marker)?;
    note.save()?;

    log::debug!("Checkbox {} in note {} set to {}", ordinal, note.id(), checked);
    Ok(ToggleOutcome::Toggled { ordinal, checked })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{CmarkRenderer, MarkdownRenderer};
    use crate::note::{splice, NoteId};
    use std::path::PathBuf;

    #[derive(Default)]
    struct MemoryNote {
        text: String,
        saves: usize,
    }

    impl Note for MemoryNote {
        fn id(&self) -> NoteId {
            NoteId("memory".to_string())
        }
        fn title(&self) -> String {
            "Memory".to_string()
        }
        fn content(&self) -> String {
            self.text.clone()
        }
        fn raw_text(&self) -> String {
            self.text.clone()
        }
        fn asset_root(&self) -> PathBuf {
            PathBuf::from(".")
        }
        fn replace_range(&mut self, range: Range<usize>, text: &str) -> NoteResult<()> {
            splice(&mut self.text, range, text)
        }
        fn save(&mut self) -> NoteResult<()> {
            self.saves += 1;
            Ok(())
        }
    }

    fn note(text: &str) -> MemoryNote {
        MemoryNote {
            text: text.to_string(),
            saves: 0,
        }
    }

    fn rendered_checkboxes(text: &str) -> usize {
        CmarkRenderer::new()
            .render(text)
            .matches("type=\"checkbox\"")
            .count()
    }

    #[test]
    fn test_scan_todos_in_order() {
        let text = "- [ ] a\n- [x] b\n\n* [X] c\n\n1. [ ] d\n";
        let tokens = scan_todos(text);
        assert_eq!(tokens.len(), 4);
        assert!(!tokens[0].checked);
        assert!(tokens[1].checked);
        assert!(tokens[2].checked);
        assert_eq!(tokens[3].ordinal, 3);
        assert_eq!(&text[tokens[1].state.clone()], "x");
    }

    #[test]
    fn test_scan_skips_fenced_code_and_inline_text() {
        let text = "- [ ] real\n\n```\n- [ ] code\n```\n\nsay - [ ] inline\n\n- [x] last";
        let tokens = scan_todos(text);
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].checked);
    }

    #[test]
    fn test_scan_agrees_with_rendered_checkboxes() {
        let cases = [
            "```\n~~~\n- [ ] in code\n```\n- [ ] real\n",
            "para\n2. [ ] not a list\n\n- [ ] real\n",
            "    - [ ] indented code\n\n- [ ] real\n",
            "<!-- - [ ] hidden -->\n\n- [ ] real\n",
            "> - [x] quoted\n\n- [ ] a\n  - [ ] nested\n",
        ];
        for text in cases {
            assert_eq!(scan_todos(text).len(), rendered_checkboxes(text), "{:?}", text);
        }
    }

    #[test]
    fn test_toggle_ignores_tasks_in_nested_fence() {
        let mut n = note("```\n~~~\n- [ ] in code\n```\n- [ ] real\n");
        let outcome = toggle(&mut n, 0).unwrap();

        assert_eq!(outcome, ToggleOutcome::Toggled { ordinal: 0, checked: true });
        assert_eq!(n.text, "```\n~~~\n- [ ] in code\n```\n- [x] real\n");
        assert_eq!(toggle(&mut n, 1).unwrap(), ToggleOutcome::OutOfRange { ordinal: 1, found: 1 });
    }

    #[test]
    fn test_marker_needs_list_item() {
        assert!(scan_todos("[ ] not in a list").is_empty());
        assert!(scan_todos("-[ ] x").is_empty());
    }

    #[test]
    fn test_toggle_middle_token() {
        let mut n = note("- [ ] one\n- [ ] two\n- [x] three\n");
        let outcome = toggle(&mut n, 1).unwrap();

        assert_eq!(outcome, ToggleOutcome::Toggled { ordinal: 1, checked: true });
        assert_eq!(n.text, "- [ ] one\n- [x] two\n- [x] three\n");
        assert_eq!(n.saves, 1);
    }

    #[test]
    fn test_toggle_unchecks() {
        let mut n = note("- [X] done");
        toggle(&mut n, 0).unwrap();
        assert_eq!(n.text, "- [ ] done");
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let mut n = note("- [ ] one\n- [ ] two\n- [x] three\n");
        let outcome = toggle(&mut n, 5).unwrap();

        assert_eq!(outcome, ToggleOutcome::OutOfRange { ordinal: 5, found: 3 });
        assert_eq!(n.text, "- [ ] one\n- [ ] two\n- [x] three\n");
        assert_eq!(n.saves, 0);
    }

    #[test]
    fn test_parse_ordinal() {
        assert_eq!(parse_ordinal("2"), Some(2));
        assert_eq!(parse_ordinal(" 7\n"), Some(7));
        assert_eq!(parse_ordinal("-1"), None);
        assert_eq!(parse_ordinal("two"), None);
    }

    #[test]
    fn test_multibyte_text_offsets() {
        let mut n = note("# Список\n- [ ] молоко\n- [ ] хлеб\n");
        toggle(&mut n, 1).unwrap();
        assert_eq!(n.text, "# Список\n- [ ] молоко\n- [x] хлеб\n");
    }
}
