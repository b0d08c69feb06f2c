//! Line-oriented patching of YAML documents.
//!
//! A document is split into segments: top-level key blocks (the `key:` line
//! plus its indented or `- ` prefixed continuation lines) and verbatim lines
//! (comments, document markers, blank separators). Keys may be plain or
//! quoted. Replacing a block swaps
//! exactly those lines; every other byte of the input is reproduced as-is.

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Verbatim(String),
    Block { key: String, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    segments: Vec<Segment>,
    eol: &'static str,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.split_inclusive('\n').collect();
        let eol = if lines.first().is_some_and(|l| l.ends_with("\r\n")) {
            "\r\n"
        } else {
            "\n"
        };

        let mut segments = Vec::new();
        let mut i = 0;
        while i < lines.len() {
            let Some(key) = block_key(lines[i]) else {
                segments.push(Segment::Verbatim(lines[i].to_string()));
                i += 1;
                continue;
            };

            // blank and comment lines only belong to the block when more
            // continuation follows
            let mut end = i + 1;
            let mut scan = i + 1;
            while scan < lines.len() {
                if is_blank(lines[scan]) || is_comment(lines[scan]) {
                    scan += 1;
                } else if is_continuation(lines[scan]) {
                    scan += 1;
                    end = scan;
                } else {
                    break;
                }
            }

            segments.push(Segment::Block {
                key,
                text: lines[i..end].concat(),
            });
            i = end;
        }

        Self { segments, eol }
    }

    /// Replaces the first block for `key` with `lines`, appending a new block
    /// at the end when the key is absent.
    pub fn set(&mut self, key: &str, lines: &[String]) {
        let eol = self.eol;
        let existing = self.segments.iter_mut().find_map(|s| match s {
            Segment::Block { key: k, text } if k.as_str() == key => Some(text),
            _ => None,
        });

        match existing {
            Some(text) => {
                let terminated = text.ends_with('\n');
                let mut joined = lines.join(eol);
                if terminated {
                    joined.push_str(eol);
                }
                *text = joined;
            }
            None => {
                if let Some(last) = self.segments.last_mut() {
                    let tail = match last {
                        Segment::Verbatim(text) | Segment::Block { text, .. } => text,
                    };
                    if !tail.ends_with('\n') {
                        tail.push_str(eol);
                    }
                }
                let mut joined = lines.join(eol);
                joined.push_str(eol);
                self.segments.push(Segment::Block {
                    key: key.to_string(),
                    text: joined,
                });
            }
        }
    }

    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Verbatim(text) | Segment::Block { text, .. } => text.as_str(),
            })
            .collect()
    }
}

/// Applies `changes` (key, replacement lines) to `text`.
pub fn patch(text: &str, changes: &[(&str, Vec<String>)]) -> String {
    let mut doc = Document::parse(text);
    for (key, lines) in changes {
        doc.set(key, lines);
    }
    doc.render()
}

fn strip_eol(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

fn is_blank(line: &str) -> bool {
    strip_eol(line).trim().is_empty()
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}

fn is_continuation(line: &str) -> bool {
    let content = strip_eol(line);
    content.starts_with([' ', '\t']) || content == "-" || content.starts_with("- ")
}

fn block_key(line: &str) -> Option<String> {
    let content = strip_eol(line);
    let (key, rest) = match content.chars().next()? {
        quote @ ('"' | '\'') => {
            let close = content[1..].find(quote)? + 1;
            let key = &content[1..close];
            // escapes would need unquoting; such keys stay verbatim
            if key.contains('\\') || key.is_empty() {
                return None;
            }
            (key, content[close + 1..].strip_prefix(':')?)
        }
        _ => {
            let colon = content.find(':')?;
            let key = &content[..colon];
            let valid = !key.is_empty()
                && !key.starts_with('-')
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !valid {
                return None;
            }
            (key, &content[colon + 1..])
        }
    };
    (rest.is_empty() || rest.starts_with([' ', '\t'])).then(|| key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# reviewed by hand
question: What does `move` do?
answer: Transfers ownership
wrong_answers:
- Copies the value
-   Borrows it

- Nothing
explanation: |
  The closure takes ownership.

  Captured values are moved.

reviewed: false
";

    fn keys(doc: &Document) -> Vec<&str> {
        doc.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Block { key, .. } => Some(key.as_str()),
                Segment::Verbatim(_) => None,
            })
            .collect()
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_untouched_document_is_identical() {
        assert_eq!(Document::parse(SAMPLE).render(), SAMPLE);
        let crlf = SAMPLE.replace('\n', "\r\n");
        assert_eq!(Document::parse(&crlf).render(), crlf);
        assert_eq!(Document::parse("a: 1").render(), "a: 1");
    }

    #[test]
    fn test_blocks_are_detected() {
        let doc = Document::parse(SAMPLE);
        assert_eq!(
            keys(&doc),
            vec!["question", "answer", "wrong_answers", "explanation", "reviewed"]
        );
    }

    #[test]
    fn test_only_reviewed_line_changes() {
        let out = patch(SAMPLE, &[("reviewed", lines(&["reviewed: true"]))]);
        let before: Vec<&str> = SAMPLE.lines().collect();
        let after: Vec<&str> = out.lines().collect();
        assert_eq!(before.len(), after.len());
        let diffs: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
        assert_eq!(diffs, vec![before.len() - 1]);
        assert_eq!(after[diffs[0]], "reviewed: true");
    }

    #[test]
    fn test_list_block_is_replaced_whole() {
        let out = patch(SAMPLE, &[("wrong_answers", lines(&["wrong_answers: []"]))]);
        let value: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["wrong_answers"], serde_yaml::Value::Sequence(vec![]));
        assert!(!out.contains("Copies the value"));
        assert!(out.contains("explanation: |\n  The closure takes ownership.\n"));
    }

    #[test]
    fn test_multiline_scalar_block_is_replaced_whole() {
        let out = patch(SAMPLE, &[("explanation", lines(&["explanation: short"]))]);
        assert!(!out.contains("Captured values"));
        // the blank separator after the block survives
        assert!(out.contains("explanation: short\n\nreviewed: false\n"));
    }

    #[test]
    fn test_missing_key_is_appended() {
        let out = patch("question: q", &[("tags", lines(&["tags:", "- intro"]))]);
        assert_eq!(out, "question: q\ntags:\n- intro\n");
    }

    #[test]
    fn test_unterminated_last_block_stays_unterminated() {
        let out = patch("a: 1\nb: 2", &[("b", lines(&["b: 3"]))]);
        assert_eq!(out, "a: 1\nb: 3");
    }

    #[test]
    fn test_quoted_keys_are_blocks() {
        let text = "\"question\": q\n'reviewed': false\n\"odd\\\"key\": 1\n";
        let doc = Document::parse(text);
        assert_eq!(keys(&doc), vec!["question", "reviewed"]);

        let out = patch(text, &[("reviewed", lines(&["reviewed: true"]))]);
        assert_eq!(out, "\"question\": q\nreviewed: true\n\"odd\\\"key\": 1\n");
        let value: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["reviewed"], serde_yaml::Value::Bool(true));
    }

    #[test]
    fn test_comment_inside_list_stays_in_block() {
        let text = "tags:\n# imported\n- intro\n- basics\n# trailing note\nreviewed: false\n";
        let out = patch(text, &[("tags", lines(&["tags: []"]))]);
        assert_eq!(out, "tags: []\n# trailing note\nreviewed: false\n");
        let value: serde_yaml::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(value["tags"], serde_yaml::Value::Sequence(vec![]));
    }

    #[test]
    fn test_nested_keys_are_not_blocks() {
        let doc = Document::parse("meta:\n  id: 1\n  tags: [x]\nother: y\n");
        assert_eq!(keys(&doc), vec!["meta", "other"]);
    }
}
