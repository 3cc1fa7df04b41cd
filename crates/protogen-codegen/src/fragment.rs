//! Indentation-aware source fragments
//!
//! Emission is recursive: the code for a list element is produced at a deeper
//! level than the loop wrapping it. A [`CodeFragment`] remembers the depth it
//! was produced at and stores its lines relative to that depth, so splicing
//! it into an outer fragment re-bases every line instead of re-parsing text.

/// One indentation level in generated code.
pub const INDENT: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    /// Levels relative to the owning fragment's depth.
    indent: usize,
    text: String,
}

/// Generated source text annotated with its indentation depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFragment {
    depth: usize,
    lines: Vec<Line>,
}

impl CodeFragment {
    /// Empty fragment produced at `depth`.
    pub fn at(depth: usize) -> Self {
        Self {
            depth,
            lines: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Append a line at the fragment's own depth.
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.indented(0, text)
    }

    /// Append a line `indent` levels deeper than the fragment's depth.
    pub fn indented(&mut self, indent: usize, text: impl Into<String>) -> &mut Self {
        self.lines.push(Line {
            indent,
            text: text.into(),
        });
        self
    }

    /// Splice another fragment in, keeping its absolute indentation.
    ///
    /// A fragment produced shallower than `self` is clamped to `self`'s depth.
    pub fn append(&mut self, other: CodeFragment) -> &mut Self {
        let shift = other.depth.saturating_sub(self.depth);
        self.lines.extend(other.lines.into_iter().map(|line| Line {
            indent: line.indent + shift,
            text: line.text,
        }));
        self
    }

    /// Move the fragment to another depth, keeping relative structure.
    pub fn reindent(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Render with absolute indentation, one `\n`-terminated line each.
    ///
    /// Blank lines carry no indentation.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if !line.text.is_empty() {
                out.push_str(&INDENT.repeat(self.depth + line.indent));
                out.push_str(&line.text);
            }
            out.push('\n');
        }
        out
    }

    /// Lines with indentation stripped, in order.
    pub fn statements(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|line| line.text.as_str())
    }
}

/// Render free text as line comments.
///
/// Lines already starting with `//` are kept as they are. Every other line is
/// prefixed with `// `, so block markers in the text cannot open a comment
/// that swallows generated code. Blank lines are dropped.
pub fn comment_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            if line.starts_with("//") {
                line.to_string()
            } else {
                format!("// {line}")
            }
        })
        .collect()
}
