//! Ordered-section model for the checkpoint document.
//!
//! The checkpoint is markdown with `## ` section headings. Humans edit it
//! by hand between invocations, so updates must be surgical: the document
//! is parsed into an ordered list of raw segments (preamble, sections,
//! epilogue), the targeted section's body is swapped out, and the whole
//! list is re-rendered. Untouched segments round-trip byte-for-byte —
//! there is no pattern substitution over arbitrary text.

/// Canonical section order for the managed sections. Hand-added sections
/// keep their position; a missing managed section is re-inserted at its
/// canonical slot relative to the managed sections that still exist.
pub const KNOWN_SECTIONS: [&str; 6] = [
    "Session Information",
    "Phase Progress",
    "Active Context",
    "Completed Milestones",
    "Next Actions",
    "Open Blockers",
];

/// One `## `-headed section: the raw heading line and the raw body up to
/// the next heading (or the epilogue rule).
#[derive(Debug, Clone)]
struct Section {
    /// Heading text without the `## ` marker or trailing newline.
    title: String,
    /// Raw heading line, newline included.
    heading: String,
    /// Raw body text, newlines included.
    body: String,
}

/// A parsed checkpoint document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Everything before the first `## ` heading.
    preamble: String,
    sections: Vec<Section>,
    /// Everything from the first standalone `---` rule after the
    /// sections to end of file (the managed-file footer).
    epilogue: String,
}

impl Document {
    /// Parse raw document text. Never fails: any text decomposes into
    /// preamble, zero or more sections, and an optional epilogue.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut preamble = String::new();
        let mut sections: Vec<Section> = Vec::new();
        let mut epilogue = String::new();
        let mut in_epilogue = false;

        for line in raw.split_inclusive('\n') {
            if in_epilogue {
                epilogue.push_str(line);
            } else if !sections.is_empty() && line.trim_end() == "---" {
                in_epilogue = true;
                epilogue.push_str(line);
            } else if let Some(rest) = line.strip_prefix("## ") {
                sections.push(Section {
                    title: rest.trim_end().to_string(),
                    heading: line.to_string(),
                    body: String::new(),
                });
            } else if let Some(section) = sections.last_mut() {
                section.body.push_str(line);
            } else {
                preamble.push_str(line);
            }
        }

        Self {
            preamble,
            sections,
            epilogue,
        }
    }

    /// Re-render the document in original segment order.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(
            self.preamble.len() + self.epilogue.len() + self.sections.len() * 64,
        );
        out.push_str(&self.preamble);
        for section in &self.sections {
            out.push_str(&section.heading);
            out.push_str(&section.body);
        }
        out.push_str(&self.epilogue);
        out
    }

    /// Raw body of a section, if present.
    #[must_use]
    pub fn section(&self, title: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.title == title)
            .map(|s| s.body.as_str())
    }

    /// Replace a section's body with `content` (canonical spacing: one
    /// blank line before the next heading). The section is created at
    /// its canonical position if missing.
    pub fn set_section(&mut self, title: &str, content: &str) {
        let body = if content.is_empty() {
            "\n".to_string()
        } else {
            format!("{content}\n\n")
        };
        let idx = self.ensure_section(title);
        self.sections[idx].body = body;
    }

    /// Replace the value of a `- **Key**: value` line inside a section,
    /// leaving every other line of the section untouched. The line is
    /// appended to the section's key block if missing.
    pub fn set_key_line(&mut self, title: &str, key: &str, value: &str) {
        let idx = self.ensure_section(title);
        let section = &mut self.sections[idx];
        let prefix = format!("- **{key}**:");
        let replacement = format!("- **{key}**: {value}\n");

        let mut rebuilt = String::with_capacity(section.body.len() + replacement.len());
        let mut replaced = false;
        for line in section.body.split_inclusive('\n') {
            if !replaced && line.starts_with(&prefix) {
                rebuilt.push_str(&replacement);
                replaced = true;
            } else {
                rebuilt.push_str(line);
            }
        }

        if !replaced {
            // Append after the last key line, before trailing blank lines.
            let mut insert_at = rebuilt.len();
            let trailing: usize = rebuilt
                .split_inclusive('\n')
                .rev()
                .take_while(|l| l.trim().is_empty())
                .map(str::len)
                .sum();
            insert_at -= trailing;
            rebuilt.insert_str(insert_at, &replacement);
        }

        section.body = rebuilt;
    }

    /// Value of a `- **Key**: value` line inside a section.
    #[must_use]
    pub fn key_line(&self, title: &str, key: &str) -> Option<&str> {
        let prefix = format!("- **{key}**:");
        self.section(title)?
            .lines()
            .find_map(|line| line.strip_prefix(prefix.as_str()))
            .map(str::trim)
    }

    /// Index of the named section, inserting an empty one at its
    /// canonical position when absent.
    fn ensure_section(&mut self, title: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.title == title) {
            return idx;
        }

        // Insert before the first known section that canonically follows
        // this one; otherwise append.
        let canon = KNOWN_SECTIONS.iter().position(|s| *s == title);
        let insert_at = canon
            .and_then(|rank| {
                self.sections.iter().position(|s| {
                    KNOWN_SECTIONS
                        .iter()
                        .position(|k| *k == s.title)
                        .is_some_and(|r| r > rank)
                })
            })
            .unwrap_or(self.sections.len());

        self.sections.insert(
            insert_at,
            Section {
                title: title.to_string(),
                heading: format!("## {title}\n"),
                body: "\n".to_string(),
            },
        );
        insert_at
    }
}
