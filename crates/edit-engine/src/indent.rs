//! Indentation utilities.
//!
//! Pure text transforms: computing auto-indent for a new line, adjusting for
//! closing braces, line-wise indent/outdent, and tab conversion. No document
//! state is involved; everything is string in, string out.

/// Indentation configuration and transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentEngine {
    use_tabs: bool,
    tab_width: usize,
}

impl IndentEngine {
    /// An engine indenting with `tab_width` spaces.
    pub fn spaces(tab_width: usize) -> Self {
        Self {
            use_tabs: false,
            tab_width,
        }
    }

    /// An engine indenting with tab characters (`tab_width` used for space
    /// runs on outdent and tab conversion).
    pub fn tabs(tab_width: usize) -> Self {
        Self {
            use_tabs: true,
            tab_width,
        }
    }

    /// One indentation unit: a tab, or `tab_width` spaces.
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            String::from("\t")
        } else {
            " ".repeat(self.tab_width)
        }
    }

    /// The indentation for a line following `previous_line`: the previous
    /// line's leading whitespace, plus one unit if its trimmed content ends
    /// in an opening bracket.
    pub fn calculate_indent(&self, previous_line: &str) -> String {
        let mut indent: String = previous_line
            .chars()
            .take_while(|&ch| ch == ' ' || ch == '\t')
            .collect();
        let trimmed = previous_line.trim_end();
        if trimmed.ends_with(['{', '(', '[']) {
            indent.push_str(&self.indent_unit());
        }
        indent
    }

    /// Remove one indent unit from `current_indent` if `line_content` starts
    /// (after leading whitespace) with a closing bracket.
    pub fn adjust_indent_for_closing(&self, line_content: &str, current_indent: &str) -> String {
        if !line_content.trim_start().starts_with(['}', ')', ']']) {
            return current_indent.to_string();
        }
        Self::strip_one_unit(current_indent, self.tab_width)
    }

    /// Prepend one indent unit to every non-empty line.
    pub fn indent(&self, text: &str) -> String {
        let unit = self.indent_unit();
        text.split('\n')
            .map(|line| {
                if line.is_empty() {
                    line.to_string()
                } else {
                    format!("{unit}{line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Remove one indent unit from every line: a leading tab, or up to
    /// `tab_width` leading spaces.
    pub fn outdent(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| Self::strip_one_leading_unit(line, self.tab_width))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace every tab character with `tab_width` spaces.
    pub fn convert_tabs_to_spaces(&self, text: &str) -> String {
        text.replace('\t', &" ".repeat(self.tab_width))
    }

    fn strip_one_leading_unit(line: &str, tab_width: usize) -> String {
        if let Some(rest) = line.strip_prefix('\t') {
            return rest.to_string();
        }
        let spaces = line
            .chars()
            .take_while(|&ch| ch == ' ')
            .count()
            .min(tab_width);
        line[spaces..].to_string()
    }

    fn strip_one_unit(indent: &str, tab_width: usize) -> String {
        if let Some(rest) = indent.strip_suffix('\t') {
            return rest.to_string();
        }
        let trailing = indent
            .chars()
            .rev()
            .take_while(|&ch| ch == ' ')
            .count()
            .min(tab_width);
        indent[..indent.len() - trailing].to_string()
    }
}

impl Default for IndentEngine {
    fn default() -> Self {
        Self::spaces(4)
    }
}
