//! Indented text output for generated files.

pub(crate) struct SourceWriter {
    output: String,
    indent_level: usize,
    indent_str: &'static str,
}

impl SourceWriter {
    pub(crate) fn new() -> Self {
        SourceWriter {
            output: String::new(),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    pub(crate) fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub(crate) fn write_line(&mut self) {
        self.output.push('\n');
    }

    pub(crate) fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    /// Indentation, `text`, newline.
    pub(crate) fn write_indented_line(&mut self, text: &str) {
        self.write_indent();
        self.write(text);
        self.write_line();
    }

    pub(crate) fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) fn decrease_indent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub(crate) fn into_output(self) -> String {
        self.output
    }
}
