use crate::span::LineIndex;

/// Plain-text rendering of a single diagnostic: file, 1-based line/column,
/// the offending line's content, and the message.
///
/// This is the library-internal rendering utility; richer terminal output
/// (with underlines and color) is a concern of the `unholyc` driver, which
/// layers `ariadne` on top of the same file/pos/message inputs.
pub fn render(file_name: &str, source: &str, pos: u32, message: &str) -> String {
    let index = LineIndex::new(source);
    let (line, column) = index.line_col(pos);
    let line_content = index.line_content(source, pos);
    format!("{file_name}:{line}:{column}: {message}\n{line_content}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_file_line_column_and_offending_line() {
        let source = "let x: int = 1;\nlet while = 2;\n";
        let rendered = render("main.unholy", source, 21, "\"while\" is a reserved keyword");
        assert_eq!(
            rendered,
            "main.unholy:2:5: \"while\" is a reserved keyword\nlet while = 2;"
        );
    }
}
