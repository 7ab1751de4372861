//! Table formatting utilities for terminal output.
//!
//! Provides pipe-delimited tables whose columns are sized by Unicode display
//! width, so emoji and CJK cells stay aligned.

use unicode_width::UnicodeWidthStr;

/// Pads a string with spaces to the specified display width. Cells already
/// at least that wide are returned unchanged.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(padding))
}

fn cell<S: AsRef<str>>(row: &[S], i: usize) -> &str {
    row.get(i).map_or("", |c| c.as_ref())
}

/// Renders `rows` under `headers` as a pipe table:
///
/// ```text
/// | Run ID | Status    |
/// |--------|-----------|
/// | 42     | completed |
/// ```
///
/// Rows shorter than the header are padded with empty cells. Cells are never
/// truncated, so run URLs stay usable.
pub fn render_table<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .map(|row| cell(row, i).width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let format_row = |cells: Vec<&str>| {
        let inner: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!(" {} ", pad_to_width(c, *w)))
            .collect();
        format!("|{}|", inner.join("|"))
    };

    let separator = format!(
        "|{}|",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("|")
    );

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers.to_vec()));
    lines.push(separator);
    for row in rows {
        lines.push(format_row(
            (0..headers.len()).map(|i| cell(row, i)).collect(),
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use rstest::rstest;

    #[rstest]
    #[case::short("hello", 10, "hello     ")]
    #[case::exact("hello", 5, "hello")]
    #[case::wider_than_width("hello world", 5, "hello world")]
    #[case::cjk("日本語", 8, "日本語  ")]
    fn test_pad_to_width(#[case] input: &str, #[case] width: usize, #[case] expected: &str) {
        assert_eq!(pad_to_width(input, width), expected);
    }

    #[test]
    fn render_table_sizes_columns_to_widest_cell() {
        let rows = vec![
            vec!["42", "completed"],
            vec!["1234567", "queued"],
        ];

        let table = render_table(&["Run ID", "Status"], &rows);

        assert_eq!(
            table,
            indoc! {"
                | Run ID  | Status    |
                |---------|-----------|
                | 42      | completed |
                | 1234567 | queued    |"}
        );
    }

    #[test]
    fn render_table_pads_short_rows() {
        let rows = vec![vec!["only".to_string()]];

        let table = render_table(&["A", "B"], &rows);

        assert_eq!(
            table,
            indoc! {"
                | A    | B |
                |------|---|
                | only |   |"}
        );
    }

    #[test]
    fn render_table_keeps_long_urls_intact() {
        let url = "https://github.com/acme/dashboard/actions/runs/1234567890/attempts/2";
        let rows = vec![vec!["CI", url]];

        let table = render_table(&["Workflow", "URL"], &rows);
        let last = table.lines().last().unwrap();

        assert_eq!(last, format!("| CI       | {url} |"));
    }

    #[test]
    fn render_table_without_rows_has_header_only() {
        let rows: Vec<Vec<String>> = vec![];
        assert_eq!(
            render_table(&["Name"], &rows),
            "| Name |\n|------|"
        );
    }
}
