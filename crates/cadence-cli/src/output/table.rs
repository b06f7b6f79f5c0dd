#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_WIDTH: usize = 4;

/// Render an aligned, left-justified table. Cells wider than their column
/// are cut with an ellipsis.
#[must_use]
pub fn render(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(MIN_WIDTH)
                .max(MIN_WIDTH)
        })
        .collect::<Vec<_>>();
    shrink_to(&mut widths, options.max_width);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    let header_cells = headers.iter().map(|h| (*h).to_string()).collect::<Vec<_>>();
    lines.push(render_row(&header_cells, &widths, false));
    lines.push("-".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    for row in rows {
        lines.push(render_row(row, &widths, options.color));
    }
    lines.join("\n")
}

fn render_row(cells: &[String], widths: &[usize], color: bool) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(index, width)| {
            let text = fit(cells.get(index).map_or("-", String::as_str), *width);
            let pad = " ".repeat(width - text.chars().count());
            if color {
                format!("{}{pad}", colorize(&text))
            } else {
                format!("{text}{pad}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Narrow the widest column one character at a time until the table fits.
fn shrink_to(widths: &mut [usize], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };
    let separators = 2 * widths.len().saturating_sub(1);
    while widths.iter().sum::<usize>() + separators > max_width {
        let Some((index, _)) = widths
            .iter()
            .enumerate()
            .filter(|(_, width)| **width > MIN_WIDTH)
            .max_by_key(|(_, width)| **width)
        else {
            break;
        };
        widths[index] -= 1;
    }
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out = text.chars().take(width.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

/// Day statuses and booleans get a color; everything else is plain.
fn colorize(text: &str) -> String {
    let code = match text {
        "completed" | "true" => "32",
        "current" | "paused" => "33",
        "locked" | "false" | "dropped" => "90",
        _ => return text.to_string(),
    };
    format!("\u{1b}[{code}m{text}\u{1b}[0m")
}

#[cfg(test)]
mod tests {
    use super::{TableOptions, render};

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    #[test]
    fn columns_align_across_rows() {
        let rows = vec![
            vec!["1".to_string(), "completed".to_string()],
            vec!["12".to_string(), "locked".to_string()],
        ];
        let table = render(&["day", "status"], &rows, PLAIN);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].chars().all(|c| c == '-'));
        let status_col = lines[0].find("status").expect("status header");
        assert_eq!(lines[2].find("completed"), Some(status_col));
        assert_eq!(lines[3].find("locked"), Some(status_col));
    }

    #[test]
    fn long_cells_are_truncated_to_fit() {
        let rows = vec![vec!["a".repeat(60), "b".to_string()]];
        let table = render(
            &["title", "x"],
            &rows,
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        assert!(table.lines().all(|line| line.chars().count() <= 40));
        assert!(table.contains('…'));
    }

    #[test]
    fn colored_statuses_keep_alignment() {
        let rows = vec![vec!["current".to_string(), "x".to_string()]];
        let table = render(
            &["status", "y"],
            &rows,
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(table.contains("\u{1b}[33mcurrent\u{1b}[0m"));
    }
}
