use crate::domain::model::UpsetSummary;

const MEMBER: char = '●';
const NON_MEMBER: char = '·';
const BAR: char = '█';

/// Terminal rendering of the UpSet layout: set sizes first, then one line
/// per intersection with its dot pattern and bar. Sets appear in
/// `set_order`. `bar_width` is the length of the longest bar in characters.
pub fn render_text(summary: &UpsetSummary, bar_width: usize) -> String {
    let mut out = String::new();
    let names: Vec<&str> = summary
        .set_order
        .iter()
        .map(|column| summary.set_names[*column].as_str())
        .collect();
    let name_width = names.iter().map(|name| name.chars().count()).max().unwrap_or(0);
    let max_set = summary.set_sizes.iter().copied().max().unwrap_or(0);
    let max_intersection = summary.intersections.iter().map(|i| i.size).max().unwrap_or(0);
    let count_width = max_set.max(max_intersection).to_string().len();

    out.push_str(&format!(
        "UpSet: {} items across {} sets\n\n",
        summary.item_count,
        summary.set_names.len()
    ));
    out.push_str("Set sizes\n");
    for (name, column) in names.iter().zip(&summary.set_order) {
        let size = summary.set_sizes[*column];
        out.push_str(&format!(
            "  {:<name_width$}  {:>count_width$} {}\n",
            name,
            size,
            bar(size, max_set, bar_width),
        ));
    }

    out.push_str("\nIntersections\n");
    let widths: Vec<usize> = names.iter().map(|name| name.chars().count().max(1)).collect();
    let header: Vec<String> = names
        .iter()
        .zip(&widths)
        .map(|(name, width)| format!("{:<width$}", name, width = *width))
        .collect();
    out.push_str(&format!("  {}\n", header.join("  ").trim_end()));

    for intersection in &summary.intersections {
        let pattern: Vec<String> = summary
            .set_order
            .iter()
            .zip(&widths)
            .map(|(column, width)| {
                let marker = if intersection.members[*column] { MEMBER } else { NON_MEMBER };
                format!("{:<width$}", marker, width = *width)
            })
            .collect();
        out.push_str(&format!(
            "  {}  {:>count_width$} {}\n",
            pattern.join("  "),
            intersection.size,
            bar(intersection.size, max_intersection, bar_width),
        ));
    }

    out
}

fn bar(value: usize, max: usize, width: usize) -> String {
    if value == 0 || max == 0 {
        return String::new();
    }
    let length = (value * width / max).max(1);
    std::iter::repeat(BAR).take(length).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::intersections::summarize;
    use crate::domain::model::{IncidenceMatrix, SetCollection, SetInput, SortBy};

    #[test]
    fn test_render_text_layout() {
        let inputs = vec![SetInput::new("A", ["x", "y"]), SetInput::new("B", ["y", "z"])];
        let matrix = IncidenceMatrix::derive(&SetCollection::from_inputs(&inputs).unwrap());
        let summary = summarize(&matrix, SortBy::Cardinality);

        let text = render_text(&summary, 10);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "UpSet: 3 items across 2 sets");
        assert_eq!(lines[3], "  A  2 ██████████");
        assert_eq!(lines[4], "  B  2 ██████████");
        assert_eq!(lines[7], "  A  B");
        assert_eq!(lines.len(), 11);
        assert!(lines[8..].iter().all(|line| line.ends_with("1 ██████████")));
        assert!(lines.contains(&"  ●  ●  1 ██████████"));
    }

    #[test]
    fn test_render_text_lists_largest_set_first() {
        let inputs = vec![
            SetInput::new("few", ["x"]),
            SetInput::new("many", ["x", "y", "z"]),
        ];
        let matrix = IncidenceMatrix::derive(&SetCollection::from_inputs(&inputs).unwrap());
        let summary = summarize(&matrix, SortBy::Degree);

        let text = render_text(&summary, 6);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[3], "  many  3 ██████");
        assert_eq!(lines[4], "  few   1 ██");
        assert_eq!(lines[7], "  many  few");
        assert_eq!(lines[8], "  ●     ·    2 ██████");
        assert_eq!(lines[9], "  ●     ●    1 ███");
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 5, 10), "");
        assert_eq!(bar(5, 5, 10).chars().count(), 10);
        assert_eq!(bar(1, 100, 10).chars().count(), 1);
    }
}
