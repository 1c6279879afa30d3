use crate::domain::model::SetInput;
use crate::input::{parse_items, parse_set_count};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// Line-oriented replacement for the set entry form: asks for the number
/// of sets, then a name and an item list for each one.
pub struct FormPrompt<R: BufRead, W: Write> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> FormPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn collect(&mut self) -> Result<Vec<SetInput>> {
        self.prompt("Enter the number of sets: ")?;
        let count = parse_set_count(&self.read_line()?)?;
        tracing::debug!("Collecting {} sets", count);

        let mut sets = Vec::with_capacity(count);
        for index in 1..=count {
            self.prompt(&format!("Set {} Name: ", index))?;
            let name = self.read_line()?.trim().to_string();

            self.prompt("Enter items (one per line, blank line to finish):\n")?;
            let items = self.read_block()?;

            sets.push(SetInput { name, items });
        }

        Ok(sets)
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line)
    }

    // Stops at the first blank line or EOF.
    fn read_block(&mut self) -> Result<Vec<String>> {
        let mut block = String::new();
        loop {
            let line = self.read_line()?;
            if line.trim().is_empty() {
                break;
            }
            block.push_str(&line);
        }
        Ok(parse_items(&block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::UpsetError;
    use std::io::Cursor;

    #[test]
    fn test_collect_two_sets() {
        let input = "2\nA\nx\ny\n\nB\ny\nz\n\n";
        let mut output = Vec::new();

        let sets = FormPrompt::new(Cursor::new(input), &mut output).collect().unwrap();

        assert_eq!(
            sets,
            vec![SetInput::new("A", ["x", "y"]), SetInput::new("B", ["y", "z"])]
        );
        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.starts_with("Enter the number of sets: "));
        assert!(transcript.contains("Set 2 Name: "));
    }

    #[test]
    fn test_collect_last_set_ends_at_eof() {
        let input = "1\nOnly\nitem one\n  item two  ";

        let sets = FormPrompt::new(Cursor::new(input), Vec::new()).collect().unwrap();

        assert_eq!(sets, vec![SetInput::new("Only", ["item one", "item two"])]);
    }

    #[test]
    fn test_collect_rejects_bad_count() {
        for count in ["0\n", "-1\n", "many\n"] {
            let result = FormPrompt::new(Cursor::new(count), Vec::new()).collect();
            assert!(matches!(result, Err(UpsetError::InvalidSetCount { .. })));
        }
    }

    #[test]
    fn test_collect_passes_empty_set_through() {
        let input = "1\nA\n\n";

        let sets = FormPrompt::new(Cursor::new(input), Vec::new()).collect().unwrap();

        assert_eq!(sets[0].name, "A");
        assert!(sets[0].items.is_empty());
    }
}
