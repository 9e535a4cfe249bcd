//! Line-oriented progress display for terminals.

use std::io::Write;

use upwatch_client::ProgressDisplay;

/// Writes one line per render command.
pub struct TerminalDisplay<W> {
    out: W,
    width: usize,
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out, width: 0 }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProgressDisplay for TerminalDisplay<W> {
    fn render_entry(&mut self, name: &str, size_label: &str) {
        self.width = self.width.max(name.chars().count());
        let _ = writeln!(self.out, "  {name:<width$}  {size_label}", width = self.width);
    }

    fn update_progress(&mut self, name: &str, label: &str) {
        let _ = writeln!(self.out, "  {name:<width$}  {label}", width = self.width);
    }

    fn clear_all(&mut self) {
        self.width = 0;
        let _ = writeln!(self.out, "Files:");
    }

    fn update_overall(&mut self, label: &str) {
        let _ = writeln!(self.out, "Total: {label}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_lines() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.clear_all();
        display.render_entry("x.txt", "2 KiB");
        display.update_progress("x.txt", "Finished");
        display.update_overall("100% (2 KiB / 2 KiB)");

        let out = String::from_utf8(display.into_inner()).unwrap();
        assert_eq!(
            out,
            "Files:\n  x.txt  2 KiB\n  x.txt  Finished\nTotal: 100% (2 KiB / 2 KiB)\n"
        );
    }
}
