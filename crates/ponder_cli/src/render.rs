//! Terminal rendering of reasoning progress.
//!
//! Snapshots carry the whole trace, so the renderer remembers how much it has
//! already printed and only writes the new records.

use ponder_core::{Progress, StepRecord};
use std::io::{self, Write};

#[derive(Debug, Default)]
pub struct Renderer {
    printed: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render<W: Write>(&mut self, progress: &Progress, out: &mut W) -> io::Result<()> {
        for step in progress.steps.iter().skip(self.printed) {
            write_step(step, out)?;
        }
        self.printed = progress.steps.len();

        if let Some(total) = progress.total_elapsed {
            writeln!(
                out,
                "Total thinking time: {:.2} seconds",
                total.as_secs_f64()
            )?;
        }
        out.flush()
    }
}

fn write_step<W: Write>(step: &StepRecord, out: &mut W) -> io::Result<()> {
    if step.is_final() {
        writeln!(out, "\n### {}", step.label)?;
    } else {
        writeln!(out, "\n── {} ({:.2}s)", step.label, step.elapsed_secs())?;
    }
    writeln!(out, "{}", step.content.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn record(label: &str, content: &str) -> StepRecord {
        StepRecord::new(label, content, Duration::from_millis(1250))
    }

    #[test]
    fn test_renders_only_new_steps() {
        let mut renderer = Renderer::new();
        let mut out = Vec::new();

        let first = Progress {
            steps: vec![record("Step 1: Plan", "plan it")],
            total_elapsed: None,
        };
        renderer.render(&first, &mut out).unwrap();

        let second = Progress {
            steps: vec![
                record("Step 1: Plan", "plan it"),
                record("Final Answer", "done"),
            ],
            total_elapsed: Some(Duration::from_millis(2500)),
        };
        renderer.render(&second, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("Step 1: Plan").count(), 1);
        assert!(text.contains("── Step 1: Plan (1.25s)\nplan it\n"));
        assert!(text.contains("### Final Answer\ndone\n"));
        assert!(text.ends_with("Total thinking time: 2.50 seconds\n"));
    }

    #[test]
    fn test_no_total_while_in_progress() {
        let mut out = Vec::new();
        let progress = Progress {
            steps: vec![record("Step 1: Plan", "plan it")],
            total_elapsed: None,
        };
        Renderer::new().render(&progress, &mut out).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("Total thinking time"));
    }
}
