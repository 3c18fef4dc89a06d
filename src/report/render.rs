use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use super::{AxisSummary, Report, RunSection, StepGraph, StepSection};

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

fn axis_line(axis: &AxisSummary) -> String {
    let name = if axis.units.is_empty() {
        axis.label.clone()
    } else {
        format!("{} [{}]", axis.label, axis.units)
    };
    match (&axis.error, axis.min, axis.max) {
        (Some(_), _, _) => format!("{name}: non-numeric"),
        (None, Some(min), Some(max)) => format!("{name}: {min} .. {max}"),
        _ => format!("{name}: no samples"),
    }
}

fn step_header(step: &StepSection) -> String {
    format!(
        "Step {} ({}): U nom {} / meas {}, I lim {} / meas {}, {}",
        or_dash(&step.number),
        or_dash(&step.step_guid),
        or_dash(&step.nominal_voltage),
        or_dash(&step.measured_voltage),
        or_dash(&step.current_limit),
        or_dash(&step.measured_current),
        or_dash(&step.timestamp),
    )
}

/// Highlight applied to a marker in terminal output
#[derive(Debug, Clone, Copy)]
enum Mark {
    Title,
    Heading,
    Good,
    Warn,
    Error,
}

/// Whether markers are styled; the text is the same either way
#[derive(Debug, Clone, Copy)]
struct Palette {
    colored: bool,
}

impl Palette {
    const PLAIN: Palette = Palette { colored: false };
    const COLORED: Palette = Palette { colored: true };

    fn paint<T: fmt::Display>(self, text: T, mark: Mark) -> String {
        if self.colored {
            styled(text.to_string(), mark)
        } else {
            text.to_string()
        }
    }
}

#[cfg(feature = "colorized_output")]
fn styled(text: String, mark: Mark) -> String {
    let text = style(text);
    match mark {
        Mark::Title => text.bold().cyan(),
        Mark::Heading => text.bold(),
        Mark::Good => text.green(),
        Mark::Warn => text.yellow().bold(),
        Mark::Error => text.red().bold(),
    }
    .to_string()
}

#[cfg(not(feature = "colorized_output"))]
fn styled(text: String, _mark: Mark) -> String {
    text
}

fn write_step<W: fmt::Write>(
    out: &mut W,
    step: &StepSection,
    preview: usize,
    palette: Palette,
) -> fmt::Result {
    writeln!(out, "  {}", step_header(step))?;
    if !step.comment.trim().is_empty() {
        writeln!(out, "    Comment: {}", step.comment)?;
    }
    match &step.graph {
        StepGraph::Parsed { graph, axes } => {
            writeln!(out, "    Graph: {} samples", graph.samples.len())?;
            for axis in axes {
                writeln!(out, "      {}", axis_line(axis))?;
            }
            for sample in graph.samples.iter().take(preview) {
                writeln!(out, "      | {}", sample.values().join(" | "))?;
            }
        }
        StepGraph::Missing { reason } => {
            writeln!(
                out,
                "    Graph: {} ({})",
                palette.paint("no graph data", Mark::Warn),
                reason
            )?;
        }
    }
    Ok(())
}

fn write_run<W: fmt::Write>(
    out: &mut W,
    run: &RunSection,
    preview: usize,
    palette: Palette,
) -> fmt::Result {
    writeln!(
        out,
        "{} {} from {}: program '{}' -> definition '{}'",
        palette.paint("Run", Mark::Heading),
        palette.paint(&run.run_id, Mark::Heading),
        run.source_file,
        or_dash(&run.program_name),
        palette.paint(&run.definition_name, Mark::Good)
    )?;
    writeln!(out, "  Program GUID: {}", run.program_guid)?;
    if !run.definition_comments.trim().is_empty() {
        writeln!(out, "  Comments: {}", run.definition_comments)?;
    }
    for dfn in &run.definition_steps {
        writeln!(
            out,
            "  Defined step {}: {} ({} V, {} s)",
            dfn.number,
            or_dash(&dfn.description),
            dfn.test_voltage.map_or("-".to_string(), |v| v.to_string()),
            dfn.test_time.map_or("-".to_string(), |v| v.to_string()),
        )?;
    }
    for step in &run.steps {
        write_step(out, step, preview, palette)?;
    }
    writeln!(out)
}

impl Report {
    fn write_diagnostics<W: fmt::Write>(&self, out: &mut W, palette: Palette) -> fmt::Result {
        writeln!(out, "{}", palette.paint("Programs by data file:", Mark::Heading))?;
        for (file, programs) in &self.programs_by_file {
            let names: Vec<&str> = programs.iter().map(|p| or_dash(p)).collect();
            writeln!(out, "  {}: {}", file, names.join(", "))?;
        }
        writeln!(out)?;

        let warn = palette.paint("!", Mark::Warn);
        for orphan in &self.orphan_records {
            writeln!(
                out,
                "[{}] Run {} in {} references unknown program GUID '{}'",
                warn, orphan.run_id, orphan.source_file, orphan.program_guid
            )?;
        }
        for orphan in &self.orphan_definitions {
            writeln!(
                out,
                "[{}] Definition '{}' ({}) is not used by any run",
                warn, orphan.name, orphan.guid
            )?;
        }
        let error = palette.paint("!", Mark::Error);
        for guid in &self.duplicate_guids {
            writeln!(out, "[{}] Definition GUID {} is defined more than once", error, guid)?;
        }
        Ok(())
    }

    fn summary_line(&self) -> String {
        format!(
            "Summary: {} runs, {} steps, {} without graph data, {} orphan runs, {} orphan definitions",
            self.runs.len(),
            self.step_count(),
            self.missing_graph_count(),
            self.orphan_records.len(),
            self.orphan_definitions.len()
        )
    }

    fn render<W: fmt::Write>(&self, out: &mut W, palette: Palette) -> fmt::Result {
        writeln!(out, "{}", palette.paint(&self.title, Mark::Title))?;
        writeln!(
            out,
            "{}",
            palette.paint("=".repeat(self.title.len()), Mark::Title)
        )?;
        writeln!(
            out,
            "{}: {}",
            palette.paint("Generated", Mark::Heading),
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(out)?;

        for run in &self.runs {
            write_run(out, run, self.sample_preview, palette)?;
        }

        self.write_diagnostics(out, palette)?;

        writeln!(out)?;
        writeln!(out, "{}", palette.paint(self.summary_line(), Mark::Heading))
    }

    /// Format the report with colored markers (requires console feature).
    ///
    /// Same content as the `Display` output; only the markers are styled.
    pub fn format_colored(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail
        let _ = self.render(&mut output, Palette::COLORED);
        output
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, Palette::PLAIN)
    }
}
