use std::io::{self, StderrLock, Write};

use anyhow::Error;

use crate::util::text::{truncate, wrap};

const PANEL_WIDTH: usize = 62;

/// Prints `err`, its cause chain and any hints in a boxed panel on stderr.
pub fn print_error(err: &Error) {
    let mut panel = Panel::new(io::stderr().lock());

    panel.blank();
    panel.edge('╔', '═', '╗');
    panel.text(2, "✗ Error");
    panel.edge('╟', '─', '╢');
    panel.paragraph(2, "", &err.to_string());

    for cause in err.chain().skip(1) {
        panel.edge('╟', '─', '╢');
        panel.text(2, "Caused by:");
        panel.paragraph(4, "", &cause.to_string());
    }

    if let Some(hints) = HintCollector::collect(err) {
        panel.edge('╟', '─', '╢');
        panel.text(2, "Hints:");
        for hint in &hints {
            panel.paragraph(4, "• ", hint);
        }
    }

    panel.edge('╚', '═', '╝');
    panel.blank();
}

/// Fixed-width box drawn line by line; write failures on stderr are ignored.
struct Panel<'a> {
    out: StderrLock<'a>,
}

impl<'a> Panel<'a> {
    fn new(out: StderrLock<'a>) -> Self {
        Self { out }
    }

    fn blank(&mut self) {
        let _ = writeln!(self.out);
    }

    fn edge(&mut self, left: char, fill: char, right: char) {
        let fill = fill.to_string().repeat(PANEL_WIDTH);
        let _ = writeln!(self.out, "   {left}{fill}{right}");
    }

    fn text(&mut self, indent: usize, line: &str) {
        let width = PANEL_WIDTH - indent - 1;
        let _ = writeln!(self.out, "   ║{:indent$}{:<width$} ║", "", line);
    }

    /// Word-wraps `text`, putting `bullet` before the first line and aligning
    /// the rest under it.
    fn paragraph(&mut self, indent: usize, bullet: &str, text: &str) {
        let hang = bullet.chars().count();
        let width = PANEL_WIDTH - indent - hang - 1;
        for (i, line) in wrap(text, width).iter().enumerate() {
            let lead = if i == 0 { bullet.to_string() } else { " ".repeat(hang) };
            self.text(indent, &format!("{lead}{line}"));
        }
    }
}

struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn new() -> Self {
        Self {
            hints: Vec::new(),
            has_typed_hints: false,
        }
    }

    fn collect(err: &Error) -> Option<Vec<String>> {
        let mut collector = Self::new();

        collector.collect_io_hints(err);
        collector.collect_scene_hints(err);
        collector.collect_config_hints(err);

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }

        if collector.hints.is_empty() {
            None
        } else {
            Some(collector.hints)
        }
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn mark_typed(&mut self) {
        self.has_typed_hints = true;
    }

    fn collect_io_hints(&mut self, err: &Error) {
        use ctfile_x3d::io::Error as IoError;

        let Some(io_err) = err.downcast_ref::<IoError>() else {
            return;
        };

        self.mark_typed();

        match io_err {
            IoError::Io { source } => self.collect_std_io_hints(source),

            IoError::Format {
                line,
                columns,
                content,
                details,
            } => {
                match columns {
                    Some(cols) => self.add(format!(
                        "Line {} is malformed in columns {}-{}",
                        line,
                        cols.start + 1,
                        cols.end
                    )),
                    None => self.add(format!("Line {} is malformed", line)),
                }
                if !content.trim().is_empty() {
                    self.add(format!("Offending line: '{}'", truncate(content, 40)));
                }
                self.collect_format_hints(details);
            }

            IoError::UnsupportedReadFormat(fmt) => {
                self.add(format!("The '{}' format cannot be used for input", fmt));
                self.add("Supported input formats: MDL molfile (mol), rxnfile (rxn)");
            }

            IoError::UnsupportedWriteFormat(fmt) => {
                self.add(format!("The '{}' format cannot be used for output", fmt));
                self.add("Scenes are written as X3D only");
            }
        }
    }

    fn collect_format_hints(&mut self, details: &str) {
        let details = details.to_lowercase();

        if details.contains("v3000") {
            self.add("Only V2000 connection tables are supported");
            self.add("Re-export the file as V2000 from your drawing tool");
        } else if details.contains("end of input") {
            self.add("The file ends early; it may be truncated");
            self.add("Check that the atom and bond counts match the blocks that follow");
        } else if details.contains("$rxn") || details.contains("$mol") {
            self.add("The input does not look like a rxnfile");
            self.add("Use the 'mol' command for single molecules");
        } else if details.contains("duplicate atom key") {
            self.add("Two atoms share one atom-atom mapping number");
            self.add("Every mapped atom in a participant group needs a distinct number");
        } else if details.contains("itself") {
            self.add("A bond connects an atom to itself");
        } else if details.contains("atom ind") {
            self.add("A bond refers to an atom outside the atom block");
        } else if details.contains("bond type") {
            self.add("Bond types 1-8 (single to any) are supported");
        } else {
            self.add("CTFile fields are fixed-width; check the column alignment");
        }
    }

    fn collect_std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("The input or output path does not exist");
                self.add("Output directories are not created automatically");
            }
            ErrorKind::PermissionDenied => {
                self.add("The file cannot be opened with the current permissions");
            }
            ErrorKind::InvalidData => {
                self.add("The input is not valid UTF-8 text");
                self.add("Binary or compressed CTFiles must be unpacked first");
            }
            ErrorKind::BrokenPipe => {
                self.add("The program reading the X3D output exited early");
            }
            ErrorKind::WriteZero | ErrorKind::StorageFull => {
                self.add("The X3D output could not be written in full");
                self.add("Check the free space on the target device");
            }
            _ => self.add("Reading the CTFile or writing the scene failed"),
        }
    }

    fn collect_scene_hints(&mut self, err: &Error) {
        use ctfile_x3d::SceneError;

        let Some(scene_err) = err.downcast_ref::<SceneError>() else {
            return;
        };

        self.mark_typed();

        match scene_err {
            SceneError::Lookup { key } => {
                self.add(format!(
                    "Mapping number {} must appear in both the reactants and the products",
                    key
                ));
                self.add("Map every atom (aam column) on both sides before animating");
            }
        }
    }

    fn collect_config_hints(&mut self, err: &Error) {
        use ctfile_x3d::ConfigError;

        let Some(config_err) = err.downcast_ref::<ConfigError>() else {
            return;
        };

        self.mark_typed();

        match config_err {
            ConfigError::Parse(_) => {
                self.add("Settings file has invalid TOML or unknown keys");
                self.add("Sections: [atom], [bond], [bond.colors], [layout], [animation]");
            }
            ConfigError::Invalid { key, .. } => {
                self.add(format!("Setting '{}' is out of range", key));
                self.add("Transparencies and fractions lie in [0, 1]; sizes are positive");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let text = err
            .chain()
            .map(|cause| cause.to_string().to_lowercase())
            .collect::<Vec<_>>()
            .join("\n");

        if text.contains("terminal") {
            self.add("Pass a file with -i/-o or connect a pipe");
            self.add("Example: ctx3d mol < water.mol > water.x3d");
        } else if text.contains("settings file") {
            self.add("Compare the file with resources/default.config.toml");
        } else if text.contains("no such file") {
            self.add("Check the spelling of the path");
        }
    }
}
