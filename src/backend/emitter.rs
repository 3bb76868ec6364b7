use std::io::Write;

use crate::{
    backend::jasmin::{LabelId, Opcode},
    error::{CodegenError, Result},
};

const LABEL_INDENT: &str = "\t";
const INSTRUCTION_INDENT: &str = "\t\t";

/// Appends lines to the currently open output unit. Directives (`.class`,
/// `.method`, ...) are written flush left, label declarations get one level
/// of indentation and everything else two. Every call is flushed before it
/// returns so a failed run still leaves readable partial output.
#[derive(Default)]
pub struct Emitter {
    unit: Option<OpenUnit>,
}

struct OpenUnit {
    name: String,
    writer: Box<dyn Write>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, name: &str, writer: Box<dyn Write>) -> Result<()> {
        if let Some(unit) = &self.unit {
            return Err(CodegenError::UnitAlreadyOpen {
                open: unit.name.clone(),
                requested: name.to_owned(),
            });
        }

        self.unit = Some(OpenUnit {
            name: name.to_owned(),
            writer,
        });

        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        let mut unit = self.unit.take().ok_or(CodegenError::NoOpenUnit)?;
        unit.writer.flush()?;

        Ok(())
    }

    pub fn open_unit_name(&self) -> Option<&str> {
        self.unit.as_ref().map(|u| u.name.as_str())
    }

    /// Writes one or more newline separated lines, indenting each one by its
    /// kind
    pub fn emit(&mut self, text: impl AsRef<str>) -> Result<()> {
        let unit = self.unit.as_mut().ok_or(CodegenError::NoOpenUnit)?;

        for line in text.as_ref().lines() {
            unit.writer.write_all(format_line(line).as_bytes())?;
        }

        unit.writer.flush()?;

        Ok(())
    }

    pub fn instruction(&mut self, opcode: Opcode) -> Result<()> {
        self.emit(opcode.to_string())
    }

    pub fn instruction_with(&mut self, opcode: Opcode, operand: impl core::fmt::Display) -> Result<()> {
        self.emit(format!("{opcode} {operand}"))
    }

    pub fn label(&mut self, label: LabelId) -> Result<()> {
        self.emit(format!("{label}:"))
    }

    pub fn comment(&mut self, comment: impl AsRef<str>) -> Result<()> {
        // a multi line comment must not turn into instructions
        for line in comment.as_ref().lines() {
            self.emit(format!("; {line}"))?;
        }

        Ok(())
    }
}

/// Indents a single line according to its kind and terminates it
pub fn format_line(line: &str) -> String {
    let line = line.trim();

    if line.is_empty() {
        "\n".to_owned()
    } else if line.starts_with('.') {
        format!("{line}\n")
    } else if is_label_declaration(line) {
        format!("{LABEL_INDENT}{line}\n")
    } else {
        format!("{INSTRUCTION_INDENT}{line}\n")
    }
}

fn is_label_declaration(line: &str) -> bool {
    !line.starts_with(';')
        && line.ends_with(':')
        && !line.contains(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::output::{MemoryOutput, OutputSink},
        index::Index,
    };

    fn open_emitter(output: &mut MemoryOutput) -> Emitter {
        let mut emitter = Emitter::new();
        emitter
            .open("Unit", output.create_unit("Unit").unwrap())
            .unwrap();
        emitter
    }

    #[test]
    fn lines_are_indented_by_kind() {
        let mut output = MemoryOutput::new();
        let mut emitter = open_emitter(&mut output);

        emitter
            .emit(indoc::indoc! {"
                .method public <init>()V
                aload 0
                Label_3:
                ; comment ending in a colon:
            "})
            .unwrap();

        assert_eq!(
            output.unit("Unit").unwrap(),
            ".method public <init>()V\n\t\taload 0\n\tLabel_3:\n\t\t; comment ending in a colon:\n"
        );
    }

    #[test]
    fn typed_helpers_format_operands() {
        let mut output = MemoryOutput::new();
        let mut emitter = open_emitter(&mut output);

        emitter.instruction_with(Opcode::Astore, 4).unwrap();
        emitter.label(LabelId::new(0)).unwrap();
        emitter.instruction(Opcode::Nop).unwrap();

        assert_eq!(
            output.unit("Unit").unwrap(),
            "\t\tastore 4\n\tLabel_0:\n\t\tnop\n"
        );
    }

    #[test]
    fn emitting_without_an_open_unit_fails() {
        let mut emitter = Emitter::new();

        assert!(matches!(
            emitter.emit("nop"),
            Err(CodegenError::NoOpenUnit)
        ));
        assert!(matches!(emitter.close(), Err(CodegenError::NoOpenUnit)));
    }

    #[test]
    fn only_one_unit_may_be_open() {
        let mut output = MemoryOutput::new();
        let mut emitter = open_emitter(&mut output);

        let error = emitter
            .open("Other", output.create_unit("Other").unwrap())
            .unwrap_err();

        assert!(matches!(error, CodegenError::UnitAlreadyOpen { .. }));
        emitter.close().unwrap();
        assert!(emitter.open_unit_name().is_none());
    }
}
