// Thin emission layer over the output stream: one helper per emitted
// instruction or directive form, so the generator reads like the listing
// it produces.

use std::io::{Result, Write};

pub struct AsmWriter<W: Write> {
    out: W,
}

impl<W: Write> AsmWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn raw(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        return Ok(());
    }

    pub fn label(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "{}:", name)?;
        return Ok(());
    }

    pub fn globl(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, ".globl {}", name)?;
        return Ok(());
    }

    // name: <directive> <value>
    pub fn data_entry(&mut self, name: &str, directive: &str, value: &str) -> Result<()> {
        writeln!(self.out, "{}: {} {}", name, directive, value)?;
        return Ok(());
    }

    pub fn string_entry(&mut self, label: &str, value: &str) -> Result<()> {
        writeln!(self.out, "{}: .string \"{}\"", label, value)?;
        return Ok(());
    }

    pub fn pushq(&mut self, reg: &str) -> Result<()> {
        writeln!(self.out, "PUSHQ {}", reg)?;
        return Ok(());
    }

    pub fn popq(&mut self, reg: &str) -> Result<()> {
        writeln!(self.out, "POPQ {}", reg)?;
        return Ok(());
    }

    pub fn movq(&mut self, src: &str, dst: &str) -> Result<()> {
        writeln!(self.out, "MOVQ {}, {}", src, dst)?;
        return Ok(());
    }

    pub fn movq_imm(&mut self, value: i64, dst: &str) -> Result<()> {
        writeln!(self.out, "MOVQ ${}, {}", value, dst)?;
        return Ok(());
    }

    // op src, dst: ADDQ\SUBQ\AND\OR\IMULQ with two operands
    pub fn op2(&mut self, op: &str, src: &str, dst: &str) -> Result<()> {
        writeln!(self.out, "{} {}, {}", op, src, dst)?;
        return Ok(());
    }

    // op operand: IMULQ\IDIVQ\NOT\PUSHQ-like single-operand forms
    pub fn op1(&mut self, op: &str, operand: &str) -> Result<()> {
        writeln!(self.out, "{} {}", op, operand)?;
        return Ok(());
    }

    pub fn op0(&mut self, op: &str) -> Result<()> {
        writeln!(self.out, "{}", op)?;
        return Ok(());
    }

    pub fn cmp(&mut self, a: &str, b: &str) -> Result<()> {
        writeln!(self.out, "CMP {}, {}", a, b)?;
        return Ok(());
    }

    pub fn cmp_imm(&mut self, value: i64, reg: &str) -> Result<()> {
        writeln!(self.out, "CMP ${}, {}", value, reg)?;
        return Ok(());
    }

    // jump op: JMP\JE\JNE\JL\JLE\JG\JGE
    pub fn jump(&mut self, op: &str, label: &str) -> Result<()> {
        writeln!(self.out, "{} {}", op, label)?;
        return Ok(());
    }

    pub fn call(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, "CALL {}", name)?;
        return Ok(());
    }

    pub fn ret(&mut self) -> Result<()> {
        writeln!(self.out, "ret")?;
        return Ok(());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instruction_forms_render_as_expected() {
        let mut buffer = Vec::new();
        let mut writer = AsmWriter::new(&mut buffer);
        writer.globl("main").unwrap();
        writer.label("main").unwrap();
        writer.movq_imm(5, "%rbx").unwrap();
        writer.op2("ADDQ", "%rbx", "%r10").unwrap();
        writer.jump("JNE", ".L0").unwrap();
        writer.ret().unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            ".globl main\nmain:\nMOVQ $5, %rbx\nADDQ %rbx, %r10\nJNE .L0\nret\n"
        );
    }

    #[test]
    fn data_entries_render_name_directive_value() {
        let mut buffer = Vec::new();
        let mut writer = AsmWriter::new(&mut buffer);
        writer.data_entry("x", ".quad", "5").unwrap();
        writer.string_entry(".str1", "hello").unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "x: .quad 5\n.str1: .string \"hello\"\n");
    }
}
