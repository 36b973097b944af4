//! Per-instruction execution log in a fixed-width, diffable text format.
//!
//! ```text
//! C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7
//! ```
//!
//! The line layout lines up with the widely used reference CPU logs, so a
//! run can be compared against one with plain `diff`.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::cpu::opcodes::{AddressingMode, Opcode};

pub const DEFAULT_LINE_LIMIT: usize = 50_000;

/// Everything the tracer needs about one retired instruction. Register
/// values are captured before the instruction executes.
#[derive(Debug, Clone, Default)]
pub struct TraceRecord {
    pub pc: u16,
    bytes: [u8; 3],
    len: usize,
    pub opcode: Opcode,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub p: u8,
    pub sp: u8,
    pub cycles: u64,
    /// Final operand address, for modes that compute one.
    pub effective: Option<u16>,
    /// Intermediate pointer value for the indirect modes.
    pub base: Option<u16>,
}

impl TraceRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn begin(&mut self, pc: u16, a: u8, x: u8, y: u8, p: u8, sp: u8, cycles: u64) {
        *self = TraceRecord {
            pc,
            a,
            x,
            y,
            p,
            sp,
            cycles,
            ..TraceRecord::default()
        };
    }

    pub fn push_byte(&mut self, byte: u8) {
        if self.len < self.bytes.len() {
            self.bytes[self.len] = byte;
            self.len += 1;
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    fn byte(&self, index: usize) -> u8 {
        self.bytes().get(index).copied().unwrap_or(0)
    }

    fn word(&self) -> u16 {
        (self.byte(2) as u16) << 8 | self.byte(1) as u16
    }
}

pub fn operand_text(record: &TraceRecord) -> String {
    let effective = record.effective.unwrap_or(0);
    let base = record.base.unwrap_or(0);
    match record.opcode.mode {
        AddressingMode::Implicit => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${:02X}", record.byte(1)),
        AddressingMode::ZeroPage => format!("${:02X}", record.byte(1)),
        AddressingMode::ZeroPageX => {
            format!("${:02X},X @ {:02X}", record.byte(1), record.byte(1).wrapping_add(record.x))
        }
        AddressingMode::ZeroPageY => {
            format!("${:02X},Y @ {:02X}", record.byte(1), record.byte(1).wrapping_add(record.y))
        }
        AddressingMode::Relative => {
            let target = record
                .pc
                .wrapping_add(2)
                .wrapping_add(record.byte(1) as i8 as i16 as u16);
            format!("${:04X}", target)
        }
        AddressingMode::Absolute => format!("${:04X}", record.word()),
        AddressingMode::AbsoluteX => format!("${:04X},X @ {:04X}", record.word(), effective),
        AddressingMode::AbsoluteY => format!("${:04X},Y @ {:04X}", record.word(), effective),
        AddressingMode::Indirect => format!("(${:04X}) = {:04X}", record.word(), effective),
        AddressingMode::IndexedIndirect => format!(
            "(${:02X},X) @ {:02X} = {:04X}",
            record.byte(1),
            record.byte(1).wrapping_add(record.x),
            effective
        ),
        AddressingMode::IndirectIndexed => format!(
            "(${:02X}),Y = {:04X} @ {:04X}",
            record.byte(1),
            base,
            effective
        ),
        AddressingMode::Bad => "UNKNOWN".to_string(),
    }
}

pub fn format_line(record: &TraceRecord) -> String {
    let mut bytes = String::with_capacity(9);
    for byte in record.bytes() {
        let _ = write!(bytes, "{:02X} ", byte);
    }
    format!(
        "{:04X}  {:<10}{} {:<28}A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
        record.pc,
        bytes,
        record.opcode.op.mnemonic(),
        operand_text(record),
        record.a,
        record.x,
        record.y,
        record.p,
        record.sp,
        record.cycles
    )
}

/// Writes one line per retired instruction until `limit` lines have been
/// emitted; anything after that is dropped.
pub struct Tracer {
    sink: Box<dyn Write>,
    limit: usize,
    lines: usize,
    failed: bool,
}

impl Tracer {
    pub fn new<W: Write + 'static>(sink: W) -> Self {
        Tracer {
            sink: Box::new(sink),
            limit: DEFAULT_LINE_LIMIT,
            lines: 0,
            failed: false,
        }
    }

    pub fn to_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path.as_ref())?;
        log::info!("Tracing CPU to {}", path.as_ref().display());
        Ok(Self::new(BufWriter::new(file)))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn record(&mut self, record: &TraceRecord) {
        if self.failed || self.lines >= self.limit {
            return;
        }
        self.lines += 1;
        if let Err(e) = writeln!(self.sink, "{}", format_line(record)) {
            log::warn!("CPU trace disabled after write error: {}", e);
            self.failed = true;
            return;
        }
        if self.lines == self.limit {
            log::info!("CPU trace reached {} lines, further instructions are not logged", self.limit);
            self.flush();
        }
    }

    pub fn lines_written(&self) -> usize {
        self.lines
    }

    pub fn flush(&mut self) {
        if let Err(e) = self.sink.flush() {
            log::warn!("CPU trace flush failed: {}", e);
        }
    }
}

impl Drop for Tracer {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::opcodes::decode;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn record(bytes: &[u8]) -> TraceRecord {
        let mut rec = TraceRecord::default();
        rec.begin(0xC000, 0x00, 0x00, 0x00, 0x24, 0xFD, 7);
        for &b in bytes {
            rec.push_byte(b);
        }
        rec.opcode = decode(bytes[0]);
        rec
    }

    #[test]
    fn jmp_absolute_line() {
        let line = format_line(&record(&[0x4C, 0xF5, 0xC5]));
        assert_eq!(
            line,
            "C000  4C F5 C5  JMP $C5F5                       A:00 X:00 Y:00 P:24 SP:FD CYC:7"
        );
    }

    #[test]
    fn immediate_and_zero_page_operands() {
        assert_eq!(operand_text(&record(&[0xA9, 0x05])), "#$05");
        assert_eq!(operand_text(&record(&[0xA5, 0x10])), "$10");
        assert_eq!(operand_text(&record(&[0xEA])), "");
        assert_eq!(operand_text(&record(&[0x0A])), "A");
    }

    #[test]
    fn indexed_zero_page_shows_wrapped_address() {
        let mut rec = record(&[0xB5, 0xF0]);
        rec.x = 0x20;
        assert_eq!(operand_text(&rec), "$F0,X @ 10");

        let mut rec = record(&[0xB6, 0x80]);
        rec.y = 0x01;
        assert_eq!(operand_text(&rec), "$80,Y @ 81");
    }

    #[test]
    fn relative_shows_branch_target() {
        assert_eq!(operand_text(&record(&[0xD0, 0x02])), "$C004");
        assert_eq!(operand_text(&record(&[0xD0, 0xFE])), "$C000");
    }

    #[test]
    fn indirect_modes_show_resolved_addresses() {
        let mut rec = record(&[0xB1, 0x89]);
        rec.base = Some(0x0300);
        rec.effective = Some(0x0310);
        assert_eq!(operand_text(&rec), "($89),Y = 0300 @ 0310");

        let mut rec = record(&[0x6C, 0xFF, 0x02]);
        rec.effective = Some(0x0400);
        assert_eq!(operand_text(&rec), "($02FF) = 0400");
    }

    #[test]
    fn output_is_capped() {
        let buf = SharedBuf::default();
        let mut tracer = Tracer::new(buf.clone()).with_limit(3);
        let rec = record(&[0xEA]);
        for _ in 0..10 {
            tracer.record(&rec);
        }
        assert_eq!(tracer.lines_written(), 3);
        let text = String::from_utf8(buf.0.borrow().clone()).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
