use bitflags::bitflags;

use crate::cpu_bus::CpuBus;
use crate::trace::{TraceRecord, Tracer};

mod addressing;
mod instructions;
pub mod opcodes;


pub use opcodes::{AddressingMode, Opcode, Operation, OPCODE_TABLE};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusFlags: u8 {
        const CARRY = 0b00000001;
        const ZERO = 0b00000010;
        const INTERRUPT_DISABLE = 0b00000100;
        const DECIMAL = 0b00001000;
        const BREAK = 0b00010000;
        const UNUSED = 0b00100000;
        const OVERFLOW = 0b01000000;
        const NEGATIVE = 0b10000000;
    }
}

impl StatusFlags {
    /// Bits 4 and 5 only exist on the stack copy of P.
    pub const STACK_ONLY: StatusFlags = StatusFlags::BREAK.union(StatusFlags::UNUSED);

    /// Rebuilds P from a byte pulled off the stack. Bit 4 is dropped and
    /// bit 5 always reads back as set.
    pub fn from_stack(value: u8) -> Self {
        (StatusFlags::from_bits_truncate(value) - StatusFlags::STACK_ONLY) | StatusFlags::UNUSED
    }
}

pub const STACK_PAGE: u16 = 0x0100;
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Reset,
    Running,
}

pub struct Cpu {
    pub a: u8,      // Accumulator
    pub x: u8,      // X register
    pub y: u8,      // Y register
    pub sp: u8,     // Stack pointer
    pub pc: u16,    // Program counter
    pub status: StatusFlags,
    state: State,
    cycles: u64,
    instructions: u64,
    record: TraceRecord,
    // Immediate/relative operands are read by the instruction itself; this
    // remembers where so the byte still lands in the trace record.
    pending_operand: Option<u16>,
    tracer: Option<Tracer>,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            a: 0,
            x: 0,
            y: 0,
            sp: 0x00,
            pc: 0,
            status: StatusFlags::from_bits_truncate(0x24),
            state: State::Reset,
            cycles: 0,
            instructions: 0,
            record: TraceRecord::default(),
            pending_operand: None,
            tracer: None,
        }
    }

    /// Pulls the reset line. The sequence itself runs on the next `tick`.
    pub fn reset(&mut self) {
        self.state = State::Reset;
    }

    /// Advances by one instruction, or runs the reset sequence if one is
    /// pending.
    pub fn tick(&mut self, bus: &mut dyn CpuBus) {
        match self.state {
            State::Reset => self.run_reset(bus),
            State::Running => self.step_instruction(bus),
        }
    }

    fn run_reset(&mut self, bus: &mut dyn CpuBus) {
        let low = self.read(bus, RESET_VECTOR) as u16;
        let high = self.read(bus, RESET_VECTOR + 1) as u16;
        self.pc = (high << 8) | low;

        // Three suppressed stack pushes plus the internal cycle
        for _ in 0..4 {
            self.clock(bus);
        }
        self.sp = self.sp.wrapping_sub(3);
        self.status.insert(StatusFlags::INTERRUPT_DISABLE);

        self.state = State::Running;
        log::debug!("CPU reset: PC=${:04X}", self.pc);
    }

    fn step_instruction(&mut self, bus: &mut dyn CpuBus) {
        let pc = self.pc;
        self.record
            .begin(pc, self.a, self.x, self.y, self.status_byte(), self.sp, self.cycles);
        self.pending_operand = None;

        let byte = self.fetch(bus);
        let opcode = opcodes::decode(byte);
        if opcode.is_bad() {
            self.fault(byte, pc);
        }
        self.record.opcode = opcode;

        let addr = self.resolve(bus, opcode, byte, pc);
        self.execute(bus, opcode, addr);

        if let Some(tracer) = self.tracer.as_mut() {
            tracer.record(&self.record);
        }
        self.instructions += 1;
    }

    fn fault(&self, byte: u8, pc: u16) -> ! {
        log::error!("Halting on unimplemented opcode: 0x{:02X} at PC: 0x{:04X}", byte, pc);
        panic!("unimplemented opcode 0x{:02X} at PC 0x{:04X}", byte, pc);
    }

    pub fn nmi(&mut self, bus: &mut dyn CpuBus) {
        self.interrupt(bus, NMI_VECTOR);
    }

    pub fn irq(&mut self, bus: &mut dyn CpuBus) {
        // IRQ is maskable
        if self.status.contains(StatusFlags::INTERRUPT_DISABLE) {
            return;
        }
        self.interrupt(bus, IRQ_VECTOR);
    }

    fn interrupt(&mut self, bus: &mut dyn CpuBus, vector: u16) {
        self.read(bus, self.pc);
        self.read(bus, self.pc);
        self.push(bus, (self.pc >> 8) as u8);
        self.push(bus, self.pc as u8);
        // Hardware interrupts push B clear
        self.push(bus, self.status_byte() & !StatusFlags::BREAK.bits());
        self.status.insert(StatusFlags::INTERRUPT_DISABLE);

        let low = self.read(bus, vector) as u16;
        let high = self.read(bus, vector.wrapping_add(1)) as u16;
        self.pc = (high << 8) | low;
    }

    /// P as software sees it: bit 5 set, bit 4 clear.
    pub fn status_byte(&self) -> u8 {
        (self.status - StatusFlags::BREAK | StatusFlags::UNUSED).bits()
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = Some(tracer);
    }

    pub fn take_tracer(&mut self) -> Option<Tracer> {
        self.tracer.take()
    }

    // Save state methods
    pub(crate) fn set_counters(&mut self, cycles: u64, instructions: u64, running: bool) {
        self.cycles = cycles;
        self.instructions = instructions;
        self.state = if running { State::Running } else { State::Reset };
    }

    // One bus cycle. Every read and write below goes through here.
    fn clock(&mut self, bus: &mut dyn CpuBus) {
        bus.tick();
        self.cycles += 1;
    }

    fn read(&mut self, bus: &mut dyn CpuBus, addr: u16) -> u8 {
        let data = bus.read(addr);
        if self.pending_operand == Some(addr) {
            self.record.push_byte(data);
            self.pending_operand = None;
        }
        self.clock(bus);
        data
    }

    fn write(&mut self, bus: &mut dyn CpuBus, addr: u16, data: u8) {
        bus.write(addr, data);
        self.clock(bus);
    }

    fn fetch(&mut self, bus: &mut dyn CpuBus) -> u8 {
        let byte = self.read(bus, self.pc);
        self.pc = self.pc.wrapping_add(1);
        self.record.push_byte(byte);
        byte
    }

    fn fetch_word(&mut self, bus: &mut dyn CpuBus) -> u16 {
        let low = self.fetch(bus) as u16;
        let high = self.fetch(bus) as u16;
        (high << 8) | low
    }

    fn push(&mut self, bus: &mut dyn CpuBus, value: u8) {
        self.write(bus, STACK_PAGE | self.sp as u16, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    fn pull(&mut self, bus: &mut dyn CpuBus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.read(bus, STACK_PAGE | self.sp as u16)
    }

    // The cycle where the CPU reads the stack before incrementing S
    fn stack_dummy_read(&mut self, bus: &mut dyn CpuBus) {
        self.read(bus, STACK_PAGE | self.sp as u16);
    }

    fn set_zero_negative_flags(&mut self, value: u8) {
        self.status.set(StatusFlags::ZERO, value == 0);
        self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
