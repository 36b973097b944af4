//! Operand address resolution.
//!
//! Each resolver performs exactly the bus cycles the hardware spends on
//! address calculation, including the throwaway reads, and leaves `PC`
//! pointing at the next instruction.

use super::opcodes::{AddressingMode, Opcode, Operation};
use super::Cpu;
use crate::cpu_bus::CpuBus;

impl Cpu {
    pub(super) fn resolve(
        &mut self,
        bus: &mut dyn CpuBus,
        opcode: Opcode,
        byte: u8,
        pc: u16,
    ) -> u16 {
        let always_fix_up = opcode.op.writes_memory();
        let addr = match opcode.mode {
            AddressingMode::Implicit | AddressingMode::Accumulator => self.implied_addr(bus),
            AddressingMode::Immediate | AddressingMode::Relative => self.immediate_addr(),
            AddressingMode::ZeroPage => self.fetch(bus) as u16,
            AddressingMode::ZeroPageX => self.zero_page_indexed_addr(bus, self.x),
            AddressingMode::ZeroPageY => self.zero_page_indexed_addr(bus, self.y),
            // JSR fetches its high target byte after the return address is pushed
            AddressingMode::Absolute if opcode.op == Operation::Jsr => self.fetch(bus) as u16,
            AddressingMode::Absolute => self.fetch_word(bus),
            AddressingMode::AbsoluteX => self.absolute_indexed_addr(bus, self.x, always_fix_up),
            AddressingMode::AbsoluteY => self.absolute_indexed_addr(bus, self.y, always_fix_up),
            AddressingMode::Indirect => self.indirect_addr(bus),
            AddressingMode::IndexedIndirect => self.indexed_indirect_addr(bus),
            AddressingMode::IndirectIndexed => self.indirect_indexed_addr(bus, always_fix_up),
            AddressingMode::Bad => self.fault(byte, pc),
        };
        if !matches!(
            opcode.mode,
            AddressingMode::Implicit | AddressingMode::Accumulator
        ) {
            self.record.effective = Some(addr);
        }
        addr
    }

    // One-byte instructions still spend their second cycle reading the
    // byte after the opcode; PC does not move.
    fn implied_addr(&mut self, bus: &mut dyn CpuBus) -> u16 {
        self.read(bus, self.pc);
        0
    }

    fn immediate_addr(&mut self) -> u16 {
        let addr = self.pc;
        self.pc = self.pc.wrapping_add(1);
        self.pending_operand = Some(addr);
        addr
    }

    fn zero_page_indexed_addr(&mut self, bus: &mut dyn CpuBus, index: u8) -> u16 {
        let base = self.fetch(bus);
        // Read from the unindexed address while the index is added
        self.read(bus, base as u16);
        base.wrapping_add(index) as u16
    }

    fn absolute_indexed_addr(&mut self, bus: &mut dyn CpuBus, index: u8, always_fix_up: bool) -> u16 {
        let base = self.fetch_word(bus);
        let addr = base.wrapping_add(index as u16);
        let page_crossed = (base & 0x00FF) + index as u16 > 0x00FF;
        if page_crossed || always_fix_up {
            // High byte not carried yet
            self.read(bus, (base & 0xFF00) | (addr & 0x00FF));
        }
        addr
    }

    fn indirect_addr(&mut self, bus: &mut dyn CpuBus) -> u16 {
        let pointer = self.fetch_word(bus);
        let low = self.read(bus, pointer) as u16;
        // The pointer's high byte is fetched without carrying into the next page
        let high_addr = (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF);
        let high = self.read(bus, high_addr) as u16;
        (high << 8) | low
    }

    fn indexed_indirect_addr(&mut self, bus: &mut dyn CpuBus) -> u16 {
        let base = self.fetch(bus);
        self.read(bus, base as u16);
        let pointer = base.wrapping_add(self.x);
        self.read_zero_page_word(bus, pointer)
    }

    fn indirect_indexed_addr(&mut self, bus: &mut dyn CpuBus, always_fix_up: bool) -> u16 {
        let pointer = self.fetch(bus);
        let base = self.read_zero_page_word(bus, pointer);
        self.record.base = Some(base);

        let addr = base.wrapping_add(self.y as u16);
        let page_crossed = (base & 0x00FF) + self.y as u16 > 0x00FF;
        if page_crossed || always_fix_up {
            self.read(bus, (base & 0xFF00) | (addr & 0x00FF));
        }
        addr
    }

    fn read_zero_page_word(&mut self, bus: &mut dyn CpuBus, pointer: u8) -> u16 {
        let low = self.read(bus, pointer as u16) as u16;
        let high = self.read(bus, pointer.wrapping_add(1) as u16) as u16;
        (high << 8) | low
    }
}
