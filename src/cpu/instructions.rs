use super::opcodes::{AddressingMode, Opcode, Operation};
use super::{Cpu, StatusFlags, IRQ_VECTOR};
use crate::cpu_bus::CpuBus;

impl Cpu {
    pub(super) fn execute(&mut self, bus: &mut dyn CpuBus, opcode: Opcode, addr: u16) {
        let accumulator = opcode.mode == AddressingMode::Accumulator;
        match opcode.op {
            // Loads and stores
            Operation::Lda => {
                self.a = self.read(bus, addr);
                self.set_zero_negative_flags(self.a);
            }
            Operation::Ldx => {
                self.x = self.read(bus, addr);
                self.set_zero_negative_flags(self.x);
            }
            Operation::Ldy => {
                self.y = self.read(bus, addr);
                self.set_zero_negative_flags(self.y);
            }
            Operation::Sta => self.write(bus, addr, self.a),
            Operation::Stx => self.write(bus, addr, self.x),
            Operation::Sty => self.write(bus, addr, self.y),

            // Register transfers
            Operation::Tax => {
                self.x = self.a;
                self.set_zero_negative_flags(self.x);
            }
            Operation::Tay => {
                self.y = self.a;
                self.set_zero_negative_flags(self.y);
            }
            Operation::Txa => {
                self.a = self.x;
                self.set_zero_negative_flags(self.a);
            }
            Operation::Tya => {
                self.a = self.y;
                self.set_zero_negative_flags(self.a);
            }
            Operation::Tsx => {
                self.x = self.sp;
                self.set_zero_negative_flags(self.x);
            }
            Operation::Txs => self.sp = self.x,

            // Arithmetic and logic
            Operation::Adc => {
                let value = self.read(bus, addr);
                self.adc(value);
            }
            Operation::Sbc => {
                let value = self.read(bus, addr);
                self.sbc(value);
            }
            Operation::And => {
                let value = self.read(bus, addr);
                self.a &= value;
                self.set_zero_negative_flags(self.a);
            }
            Operation::Ora => {
                let value = self.read(bus, addr);
                self.a |= value;
                self.set_zero_negative_flags(self.a);
            }
            Operation::Eor => {
                let value = self.read(bus, addr);
                self.a ^= value;
                self.set_zero_negative_flags(self.a);
            }
            Operation::Bit => {
                let value = self.read(bus, addr);
                self.status.set(StatusFlags::ZERO, self.a & value == 0);
                self.status.set(StatusFlags::OVERFLOW, value & 0x40 != 0);
                self.status.set(StatusFlags::NEGATIVE, value & 0x80 != 0);
            }
            Operation::Cmp => {
                let value = self.read(bus, addr);
                self.compare(self.a, value);
            }
            Operation::Cpx => {
                let value = self.read(bus, addr);
                self.compare(self.x, value);
            }
            Operation::Cpy => {
                let value = self.read(bus, addr);
                self.compare(self.y, value);
            }

            // Increments and decrements
            Operation::Inc => self.modify(bus, addr, false, |_, v| v.wrapping_add(1)),
            Operation::Dec => self.modify(bus, addr, false, |_, v| v.wrapping_sub(1)),
            Operation::Inx => {
                self.x = self.x.wrapping_add(1);
                self.set_zero_negative_flags(self.x);
            }
            Operation::Iny => {
                self.y = self.y.wrapping_add(1);
                self.set_zero_negative_flags(self.y);
            }
            Operation::Dex => {
                self.x = self.x.wrapping_sub(1);
                self.set_zero_negative_flags(self.x);
            }
            Operation::Dey => {
                self.y = self.y.wrapping_sub(1);
                self.set_zero_negative_flags(self.y);
            }

            // Shifts
            Operation::Asl => self.modify(bus, addr, accumulator, |cpu, v| {
                cpu.status.set(StatusFlags::CARRY, v & 0x80 != 0);
                v << 1
            }),
            Operation::Lsr => self.modify(bus, addr, accumulator, |cpu, v| {
                cpu.status.set(StatusFlags::CARRY, v & 0x01 != 0);
                v >> 1
            }),
            Operation::Rol => self.modify(bus, addr, accumulator, |cpu, v| {
                let carry_in = cpu.status.contains(StatusFlags::CARRY) as u8;
                cpu.status.set(StatusFlags::CARRY, v & 0x80 != 0);
                (v << 1) | carry_in
            }),
            Operation::Ror => self.modify(bus, addr, accumulator, |cpu, v| {
                let carry_in = (cpu.status.contains(StatusFlags::CARRY) as u8) << 7;
                cpu.status.set(StatusFlags::CARRY, v & 0x01 != 0);
                (v >> 1) | carry_in
            }),

            // Jumps and calls
            Operation::Jmp => self.pc = addr,
            Operation::Jsr => {
                // `addr` holds only the target's low byte. PC points at the
                // high byte, which is also the pushed return address.
                self.stack_dummy_read(bus);
                self.push(bus, (self.pc >> 8) as u8);
                self.push(bus, self.pc as u8);
                let high = self.fetch(bus) as u16;
                self.pc = (high << 8) | addr;
                self.record.effective = Some(self.pc);
            }
            Operation::Rts => {
                self.stack_dummy_read(bus);
                let low = self.pull(bus) as u16;
                let high = self.pull(bus) as u16;
                self.pc = (high << 8) | low;
                self.read(bus, self.pc);
                self.pc = self.pc.wrapping_add(1);
            }
            Operation::Rti => {
                self.stack_dummy_read(bus);
                let status = self.pull(bus);
                self.status = StatusFlags::from_stack(status);
                let low = self.pull(bus) as u16;
                let high = self.pull(bus) as u16;
                self.pc = (high << 8) | low;
            }
            Operation::Brk => {
                // Padding byte after BRK is skipped on return
                self.pc = self.pc.wrapping_add(1);
                self.push(bus, (self.pc >> 8) as u8);
                self.push(bus, self.pc as u8);
                self.push(bus, self.status_byte() | StatusFlags::STACK_ONLY.bits());
                self.status.insert(StatusFlags::INTERRUPT_DISABLE);
                let low = self.read(bus, IRQ_VECTOR) as u16;
                let high = self.read(bus, IRQ_VECTOR + 1) as u16;
                self.pc = (high << 8) | low;
            }

            // Branches
            Operation::Bcc => self.branch_if(bus, addr, !self.status.contains(StatusFlags::CARRY)),
            Operation::Bcs => self.branch_if(bus, addr, self.status.contains(StatusFlags::CARRY)),
            Operation::Beq => self.branch_if(bus, addr, self.status.contains(StatusFlags::ZERO)),
            Operation::Bne => self.branch_if(bus, addr, !self.status.contains(StatusFlags::ZERO)),
            Operation::Bmi => self.branch_if(bus, addr, self.status.contains(StatusFlags::NEGATIVE)),
            Operation::Bpl => self.branch_if(bus, addr, !self.status.contains(StatusFlags::NEGATIVE)),
            Operation::Bvs => self.branch_if(bus, addr, self.status.contains(StatusFlags::OVERFLOW)),
            Operation::Bvc => self.branch_if(bus, addr, !self.status.contains(StatusFlags::OVERFLOW)),

            // Stack
            Operation::Pha => self.push(bus, self.a),
            Operation::Php => {
                let value = self.status_byte() | StatusFlags::STACK_ONLY.bits();
                self.push(bus, value);
            }
            Operation::Pla => {
                self.stack_dummy_read(bus);
                self.a = self.pull(bus);
                self.set_zero_negative_flags(self.a);
            }
            Operation::Plp => {
                self.stack_dummy_read(bus);
                let status = self.pull(bus);
                self.status = StatusFlags::from_stack(status);
            }

            // Flags
            Operation::Clc => self.status.remove(StatusFlags::CARRY),
            Operation::Sec => self.status.insert(StatusFlags::CARRY),
            Operation::Cli => self.status.remove(StatusFlags::INTERRUPT_DISABLE),
            Operation::Sei => self.status.insert(StatusFlags::INTERRUPT_DISABLE),
            Operation::Cld => self.status.remove(StatusFlags::DECIMAL),
            Operation::Sed => self.status.insert(StatusFlags::DECIMAL),
            Operation::Clv => self.status.remove(StatusFlags::OVERFLOW),

            Operation::Nop => {}

            Operation::Bad => {
                let pc = self.record.pc;
                let byte = self.record.bytes().first().copied().unwrap_or(0);
                self.fault(byte, pc)
            }
        }
    }

    /// Read-modify-write. Memory operands see the unmodified value written
    /// back once before the result, as the hardware does.
    fn modify<F>(&mut self, bus: &mut dyn CpuBus, addr: u16, accumulator: bool, op: F)
    where
        F: FnOnce(&mut Cpu, u8) -> u8,
    {
        if accumulator {
            let value = self.a;
            let result = op(self, value);
            self.a = result;
            self.set_zero_negative_flags(result);
        } else {
            let value = self.read(bus, addr);
            self.write(bus, addr, value);
            let result = op(self, value);
            self.write(bus, addr, result);
            self.set_zero_negative_flags(result);
        }
    }

    fn adc(&mut self, value: u8) {
        let carry = self.status.contains(StatusFlags::CARRY) as u16;
        let sum = self.a as u16 + value as u16 + carry;
        let result = sum as u8;

        self.status.set(StatusFlags::CARRY, sum > 0xFF);
        // Signed overflow: both inputs share a sign the result doesn't
        self.status.set(
            StatusFlags::OVERFLOW,
            (self.a ^ result) & (value ^ result) & 0x80 != 0,
        );

        self.a = result;
        self.set_zero_negative_flags(self.a);
    }

    // Decimal mode is wired off on this CPU, so SBC is ADC of the complement
    fn sbc(&mut self, value: u8) {
        self.adc(!value);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.status.set(StatusFlags::CARRY, register >= value);
        self.set_zero_negative_flags(register.wrapping_sub(value));
    }

    /// Not taken: 2 cycles total. Taken: 3, or 4 when the target is on
    /// another page.
    fn branch_if(&mut self, bus: &mut dyn CpuBus, offset_addr: u16, condition: bool) {
        let offset = self.read(bus, offset_addr) as i8;
        if !condition {
            return;
        }

        let target = self.pc.wrapping_add(offset as i16 as u16);
        self.read(bus, self.pc);
        if (self.pc & 0xFF00) != (target & 0xFF00) {
            // PCL already updated, PCH still stale
            self.read(bus, (self.pc & 0xFF00) | (target & 0x00FF));
        }
        self.pc = target;
    }
}
