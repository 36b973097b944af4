//! Opcode decoding table.
//!
//! Only the 151 documented NMOS opcodes are populated; every other slot
//! holds [`Opcode::BAD`], which the core treats as a fatal fault.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressingMode {
    Implicit,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Relative,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Indirect,
    IndexedIndirect,
    IndirectIndexed,
    Bad,
}

impl AddressingMode {
    /// Operand bytes following the opcode.
    pub fn operand_len(self) -> usize {
        match self {
            AddressingMode::Implicit | AddressingMode::Accumulator | AddressingMode::Bad => 0,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Adc,
    And,
    Asl,
    Bcc,
    Bcs,
    Beq,
    Bit,
    Bmi,
    Bne,
    Bpl,
    Brk,
    Bvc,
    Bvs,
    Clc,
    Cld,
    Cli,
    Clv,
    Cmp,
    Cpx,
    Cpy,
    Dec,
    Dex,
    Dey,
    Eor,
    Inc,
    Inx,
    Iny,
    Jmp,
    Jsr,
    Lda,
    Ldx,
    Ldy,
    Lsr,
    Nop,
    Ora,
    Pha,
    Php,
    Pla,
    Plp,
    Rol,
    Ror,
    Rti,
    Rts,
    Sbc,
    Sec,
    Sed,
    Sei,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    Bad,
}

impl Operation {
    pub fn mnemonic(self) -> &'static str {
        use Operation::*;
        match self {
            Adc => "ADC",
            And => "AND",
            Asl => "ASL",
            Bcc => "BCC",
            Bcs => "BCS",
            Beq => "BEQ",
            Bit => "BIT",
            Bmi => "BMI",
            Bne => "BNE",
            Bpl => "BPL",
            Brk => "BRK",
            Bvc => "BVC",
            Bvs => "BVS",
            Clc => "CLC",
            Cld => "CLD",
            Cli => "CLI",
            Clv => "CLV",
            Cmp => "CMP",
            Cpx => "CPX",
            Cpy => "CPY",
            Dec => "DEC",
            Dex => "DEX",
            Dey => "DEY",
            Eor => "EOR",
            Inc => "INC",
            Inx => "INX",
            Iny => "INY",
            Jmp => "JMP",
            Jsr => "JSR",
            Lda => "LDA",
            Ldx => "LDX",
            Ldy => "LDY",
            Lsr => "LSR",
            Nop => "NOP",
            Ora => "ORA",
            Pha => "PHA",
            Php => "PHP",
            Pla => "PLA",
            Plp => "PLP",
            Rol => "ROL",
            Ror => "ROR",
            Rti => "RTI",
            Rts => "RTS",
            Sbc => "SBC",
            Sec => "SEC",
            Sed => "SED",
            Sei => "SEI",
            Sta => "STA",
            Stx => "STX",
            Sty => "STY",
            Tax => "TAX",
            Tay => "TAY",
            Tsx => "TSX",
            Txa => "TXA",
            Txs => "TXS",
            Tya => "TYA",
            Bad => "???",
        }
    }

    /// Stores and read-modify-write instructions always spend the indexed
    /// fix-up cycle, crossed page or not.
    pub fn writes_memory(self) -> bool {
        use Operation::*;
        matches!(self, Sta | Stx | Sty | Asl | Lsr | Rol | Ror | Inc | Dec)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub op: Operation,
    pub mode: AddressingMode,
}

impl Opcode {
    pub const BAD: Opcode = Opcode {
        op: Operation::Bad,
        mode: AddressingMode::Bad,
    };

    pub fn is_bad(self) -> bool {
        self.op == Operation::Bad || self.mode == AddressingMode::Bad
    }
}

impl Default for Opcode {
    fn default() -> Self {
        Opcode::BAD
    }
}

pub fn decode(byte: u8) -> Opcode {
    OPCODE_TABLE[byte as usize]
}

pub const OPCODE_TABLE: [Opcode; 256] = build_table();

const fn build_table() -> [Opcode; 256] {
    let mut table = [Opcode::BAD; 256];
    let mut i = 0;
    while i < DEFINITIONS.len() {
        let (byte, op, mode) = DEFINITIONS[i];
        table[byte as usize] = Opcode { op, mode };
        i += 1;
    }
    table
}

use AddressingMode as M;
use Operation as O;

const DEFINITIONS: &[(u8, Operation, AddressingMode)] = &[
    (0x69, O::Adc, M::Immediate),
    (0x65, O::Adc, M::ZeroPage),
    (0x75, O::Adc, M::ZeroPageX),
    (0x6D, O::Adc, M::Absolute),
    (0x7D, O::Adc, M::AbsoluteX),
    (0x79, O::Adc, M::AbsoluteY),
    (0x61, O::Adc, M::IndexedIndirect),
    (0x71, O::Adc, M::IndirectIndexed),

    (0x29, O::And, M::Immediate),
    (0x25, O::And, M::ZeroPage),
    (0x35, O::And, M::ZeroPageX),
    (0x2D, O::And, M::Absolute),
    (0x3D, O::And, M::AbsoluteX),
    (0x39, O::And, M::AbsoluteY),
    (0x21, O::And, M::IndexedIndirect),
    (0x31, O::And, M::IndirectIndexed),

    (0x0A, O::Asl, M::Accumulator),
    (0x06, O::Asl, M::ZeroPage),
    (0x16, O::Asl, M::ZeroPageX),
    (0x0E, O::Asl, M::Absolute),
    (0x1E, O::Asl, M::AbsoluteX),

    (0x90, O::Bcc, M::Relative),
    (0xB0, O::Bcs, M::Relative),
    (0xF0, O::Beq, M::Relative),
    (0x30, O::Bmi, M::Relative),
    (0xD0, O::Bne, M::Relative),
    (0x10, O::Bpl, M::Relative),
    (0x50, O::Bvc, M::Relative),
    (0x70, O::Bvs, M::Relative),

    (0x24, O::Bit, M::ZeroPage),
    (0x2C, O::Bit, M::Absolute),

    (0x00, O::Brk, M::Implicit),

    (0x18, O::Clc, M::Implicit),
    (0xD8, O::Cld, M::Implicit),
    (0x58, O::Cli, M::Implicit),
    (0xB8, O::Clv, M::Implicit),

    (0xC9, O::Cmp, M::Immediate),
    (0xC5, O::Cmp, M::ZeroPage),
    (0xD5, O::Cmp, M::ZeroPageX),
    (0xCD, O::Cmp, M::Absolute),
    (0xDD, O::Cmp, M::AbsoluteX),
    (0xD9, O::Cmp, M::AbsoluteY),
    (0xC1, O::Cmp, M::IndexedIndirect),
    (0xD1, O::Cmp, M::IndirectIndexed),

    (0xE0, O::Cpx, M::Immediate),
    (0xE4, O::Cpx, M::ZeroPage),
    (0xEC, O::Cpx, M::Absolute),

    (0xC0, O::Cpy, M::Immediate),
    (0xC4, O::Cpy, M::ZeroPage),
    (0xCC, O::Cpy, M::Absolute),

    (0xC6, O::Dec, M::ZeroPage),
    (0xD6, O::Dec, M::ZeroPageX),
    (0xCE, O::Dec, M::Absolute),
    (0xDE, O::Dec, M::AbsoluteX),

    (0xCA, O::Dex, M::Implicit),
    (0x88, O::Dey, M::Implicit),

    (0x49, O::Eor, M::Immediate),
    (0x45, O::Eor, M::ZeroPage),
    (0x55, O::Eor, M::ZeroPageX),
    (0x4D, O::Eor, M::Absolute),
    (0x5D, O::Eor, M::AbsoluteX),
    (0x59, O::Eor, M::AbsoluteY),
    (0x41, O::Eor, M::IndexedIndirect),
    (0x51, O::Eor, M::IndirectIndexed),

    (0xE6, O::Inc, M::ZeroPage),
    (0xF6, O::Inc, M::ZeroPageX),
    (0xEE, O::Inc, M::Absolute),
    (0xFE, O::Inc, M::AbsoluteX),

    (0xE8, O::Inx, M::Implicit),
    (0xC8, O::Iny, M::Implicit),

    (0x4C, O::Jmp, M::Absolute),
    (0x6C, O::Jmp, M::Indirect),
    (0x20, O::Jsr, M::Absolute),

    (0xA9, O::Lda, M::Immediate),
    (0xA5, O::Lda, M::ZeroPage),
    (0xB5, O::Lda, M::ZeroPageX),
    (0xAD, O::Lda, M::Absolute),
    (0xBD, O::Lda, M::AbsoluteX),
    (0xB9, O::Lda, M::AbsoluteY),
    (0xA1, O::Lda, M::IndexedIndirect),
    (0xB1, O::Lda, M::IndirectIndexed),

    (0xA2, O::Ldx, M::Immediate),
    (0xA6, O::Ldx, M::ZeroPage),
    (0xB6, O::Ldx, M::ZeroPageY),
    (0xAE, O::Ldx, M::Absolute),
    (0xBE, O::Ldx, M::AbsoluteY),

    (0xA0, O::Ldy, M::Immediate),
    (0xA4, O::Ldy, M::ZeroPage),
    (0xB4, O::Ldy, M::ZeroPageX),
    (0xAC, O::Ldy, M::Absolute),
    (0xBC, O::Ldy, M::AbsoluteX),

    (0x4A, O::Lsr, M::Accumulator),
    (0x46, O::Lsr, M::ZeroPage),
    (0x56, O::Lsr, M::ZeroPageX),
    (0x4E, O::Lsr, M::Absolute),
    (0x5E, O::Lsr, M::AbsoluteX),

    (0xEA, O::Nop, M::Implicit),

    (0x09, O::Ora, M::Immediate),
    (0x05, O::Ora, M::ZeroPage),
    (0x15, O::Ora, M::ZeroPageX),
    (0x0D, O::Ora, M::Absolute),
    (0x1D, O::Ora, M::AbsoluteX),
    (0x19, O::Ora, M::AbsoluteY),
    (0x01, O::Ora, M::IndexedIndirect),
    (0x11, O::Ora, M::IndirectIndexed),

    (0x48, O::Pha, M::Implicit),
    (0x08, O::Php, M::Implicit),
    (0x68, O::Pla, M::Implicit),
    (0x28, O::Plp, M::Implicit),

    (0x2A, O::Rol, M::Accumulator),
    (0x26, O::Rol, M::ZeroPage),
    (0x36, O::Rol, M::ZeroPageX),
    (0x2E, O::Rol, M::Absolute),
    (0x3E, O::Rol, M::AbsoluteX),

    (0x6A, O::Ror, M::Accumulator),
    (0x66, O::Ror, M::ZeroPage),
    (0x76, O::Ror, M::ZeroPageX),
    (0x6E, O::Ror, M::Absolute),
    (0x7E, O::Ror, M::AbsoluteX),

    (0x40, O::Rti, M::Implicit),
    (0x60, O::Rts, M::Implicit),

    (0xE9, O::Sbc, M::Immediate),
    (0xE5, O::Sbc, M::ZeroPage),
    (0xF5, O::Sbc, M::ZeroPageX),
    (0xED, O::Sbc, M::Absolute),
    (0xFD, O::Sbc, M::AbsoluteX),
    (0xF9, O::Sbc, M::AbsoluteY),
    (0xE1, O::Sbc, M::IndexedIndirect),
    (0xF1, O::Sbc, M::IndirectIndexed),

    (0x38, O::Sec, M::Implicit),
    (0xF8, O::Sed, M::Implicit),
    (0x78, O::Sei, M::Implicit),

    (0x85, O::Sta, M::ZeroPage),
    (0x95, O::Sta, M::ZeroPageX),
    (0x8D, O::Sta, M::Absolute),
    (0x9D, O::Sta, M::AbsoluteX),
    (0x99, O::Sta, M::AbsoluteY),
    (0x81, O::Sta, M::IndexedIndirect),
    (0x91, O::Sta, M::IndirectIndexed),

    (0x86, O::Stx, M::ZeroPage),
    (0x96, O::Stx, M::ZeroPageY),
    (0x8E, O::Stx, M::Absolute),

    (0x84, O::Sty, M::ZeroPage),
    (0x94, O::Sty, M::ZeroPageX),
    (0x8C, O::Sty, M::Absolute),

    (0xAA, O::Tax, M::Implicit),
    (0xA8, O::Tay, M::Implicit),
    (0xBA, O::Tsx, M::Implicit),
    (0x8A, O::Txa, M::Implicit),
    (0x9A, O::Txs, M::Implicit),
    (0x98, O::Tya, M::Implicit),
];
