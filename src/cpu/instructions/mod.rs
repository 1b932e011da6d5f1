pub mod arithmetic;
pub mod branch;
pub mod data_transfer;

use super::{CPU, CpuError};
use std::fmt;
use std::io::Write;

// LS-8 操作码编码：bit7-6 为操作数个数，bit5 为 ALU 指令，bit4 为改写 PC 的指令
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Hlt = 0b0000_0001,
    Ret = 0b0001_0001,
    Push = 0b0100_0101,
    Pop = 0b0100_0110,
    Prn = 0b0100_0111,
    Call = 0b0101_0000,
    Jmp = 0b0101_0100,
    Jeq = 0b0101_0101,
    Ldi = 0b1000_0010,
    Add = 0b1010_0000,
    Mul = 0b1010_0010,
    Cmp = 0b1010_0111,
}

impl Opcode {
    pub const ALL: [Opcode; 12] = [
        Opcode::Hlt,
        Opcode::Ret,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Prn,
        Opcode::Call,
        Opcode::Jmp,
        Opcode::Jeq,
        Opcode::Ldi,
        Opcode::Add,
        Opcode::Mul,
        Opcode::Cmp,
    ];

    // 不在指令表中的字节返回 None
    pub fn decode(byte: u8) -> Option<Opcode> {
        match byte {
            0b0000_0001 => Some(Opcode::Hlt),
            0b0001_0001 => Some(Opcode::Ret),
            0b0100_0101 => Some(Opcode::Push),
            0b0100_0110 => Some(Opcode::Pop),
            0b0100_0111 => Some(Opcode::Prn),
            0b0101_0000 => Some(Opcode::Call),
            0b0101_0100 => Some(Opcode::Jmp),
            0b0101_0101 => Some(Opcode::Jeq),
            0b1000_0010 => Some(Opcode::Ldi),
            0b1010_0000 => Some(Opcode::Add),
            0b1010_0010 => Some(Opcode::Mul),
            0b1010_0111 => Some(Opcode::Cmp),
            _ => None,
        }
    }

    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn operand_count(self) -> u8 {
        self.byte() >> 6
    }

    pub fn is_alu(self) -> bool {
        self.byte() & 0b0010_0000 != 0
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Hlt => "HLT",
            Opcode::Ret => "RET",
            Opcode::Push => "PUSH",
            Opcode::Pop => "POP",
            Opcode::Prn => "PRN",
            Opcode::Call => "CALL",
            Opcode::Jmp => "JMP",
            Opcode::Jeq => "JEQ",
            Opcode::Ldi => "LDI",
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Cmp => "CMP",
        }
    }
}

/// 一次取指得到的指令：操作码加上 PC+1、PC+2 处的两个候选操作数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub operand_a: u8,
    pub operand_b: u8,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode {
            Opcode::Ldi => write!(f, "LDI R{}, {}", self.operand_a, self.operand_b),
            op if op.operand_count() == 2 => {
                write!(f, "{} R{}, R{}", op.mnemonic(), self.operand_a, self.operand_b)
            }
            op if op.operand_count() == 1 => write!(f, "{} R{}", op.mnemonic(), self.operand_a),
            op => f.write_str(op.mnemonic()),
        }
    }
}

// 单条指令执行后 PC 的去向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Jump(u8),
    Halt,
}

impl<W> CPU<W> {
    // 取指并译码，不修改任何状态
    pub fn fetch_instruction(&self) -> Result<Instruction, CpuError> {
        let ir = self.fetch_byte(0);
        let opcode = Opcode::decode(ir).ok_or(CpuError::UnknownOpcode {
            opcode: ir,
            pc: self.registers.pc,
        })?;
        Ok(Instruction {
            opcode,
            operand_a: self.fetch_byte(1),
            operand_b: self.fetch_byte(2),
        })
    }
}

impl<W: Write> CPU<W> {
    /// 执行 PC 处的一条指令并更新 PC。
    ///
    /// 出错时 PC 保持不变。
    pub fn step(&mut self) -> Result<Step, CpuError> {
        let inst = self.fetch_instruction()?;
        let (a, b) = (inst.operand_a, inst.operand_b);

        log::debug!("[{:#04x}] {}", self.registers.pc, inst);

        let step = match inst.opcode {
            Opcode::Ldi => self.ldi(a, b)?,
            Opcode::Prn => self.prn(a)?,
            Opcode::Add | Opcode::Mul | Opcode::Cmp => self.alu_instruction(inst.opcode, a, b)?,
            Opcode::Push => self.push(a)?,
            Opcode::Pop => self.pop(a)?,
            Opcode::Call => self.call(a)?,
            Opcode::Ret => self.ret()?,
            Opcode::Jmp => self.jmp(a)?,
            Opcode::Jeq => self.jeq(a)?,
            Opcode::Hlt => Step::Halt,
        };

        match step {
            Step::Next => {
                let len = 1 + inst.opcode.operand_count();
                self.registers.pc = self.registers.pc.wrapping_add(len);
            }
            Step::Jump(target) => self.registers.pc = target,
            Step::Halt => {}
        }
        Ok(step)
    }
}
