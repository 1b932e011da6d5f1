// 算术逻辑单元
// ALU 指令的操作码形如 0b101x_xxxx，低 4 位即 ALU 操作编号
use super::registers::{FLAG_EQUAL, FLAG_GREATER, FLAG_LESS};
use super::{CPU, CpuError};
use std::cmp::Ordering;

pub const ALU_OP_MASK: u8 = 0x0F;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Mul,
    Cmp,
}

impl AluOp {
    pub fn from_id(id: u8) -> Result<Self, CpuError> {
        match id {
            0x0 => Ok(AluOp::Add),
            0x2 => Ok(AluOp::Mul),
            0x7 => Ok(AluOp::Cmp),
            _ => Err(CpuError::UnsupportedAluOp(id)),
        }
    }
}

// 比较两个无符号字节，返回只置一位的 FL
pub fn compare(a: u8, b: u8) -> u8 {
    match a.cmp(&b) {
        Ordering::Less => FLAG_LESS,
        Ordering::Greater => FLAG_GREATER,
        Ordering::Equal => FLAG_EQUAL,
    }
}

impl<W> CPU<W> {
    /// 对 Ra、Rb 的值执行 ALU 操作 `op_id`。
    ///
    /// ADD/MUL 结果按 8 位回绕写回 Ra；CMP 只更新 FL。
    pub fn alu(&mut self, op_id: u8, reg_a: usize, reg_b: usize) -> Result<(), CpuError> {
        let op = AluOp::from_id(op_id)?;
        // 先取寄存器内容，不能拿操作数字节本身比较
        let a = self.registers.read(reg_a)?;
        let b = self.registers.read(reg_b)?;

        match op {
            AluOp::Add => self.registers.write(reg_a, a.wrapping_add(b))?,
            AluOp::Mul => self.registers.write(reg_a, a.wrapping_mul(b))?,
            AluOp::Cmp => self.registers.fl = compare(a, b),
        }

        log::trace!("alu {:?} R{}={} R{}={}", op, reg_a, a, reg_b, b);
        Ok(())
    }
}
