// 算术指令模块（ADD / MUL / CMP 都交给 ALU）
use super::super::alu::ALU_OP_MASK;
use super::super::{CPU, CpuError};
use super::{Opcode, Step};

impl<W> CPU<W> {
    // ADD/MUL/CMP Ra, Rb - 操作码低 4 位即 ALU 操作编号
    pub(crate) fn alu_instruction(
        &mut self,
        opcode: Opcode,
        reg_a: u8,
        reg_b: u8,
    ) -> Result<Step, CpuError> {
        self.alu(
            opcode.byte() & ALU_OP_MASK,
            usize::from(reg_a),
            usize::from(reg_b),
        )?;
        Ok(Step::Next)
    }
}
