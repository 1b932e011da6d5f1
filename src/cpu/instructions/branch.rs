// 跳转指令模块
// 跳转目标都经由寄存器间接给出，而不是立即数
use super::super::{CPU, CpuError};
use super::Step;

impl<W> CPU<W> {
    // CALL Ra - 压入返回地址 PC+2，跳到 Ra
    pub(crate) fn call(&mut self, reg: u8) -> Result<Step, CpuError> {
        let target = self.registers.read(usize::from(reg))?;
        let return_addr = self.registers.pc.wrapping_add(2);
        self.push_value(return_addr)?;
        Ok(Step::Jump(target))
    }

    // RET - 弹出返回地址到 PC
    pub(crate) fn ret(&mut self) -> Result<Step, CpuError> {
        let return_addr = self.pop_value()?;
        Ok(Step::Jump(return_addr))
    }

    // JMP Ra - 无条件跳转
    pub(crate) fn jmp(&mut self, reg: u8) -> Result<Step, CpuError> {
        let target = self.registers.read(usize::from(reg))?;
        Ok(Step::Jump(target))
    }

    // JEQ Ra - 相等标志置位时跳转，否则顺序执行（PC+2）
    // 不跳转时不读取 Ra
    pub(crate) fn jeq(&mut self, reg: u8) -> Result<Step, CpuError> {
        if self.registers.is_equal() {
            let target = self.registers.read(usize::from(reg))?;
            Ok(Step::Jump(target))
        } else {
            Ok(Step::Next)
        }
    }
}
