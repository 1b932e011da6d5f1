// 数据传送指令模块（寄存器、输出与堆栈）
use super::super::{CPU, CpuError};
use super::Step;
use std::io::Write;

impl<W> CPU<W> {
    // LDI Ra, #imm - 立即数装入寄存器
    pub(crate) fn ldi(&mut self, reg: u8, immediate: u8) -> Result<Step, CpuError> {
        self.registers.write(usize::from(reg), immediate)?;
        Ok(Step::Next)
    }

    // PUSH Ra - SP 先减 1，再把 Ra 写入 [SP]
    pub(crate) fn push(&mut self, reg: u8) -> Result<Step, CpuError> {
        let value = self.registers.read(usize::from(reg))?;
        self.push_value(value)?;
        Ok(Step::Next)
    }

    // POP Ra - 读 [SP] 到 Ra，再 SP 加 1
    pub(crate) fn pop(&mut self, reg: u8) -> Result<Step, CpuError> {
        let dst = usize::from(reg);
        self.registers.read(dst)?;
        let value = self.stack_peek()?;
        self.registers.write(dst, value)?;
        // POP R7 时在弹出的值上加 1
        self.registers.set_sp(self.registers.sp().wrapping_add(1));
        Ok(Step::Next)
    }

    // 堆栈向低地址增长，SP 为 0 时不能再压栈
    pub(crate) fn push_value(&mut self, value: u8) -> Result<(), CpuError> {
        let sp = self
            .registers
            .sp()
            .checked_sub(1)
            .ok_or(CpuError::StackOverflow {
                pc: self.registers.pc,
            })?;
        self.write(usize::from(sp), value)?;
        self.registers.set_sp(sp);
        Ok(())
    }

    pub(crate) fn pop_value(&mut self) -> Result<u8, CpuError> {
        let value = self.stack_peek()?;
        self.registers.set_sp(self.registers.sp().wrapping_add(1));
        Ok(value)
    }

    // SP 等于初始栈顶（空栈）或已到 0xFF（加 1 会回绕到 0）时弹栈为下溢
    fn stack_peek(&self) -> Result<u8, CpuError> {
        let sp = self.registers.sp();
        if sp == self.stack_top || sp == u8::MAX {
            return Err(CpuError::StackUnderflow {
                pc: self.registers.pc,
                sp,
            });
        }
        self.read(usize::from(sp))
    }
}

impl<W: Write> CPU<W> {
    // PRN Ra - 以十进制打印寄存器值
    pub(crate) fn prn(&mut self, reg: u8) -> Result<Step, CpuError> {
        let value = self.registers.read(usize::from(reg))?;
        writeln!(self.output_mut(), "{}", value)?;
        Ok(Step::Next)
    }
}
