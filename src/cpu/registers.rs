use super::CpuError;

pub const REGISTER_COUNT: usize = 8;
pub const SP: usize = 7; // R7 约定为堆栈指针

// FL 标志位（每次比较只置其中一位）
pub const FLAG_EQUAL: u8 = 0b0000_0001;
pub const FLAG_GREATER: u8 = 0b0000_0010;
pub const FLAG_LESS: u8 = 0b0000_0100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registers {
    pub gpr: [u8; REGISTER_COUNT], // 通用寄存器 R0-R7
    pub pc: u8,                    // 程序计数器
    pub fl: u8,                    // 标志寄存器
}

impl Registers {
    pub fn new() -> Self {
        Registers {
            gpr: [0; REGISTER_COUNT],
            pc: 0,
            fl: 0,
        }
    }

    /// 读取寄存器 Ri，索引超出 0-7 返回 `InvalidRegister`。
    pub fn read(&self, index: usize) -> Result<u8, CpuError> {
        self.gpr
            .get(index)
            .copied()
            .ok_or(CpuError::InvalidRegister(index))
    }

    pub fn write(&mut self, index: usize, value: u8) -> Result<(), CpuError> {
        let slot = self
            .gpr
            .get_mut(index)
            .ok_or(CpuError::InvalidRegister(index))?;
        *slot = value;
        Ok(())
    }

    pub fn sp(&self) -> u8 {
        self.gpr[SP]
    }

    pub fn set_sp(&mut self, value: u8) {
        self.gpr[SP] = value;
    }

    pub fn is_equal(&self) -> bool {
        self.fl & FLAG_EQUAL != 0
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
