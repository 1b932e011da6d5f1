use super::{CPU, CpuError};

pub const MEMORY_SIZE: usize = 256;

impl<W> CPU<W> {
    /// 读取内存，地址超出 0-255 返回 `OutOfRange`。
    pub fn read(&self, address: usize) -> Result<u8, CpuError> {
        self.ram
            .get(address)
            .copied()
            .ok_or(CpuError::OutOfRange(address))
    }

    pub fn write(&mut self, address: usize, value: u8) -> Result<(), CpuError> {
        let cell = self
            .ram
            .get_mut(address)
            .ok_or(CpuError::OutOfRange(address))?;
        *cell = value;
        Ok(())
    }

    // 取 PC+offset 处的字节，地址按 256 回绕
    pub(crate) fn fetch_byte(&self, offset: u8) -> u8 {
        self.ram[usize::from(self.registers.pc.wrapping_add(offset))]
    }
}
