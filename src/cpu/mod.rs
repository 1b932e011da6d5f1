pub mod alu;
pub mod instructions;
pub mod loader;
pub mod memory;
pub mod registers;

use memory::MEMORY_SIZE;
use registers::Registers;
use std::io;
use thiserror::Error;

// 空栈时 SP 的初始值，F5-FF 保留
pub const STACK_TOP: u8 = 0xF4;

#[derive(Debug, Error)]
pub enum CpuError {
    #[error("memory address {0:#04x} out of range")]
    OutOfRange(usize),
    #[error("invalid register: R{0}")]
    InvalidRegister(usize),
    #[error("unsupported ALU operation {0:#03x}")]
    UnsupportedAluOp(u8),
    #[error("unknown instruction {opcode:#010b} at {pc:#04x}")]
    UnknownOpcode { opcode: u8, pc: u8 },
    #[error("stack overflow at {pc:#04x}")]
    StackOverflow { pc: u8 },
    #[error("stack underflow at {pc:#04x} (SP = {sp:#04x})")]
    StackUnderflow { pc: u8, sp: u8 },
    #[error("failed to write program output: {0}")]
    Output(#[from] io::Error),
}

#[derive(Debug)]
pub struct CPU<W = io::Stdout> {
    pub registers: Registers,
    pub ram: [u8; MEMORY_SIZE], // 指令与堆栈共用的 256 字节内存
    pub stack_top: u8,          // 空栈时的 SP
    output: W,                  // PRN 输出
}

impl CPU<io::Stdout> {
    pub fn new() -> Self {
        CPU::with_output(io::stdout())
    }
}

impl Default for CPU<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> CPU<W> {
    pub fn with_output(output: W) -> Self {
        CPU::with_stack_top(output, STACK_TOP)
    }

    pub fn with_stack_top(output: W, stack_top: u8) -> Self {
        let mut registers = Registers::new();
        // SP 的值由 CPU 初始化，而不是寄存器堆本身
        registers.set_sp(stack_top);
        CPU {
            registers,
            ram: [0; MEMORY_SIZE],
            stack_top,
            output,
        }
    }

    pub fn register(&self, index: usize) -> Result<u8, CpuError> {
        self.registers.read(index)
    }

    pub fn set_register(&mut self, index: usize, value: u8) -> Result<(), CpuError> {
        self.registers.write(index, value)
    }

    pub fn pc(&self) -> u8 {
        self.registers.pc
    }

    pub fn flags(&self) -> u8 {
        self.registers.fl
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub(crate) fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// 从地址 0 开始写入程序镜像，其余内存保持原值。
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), CpuError> {
        for (address, &byte) in image.iter().enumerate() {
            self.write(address, byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cpu_initializes_stack_pointer() {
        let cpu = CPU::with_output(Vec::<u8>::new());
        assert_eq!(cpu.register(registers::SP).unwrap(), STACK_TOP);
        assert_eq!(cpu.pc(), 0);
        assert_eq!(cpu.flags(), 0);
        assert!(cpu.ram.iter().all(|&b| b == 0));
        for i in 0..registers::SP {
            assert_eq!(cpu.register(i).unwrap(), 0);
        }
    }

    #[test]
    fn load_image_starts_at_zero() {
        let mut cpu = CPU::with_output(Vec::<u8>::new());
        cpu.load_image(&[0x82, 0x00, 0x08]).unwrap();
        assert_eq!(&cpu.ram[..4], &[0x82, 0x00, 0x08, 0x00]);
    }

    #[test]
    fn load_image_rejects_oversized_program() {
        let mut cpu = CPU::with_output(Vec::<u8>::new());
        let image = vec![0x01; MEMORY_SIZE + 1];
        assert!(matches!(
            cpu.load_image(&image),
            Err(CpuError::OutOfRange(256))
        ));
    }

    #[test]
    fn custom_stack_top() {
        let cpu = CPU::with_stack_top(Vec::<u8>::new(), 0x80);
        assert_eq!(cpu.registers.sp(), 0x80);
        assert_eq!(cpu.stack_top, 0x80);
    }
}
