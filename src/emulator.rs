// 模拟器包装层 - 负责运行循环、跟踪输出、指令计数等非硬件功能
use crate::cpu::instructions::Step;
use crate::cpu::{CPU, CpuError, STACK_TOP};
use crate::instruction_debug;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub debug: bool,                   // 每条指令前打印 TRACE 行
    pub max_instructions: Option<u64>, // 指令数上限，None 表示不限制
    pub stack_top: u8,                 // 空栈时的 SP
}

impl Default for Config {
    fn default() -> Self {
        Config {
            debug: false,
            max_instructions: None,
            stack_top: STACK_TOP,
        }
    }
}

/// 运行结束的原因。致命错误不在此列，由 `run` 以 `Err` 返回。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Halted,
    UnknownOpcode { opcode: u8, pc: u8 },
    InstructionLimit,
}

#[derive(Debug)]
pub struct Emulator<W = io::Stdout> {
    pub cpu: CPU<W>,
    pub debug: bool,
    pub max_instructions: Option<u64>,
    pub instruction_count: u64, // 总指令执行计数
    pub is_halted: bool,        // 是否已停机
}

impl Emulator<io::Stdout> {
    pub fn new(config: Config) -> Self {
        Emulator::with_output(config, io::stdout())
    }
}

impl<W> Emulator<W> {
    pub fn with_output(config: Config, output: W) -> Self {
        Emulator {
            cpu: CPU::with_stack_top(output, config.stack_top),
            debug: config.debug,
            max_instructions: config.max_instructions,
            instruction_count: 0,
            is_halted: false,
        }
    }

    fn limit_reached(&self) -> bool {
        self.max_instructions
            .is_some_and(|limit| self.instruction_count >= limit)
    }
}

impl<W: Write> Emulator<W> {
    // 执行单条指令（带跟踪）；返回 Some 表示运行结束
    pub fn execute_instruction(&mut self) -> Result<Option<ExitReason>, CpuError> {
        if self.debug {
            eprintln!("{}", instruction_debug::trace(&self.cpu));
        }

        self.instruction_count += 1;

        match self.cpu.step() {
            Ok(Step::Halt) => {
                self.is_halted = true;
                log::info!(
                    "HLT at {:#04x} after {} instructions",
                    self.cpu.pc(),
                    self.instruction_count
                );
                Ok(Some(ExitReason::Halted))
            }
            Ok(_) => Ok(None),
            // 未知指令只结束客户程序，不算模拟器故障
            Err(CpuError::UnknownOpcode { opcode, pc }) => {
                self.is_halted = true;
                log::warn!("unknown instruction {:#010b} at {:#04x}", opcode, pc);
                Ok(Some(ExitReason::UnknownOpcode { opcode, pc }))
            }
            Err(e) => {
                self.is_halted = true;
                log::error!("execution aborted: {}", e);
                Err(e)
            }
        }
    }

    /// 运行直到 HLT、未知指令、致命错误或达到指令上限。
    pub fn run(&mut self) -> Result<ExitReason, CpuError> {
        loop {
            // 检查指令执行数限制（防止死循环）
            if self.limit_reached() {
                log::warn!(
                    "instruction limit of {} reached at {:#04x}",
                    self.instruction_count,
                    self.cpu.pc()
                );
                return Ok(ExitReason::InstructionLimit);
            }

            if let Some(reason) = self.execute_instruction()? {
                return Ok(reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::instructions::Opcode;

    fn emulator(program: &[u8], config: Config) -> Emulator<Vec<u8>> {
        let mut emu = Emulator::with_output(config, Vec::new());
        emu.cpu.load_image(program).unwrap();
        emu
    }

    #[test]
    fn runs_until_halt() {
        let mut emu = emulator(
            &[Opcode::Ldi.byte(), 0, 42, Opcode::Prn.byte(), 0, Opcode::Hlt.byte()],
            Config::default(),
        );
        assert_eq!(emu.run().unwrap(), ExitReason::Halted);
        assert!(emu.is_halted);
        assert_eq!(emu.instruction_count, 3);
        assert_eq!(emu.cpu.output().as_slice(), b"42\n");
    }

    #[test]
    fn unknown_opcode_stops_without_error() {
        let mut emu = emulator(&[0b1111_1111], Config::default());
        assert_eq!(
            emu.run().unwrap(),
            ExitReason::UnknownOpcode {
                opcode: 0xFF,
                pc: 0
            }
        );
        assert_eq!(emu.instruction_count, 1);
        assert_eq!(emu.cpu.pc(), 0);
    }

    #[test]
    fn infinite_loop_hits_instruction_limit() {
        // R0 = 0; JMP R0
        let mut emu = emulator(
            &[Opcode::Jmp.byte(), 0],
            Config {
                max_instructions: Some(1000),
                ..Config::default()
            },
        );
        assert_eq!(emu.run().unwrap(), ExitReason::InstructionLimit);
        assert_eq!(emu.instruction_count, 1000);
        assert!(!emu.is_halted);
    }

    #[test]
    fn fatal_error_is_returned() {
        let mut emu = emulator(&[Opcode::Pop.byte(), 0], Config::default());
        assert!(matches!(emu.run(), Err(CpuError::StackUnderflow { .. })));
        assert!(emu.is_halted);
    }

    #[test]
    fn config_stack_top_reaches_cpu() {
        let emu = emulator(
            &[],
            Config {
                stack_top: 0x80,
                ..Config::default()
            },
        );
        assert_eq!(emu.cpu.registers.sp(), 0x80);
    }
}
