//! LS-8 8 位寄存器机模拟器。
//!
//! `cpu` 为机器状态与取指-译码-执行核心，`emulator` 负责运行循环，
//! `instruction_debug` 提供 TRACE 输出和指令表转储。

pub mod cpu;
pub mod emulator;
pub mod instruction_debug;

pub use cpu::loader::{LoadError, parse_intel_hex, parse_program};
pub use cpu::{CPU, CpuError};
pub use emulator::{Config, Emulator, ExitReason};
