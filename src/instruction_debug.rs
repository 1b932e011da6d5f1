// 指令表调试和跟踪工具
// 独立于指令执行，只读取 CPU 状态
use crate::cpu::CPU;
use crate::cpu::instructions::Opcode;
use std::fmt;

// TRACE: PC | 指令字节 PC, PC+1, PC+2 | R0-R7
pub fn trace<W>(cpu: &CPU<W>) -> String {
    let registers: String = cpu
        .registers
        .gpr
        .iter()
        .map(|value| format!(" {:02X}", value))
        .collect();
    format!(
        "TRACE: {:02X} | {:02X} {:02X} {:02X} |{}",
        cpu.pc(),
        cpu.fetch_byte(0),
        cpu.fetch_byte(1),
        cpu.fetch_byte(2),
        registers
    )
}

/// 16x16 操作码表，未实现的位置显示 `----`。
pub struct InstructionTable;

impl fmt::Display for InstructionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(100);

        writeln!(f, "[inst-dump] {}", rule)?;
        write!(f, "[inst-dump]    ")?;
        for col in 0..16 {
            write!(f, " {:>5X}", col)?;
        }
        writeln!(f)?;
        writeln!(f, "[inst-dump] {}", rule)?;

        for row in 0..16u8 {
            write!(f, "[inst-dump]  {:X}0", row)?;
            for col in 0..16u8 {
                match Opcode::decode(row * 16 + col) {
                    Some(op) => write!(f, " {:>5}", op.mnemonic())?,
                    None => f.write_str("  ----")?,
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "[inst-dump] {}", rule)?;

        let implemented = Opcode::ALL.len();
        writeln!(
            f,
            "[inst-dump] 已实现指令: {}/256 ({:.1}%)",
            implemented,
            implemented as f64 / 256.0 * 100.0
        )
    }
}

pub fn format_instruction_table() -> String {
    InstructionTable.to_string()
}

// 显示指令表（用于调试和统计）
pub fn dump_instruction_table() {
    print!("{}", InstructionTable);
}
