use clap::Parser;
use ls8_emulator::cpu::loader::LoadError;
use ls8_emulator::instruction_debug;
use ls8_emulator::{Config, Emulator, ExitReason};
use std::io;
use std::path::{Path, PathBuf};
use std::process;

/// LS-8 模拟器
#[derive(Parser, Debug)]
#[command(name = "ls8", version, about = "LS-8 8 位寄存器机模拟器")]
struct Args {
    /// 程序文件（.ls8 二进制文本，.hex 为 Intel HEX）
    #[arg(required_unless_present = "inst_dump")]
    program: Option<PathBuf>,

    /// 启用调试模式，每条指令前打印 TRACE 行
    #[arg(short, long)]
    debug: bool,

    /// 最多执行的指令数（默认不限制）
    #[arg(long, value_name = "N")]
    max_instructions: Option<u64>,

    /// 显示已实现的指令统计表
    #[arg(short, long)]
    inst_dump: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    // 检查是否是指令表转储模式
    if args.inst_dump {
        instruction_debug::dump_instruction_table();
        return;
    }

    let Some(program) = args.program else {
        eprintln!("用法: ls8 <程序文件> [选项]");
        process::exit(1);
    };

    let mut emulator = Emulator::new(Config {
        debug: args.debug,
        max_instructions: args.max_instructions,
        ..Config::default()
    });

    match load(&mut emulator, &program) {
        Ok(len) => log::info!("程序成功从 {} 加载（{} 字节）", program.display(), len),
        Err(LoadError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
            eprintln!("ls8: {} 不存在", program.display());
            process::exit(2);
        }
        Err(e) => {
            eprintln!("加载程序失败: {}", e);
            process::exit(1);
        }
    }

    match emulator.run() {
        Ok(ExitReason::Halted) => {}
        Ok(ExitReason::UnknownOpcode { opcode, pc }) => {
            eprintln!("未知指令: 操作码 = {:#010b} ({}) 于地址 {:#04x}", opcode, opcode, pc);
        }
        Ok(ExitReason::InstructionLimit) => {
            eprintln!(
                "警告: 已执行 {} 条指令，可能存在死循环，强制退出",
                emulator.instruction_count
            );
        }
        Err(e) => {
            eprintln!("模拟器错误: {}", e);
            process::exit(1);
        }
    }
}

fn load(emulator: &mut Emulator, path: &Path) -> Result<usize, LoadError> {
    let is_hex = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("hex"));
    if is_hex {
        emulator.cpu.load_hex_program(path)
    } else {
        emulator.cpu.load_program(path)
    }
}
