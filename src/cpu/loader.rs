// 程序加载：LS-8 二进制文本格式与 Intel HEX 格式
use super::memory::MEMORY_SIZE;
use super::{CPU, CpuError};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("line {line}: invalid binary value {text:?}")]
    InvalidLine { line: usize, text: String },
    #[error("program needs {0} bytes, memory holds 256")]
    ProgramTooLarge(usize),
    #[error("Hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("line {line}: malformed HEX record")]
    MalformedRecord { line: usize },
    #[error("line {line}: HEX checksum mismatch")]
    ChecksumMismatch { line: usize },
    #[error(transparent)]
    Cpu(#[from] CpuError),
}

/// 解析 LS-8 文本程序：每行一个二进制数，`#` 之后为注释，空行跳过。
pub fn parse_program(source: &str) -> Result<Vec<u8>, LoadError> {
    let mut image = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let num = line.split('#').next().unwrap_or("").trim();
        if num.is_empty() {
            continue;
        }

        let value = u8::from_str_radix(num, 2).map_err(|_| LoadError::InvalidLine {
            line: index + 1,
            text: num.to_string(),
        })?;
        image.push(value);
    }

    if image.len() > MEMORY_SIZE {
        return Err(LoadError::ProgramTooLarge(image.len()));
    }
    Ok(image)
}

/// 解析 Intel HEX 文本，返回从地址 0 开始的内存镜像（空洞补 0）。
pub fn parse_intel_hex(source: &str) -> Result<Vec<u8>, LoadError> {
    let mut image = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();
        let Some(record) = line.strip_prefix(':') else {
            continue; // 忽略无效行
        };

        let bytes = hex::decode(record)?;
        // 长度 + 地址(2) + 类型 + 校验和
        if bytes.len() < 5 || bytes.len() != 5 + usize::from(bytes[0]) {
            return Err(LoadError::MalformedRecord { line: line_no });
        }
        let sum = bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
        if sum != 0 {
            return Err(LoadError::ChecksumMismatch { line: line_no });
        }

        let byte_count = usize::from(bytes[0]);
        let address = usize::from(u16::from_be_bytes([bytes[1], bytes[2]]));
        let record_type = bytes[3];

        match record_type {
            0x00 => {
                // 数据记录
                let end = address + byte_count;
                if end > MEMORY_SIZE {
                    return Err(LoadError::ProgramTooLarge(end));
                }
                if image.len() < end {
                    image.resize(end, 0);
                }
                image[address..end].copy_from_slice(&bytes[4..4 + byte_count]);
            }
            0x01 => break, // 文件结束记录
            _ => {}
        }
    }

    Ok(image)
}

impl<W> CPU<W> {
    // 从文件加载 LS-8 文本程序到内存
    pub fn load_program(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let source = fs::read_to_string(path)?;
        let image = parse_program(&source)?;
        self.load_image(&image)?;
        Ok(image.len())
    }

    // 从 Intel HEX 文件加载程序到内存
    pub fn load_hex_program(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let source = fs::read_to_string(path)?;
        let image = parse_intel_hex(&source)?;
        self.load_image(&image)?;
        Ok(image.len())
    }
}
