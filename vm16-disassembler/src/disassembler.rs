//! Main disassembler logic

use crate::decoder::decode_at;
use crate::formatter::format;
use vm16_isa::{Address, MemoryImage};

/// Disassemble `count` instructions of `image` starting at `start`.
///
/// Undecodable words are listed as `.word` with the error in a comment and
/// the listing continues at the next word.
pub fn disassemble(image: &MemoryImage, start: Address, count: usize) -> String {
    let mut output = String::new();

    output.push_str("; VM16 Disassembly\n");
    output.push_str(&format!("; Start: 0x{:04X}\n", start));
    output.push_str(&format!("; Image digest: {}\n", image.digest()));
    output.push('\n');

    let fetch = |addr: Address| image.word(addr);
    let mut addr = start;

    for _ in 0..count {
        // Address label
        output.push_str(&format!("0x{:04X}:  ", addr));

        let width = match decode_at(addr, fetch) {
            Ok(instr) => {
                let width = instr.width();
                output.push_str(&format!("{:<16}", hex_words(image, addr, width)));
                output.push_str(&format(&instr));
                width
            }
            Err(e) => {
                output.push_str(&format!("{:<16}", hex_words(image, addr, 1)));
                output.push_str(&format!(".word 0x{:04X}  ; ERROR: {}", image.word(addr), e));
                1
            }
        };

        output.push('\n');
        addr = addr.wrapping_add(width as Address);
    }

    output
}

fn hex_words(image: &MemoryImage, addr: Address, width: usize) -> String {
    (0..width)
        .map(|i| format!("{:04X}", image.word(addr.wrapping_add(i as Address))))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_simple() {
        // ldi r0, 5 ; halt r0
        let image = MemoryImage::from_words(&[0x04, 0, 5, 0x78, 0]).unwrap();
        let asm = disassemble(&image, 0, 2);

        assert!(asm.contains("0x0000:  0004 0000 0005  ldi r0, 0x0005"));
        assert!(asm.contains("0x0003:  0078 0000       halt r0"));
    }

    #[test]
    fn test_disassemble_reports_bad_words() {
        let image = MemoryImage::from_words(&[0x00FF, 0x00]).unwrap();
        let asm = disassemble(&image, 0, 2);

        assert!(asm.contains(".word 0x00FF  ; ERROR"));
        assert!(asm.contains("0x0001:  0000"));
    }
}
