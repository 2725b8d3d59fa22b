//! Minimal Z80 disassembler for debugging.
//!
//! This module has no knowledge of flags, timing, or execution side
//! effects; it only maps opcode bytes to mnemonics and reports how many
//! bytes the instruction occupies, at the same plane granularity `Cpu::step`
//! decodes (unprefixed, CB, ED, DD/FD, DDCB/FDCB).
//!
//! Grounded in the reference crate's top-level `disasm.rs`, scaled down to
//! this core's narrower register set (no ADL/suffix modes).

const R8: [&str; 8] = ["B", "C", "D", "E", "H", "L", "(HL)", "A"];
const RP: [&str; 4] = ["BC", "DE", "HL", "SP"];
const RP2: [&str; 4] = ["BC", "DE", "HL", "AF"];
const CC: [&str; 8] = ["NZ", "Z", "NC", "C", "PO", "PE", "P", "M"];
const ALU: [&str; 8] = ["ADD A,", "ADC A,", "SUB ", "SBC A,", "AND ", "XOR ", "OR ", "CP "];
const ROT: [&str; 8] = ["RLC", "RRC", "RL", "RR", "SLA", "SRA", "SLL", "SRL"];

/// Disassemble one instruction starting at `bytes[0]`.
///
/// Returns the mnemonic and the number of bytes consumed. If `bytes` is too
/// short to decode a full instruction, returns `("???", 1)`.
pub fn disassemble(bytes: &[u8]) -> (String, usize) {
    if bytes.is_empty() {
        return ("???".to_string(), 1);
    }
    match bytes[0] {
        0xCB => disas_cb(bytes).unwrap_or_else(|| ("???".to_string(), 1)),
        0xED => disas_ed(bytes).unwrap_or_else(|| ("???".to_string(), 1)),
        0xDD => disas_index(bytes, "IX").unwrap_or_else(|| ("???".to_string(), 1)),
        0xFD => disas_index(bytes, "IY").unwrap_or_else(|| ("???".to_string(), 1)),
        _ => disas_main(bytes, "HL", |i| R8[i as usize].to_string())
            .unwrap_or_else(|| ("???".to_string(), 1)),
    }
}

fn fields(op: u8) -> (u8, u8, u8, u8, u8) {
    let x = op >> 6;
    let y = (op >> 3) & 7;
    let z = op & 7;
    (x, y, z, y >> 1, y & 1)
}

fn disas_main(bytes: &[u8], hl_name: &str, reg8: impl Fn(u8) -> String) -> Option<(String, usize)> {
    let op = bytes[0];
    let (x, y, z, p, q) = fields(op);
    let reg = reg8;
    let rp = |i: u8| if i == 2 { hl_name } else { RP[i as usize] };
    let rp2 = |i: u8| if i == 2 { hl_name } else { RP2[i as usize] };

    let (mnemonic, len) = match x {
        0 => match z {
            0 => match y {
                0 => ("NOP".to_string(), 1),
                1 => ("EX AF,AF'".to_string(), 1),
                2 => ("DJNZ d".to_string(), 2),
                3 => ("JR d".to_string(), 2),
                _ => (format!("JR {},d", CC[(y - 4) as usize]), 2),
            },
            1 => {
                if q == 0 {
                    (format!("LD {},nn", rp(p)), 3)
                } else {
                    (format!("ADD {},{}", hl_name, rp(p)), 1)
                }
            }
            2 => match y {
                0 => ("LD (BC),A".to_string(), 1),
                1 => ("LD A,(BC)".to_string(), 1),
                2 => ("LD (DE),A".to_string(), 1),
                3 => ("LD A,(DE)".to_string(), 1),
                4 => (format!("LD (nn),{}", hl_name), 3),
                5 => (format!("LD {},(nn)", hl_name), 3),
                6 => ("LD (nn),A".to_string(), 3),
                _ => ("LD A,(nn)".to_string(), 3),
            },
            3 => (format!("{} {}", if q == 0 { "INC" } else { "DEC" }, rp(p)), 1),
            4 => (format!("INC {}", reg(y)), 1),
            5 => (format!("DEC {}", reg(y)), 1),
            6 => (format!("LD {},n", reg(y)), 2),
            _ => (
                [
                    "RLCA", "RRCA", "RLA", "RRA", "DAA", "CPL", "SCF", "CCF",
                ][y as usize]
                    .to_string(),
                1,
            ),
        },
        1 => {
            if y == 6 && z == 6 {
                ("HALT".to_string(), 1)
            } else {
                (format!("LD {},{}", reg(y), reg(z)), 1)
            }
        }
        2 => (format!("{}{}", ALU[y as usize], reg(z)), 1),
        _ => match z {
            0 => (format!("RET {}", CC[y as usize]), 1),
            1 => {
                if q == 0 {
                    (format!("POP {}", rp2(p)), 1)
                } else {
                    (
                        ["RET", "EXX", &format!("JP ({})", hl_name), &format!("LD SP,{}", hl_name)]
                            [p as usize]
                            .to_string(),
                        1,
                    )
                }
            }
            2 => (format!("JP {},nn", CC[y as usize]), 3),
            3 => match y {
                0 => ("JP nn".to_string(), 3),
                1 => ("(CB prefix)".to_string(), 1),
                2 => ("OUT (n),A".to_string(), 2),
                3 => ("IN A,(n)".to_string(), 2),
                4 => (format!("EX (SP),{}", hl_name), 1),
                5 => ("EX DE,HL".to_string(), 1),
                6 => ("DI".to_string(), 1),
                _ => ("EI".to_string(), 1),
            },
            4 => (format!("CALL {},nn", CC[y as usize]), 3),
            5 => {
                if q == 0 {
                    (format!("PUSH {}", rp2(p)), 1)
                } else if p == 0 {
                    ("CALL nn".to_string(), 3)
                } else {
                    ("(prefix)".to_string(), 1)
                }
            }
            6 => (format!("{}n", ALU[y as usize]), 2),
            _ => (format!("RST {:02X}H", y * 8), 1),
        },
    };
    Some((mnemonic, len))
}

fn disas_cb(bytes: &[u8]) -> Option<(String, usize)> {
    let op = *bytes.get(1)?;
    let (x, y, z, _, _) = fields(op);
    let reg = R8[z as usize];
    let mnemonic = match x {
        0 => format!("{} {}", ROT[y as usize], reg),
        1 => format!("BIT {},{}", y, reg),
        2 => format!("RES {},{}", y, reg),
        _ => format!("SET {},{}", y, reg),
    };
    Some((mnemonic, 2))
}

fn disas_ed(bytes: &[u8]) -> Option<(String, usize)> {
    let op = *bytes.get(1)?;
    let (x, y, z, p, q) = fields(op);
    if x == 1 {
        let mnemonic = match z {
            0 if y == 6 => "IN (C)".to_string(),
            0 => format!("IN {},(C)", R8[y as usize]),
            1 if y == 6 => "OUT (C),0".to_string(),
            1 => format!("OUT (C),{}", R8[y as usize]),
            2 => format!("{} HL,{}", if q == 0 { "SBC" } else { "ADC" }, RP[p as usize]),
            3 if q == 0 => format!("LD (nn),{}", RP[p as usize]),
            3 => format!("LD {},(nn)", RP[p as usize]),
            4 => "NEG".to_string(),
            5 => "RETN/RETI".to_string(),
            6 => format!("IM {}", [0, 0, 1, 2, 0, 0, 1, 2][y as usize]),
            _ => match y {
                0 => "LD I,A".to_string(),
                1 => "LD R,A".to_string(),
                2 => "LD A,I".to_string(),
                3 => "LD A,R".to_string(),
                4 => "RRD".to_string(),
                5 => "RLD".to_string(),
                _ => "NOP".to_string(),
            },
        };
        let len = if z == 3 { 4 } else { 2 };
        return Some((mnemonic, len));
    }
    if x == 2 && y >= 4 && z <= 3 {
        const NAMES: [[&str; 4]; 4] = [
            ["LDI", "LDD", "LDIR", "LDDR"],
            ["CPI", "CPD", "CPIR", "CPDR"],
            ["INI", "IND", "INIR", "INDR"],
            ["OUTI", "OUTD", "OTIR", "OTDR"],
        ];
        return Some((NAMES[z as usize][(y - 4) as usize].to_string(), 2));
    }
    Some(("NOP".to_string(), 2))
}

fn disas_index(bytes: &[u8], idx_name: &str) -> Option<(String, usize)> {
    let inner = *bytes.get(1)?;
    if inner == 0xDD || inner == 0xFD {
        return Some(("(prefix)".to_string(), 1));
    }
    if inner == 0xED {
        let (m, len) = disas_ed(&bytes[1..])?;
        return Some((m, len + 1));
    }
    if inner == 0xCB {
        let d = *bytes.get(2)? as i8;
        let op = *bytes.get(3)?;
        let (x, y, _z, _, _) = fields(op);
        let operand = format!("({}{:+})", idx_name, d);
        let mnemonic = match x {
            0 => format!("{} {}", ROT[y as usize], operand),
            1 => format!("BIT {},{}", y, operand),
            2 => format!("RES {},{}", y, operand),
            _ => format!("SET {},{}", y, operand),
        };
        return Some((mnemonic, 4));
    }
    // Opcodes touching HL/H/L are rewritten for the index register: (HL)
    // becomes (IX+d)/(IY+d) (consuming one more byte, the displacement,
    // than the plain form accounts for) and bare H/L become IXH/IXL or
    // IYH/IYL (no extra byte — those are still single-byte-opcode forms).
    let (x, y, z, _, _) = fields(inner);
    let halt = x == 1 && y == 6 && z == 6;
    let needs_displacement = !halt
        && ((x == 0 && matches!(z, 4 | 5 | 6) && y == 6)
            || (x == 1 && (y == 6 || z == 6))
            || (x == 2 && z == 6));

    let hl_ind = format!("({}+d)", idx_name);
    let reg8 = move |i: u8| match i {
        6 => hl_ind.clone(),
        4 => format!("{idx_name}H"),
        5 => format!("{idx_name}L"),
        _ => R8[i as usize].to_string(),
    };
    disas_main(&bytes[1..], idx_name, reg8).map(|(m, len)| {
        (m, len + 1 + if needs_displacement { 1 } else { 0 })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_simple_unprefixed() {
        assert_eq!(disassemble(&[0x00]), ("NOP".to_string(), 1));
        assert_eq!(disassemble(&[0x80]), ("ADD A,B".to_string(), 1));
        assert_eq!(disassemble(&[0xC3, 0x00, 0x80]), ("JP nn".to_string(), 3));
    }

    #[test]
    fn decodes_cb_plane() {
        assert_eq!(disassemble(&[0xCB, 0x00]), ("RLC B".to_string(), 2));
        assert_eq!(disassemble(&[0xCB, 0x46]), ("BIT 0,(HL)".to_string(), 2));
    }

    #[test]
    fn decodes_ed_block() {
        assert_eq!(disassemble(&[0xED, 0xB0]), ("LDIR".to_string(), 2));
    }

    #[test]
    fn decodes_indexed_bit_op() {
        let (m, len) = disassemble(&[0xDD, 0xCB, 0x05, 0x46]);
        assert_eq!(m, "BIT 0,(IX+5)");
        assert_eq!(len, 4);
    }

    #[test]
    fn decodes_index_register_substitution() {
        let (m, _) = disassemble(&[0xDD, 0x21, 0x00, 0x10]);
        assert_eq!(m, "LD IX,nn");
    }

    #[test]
    fn indexed_memory_operands_account_for_the_displacement_byte() {
        // INC (IX+d): DD 34 d, 3 bytes.
        let (m, len) = disassemble(&[0xDD, 0x34, 0x05]);
        assert_eq!(m, "INC (IX+d)");
        assert_eq!(len, 3);

        // LD (IX+d),n: DD 36 d n, 4 bytes.
        let (m, len) = disassemble(&[0xDD, 0x36, 0x05, 0x42]);
        assert_eq!(m, "LD (IX+d),n");
        assert_eq!(len, 4);

        // LD B,(IY+d): FD 46 d, 3 bytes.
        let (m, len) = disassemble(&[0xFD, 0x46, 0x05]);
        assert_eq!(m, "LD B,(IY+d)");
        assert_eq!(len, 3);

        // ADD A,(IX+d): DD 86 d, 3 bytes.
        let (m, len) = disassemble(&[0xDD, 0x86, 0x05]);
        assert_eq!(m, "ADD A,(IX+d)");
        assert_eq!(len, 3);
    }

    #[test]
    fn half_register_substitution_uses_ixh_ixl_names_with_no_extra_byte() {
        // INC IXH: DD 24, 2 bytes, no displacement.
        let (m, len) = disassemble(&[0xDD, 0x24]);
        assert_eq!(m, "INC IXH");
        assert_eq!(len, 2);

        // LD IYL,n: FD 2E n, 3 bytes.
        let (m, len) = disassemble(&[0xFD, 0x2E, 0x12]);
        assert_eq!(m, "LD IYL,n");
        assert_eq!(len, 3);

        // ADD A,IXH: DD 84, 2 bytes.
        let (m, len) = disassemble(&[0xDD, 0x84]);
        assert_eq!(m, "ADD A,IXH");
        assert_eq!(len, 2);
    }
}
