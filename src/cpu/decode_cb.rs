//! CB-prefixed plane: register/(HL) rotate, shift, BIT, RES, SET.
//!
//! # References
//! - Zilog Z80 CPU User Manual

use super::Cpu;
use crate::bus::Bus;

impl Cpu {
    pub(crate) fn decode_cb(&mut self, bus: &mut impl Bus) -> u32 {
        let op = self.fetch_byte(bus);
        self.inc_r();
        let x = op >> 6;
        let y = (op >> 3) & 7;
        let z = op & 7;

        match x {
            0 => {
                let val = self.get_reg8(bus, z);
                let r = self.rot8(y, val);
                self.set_reg8(bus, z, r);
                if z == 6 {
                    15
                } else {
                    8
                }
            }
            1 => {
                let val = self.get_reg8(bus, z);
                self.op_bit(y, val);
                if z == 6 {
                    12
                } else {
                    8
                }
            }
            2 => {
                let val = self.get_reg8(bus, z) & !(1 << y);
                self.set_reg8(bus, z, val);
                if z == 6 {
                    15
                } else {
                    8
                }
            }
            _ => {
                let val = self.get_reg8(bus, z) | (1 << y);
                self.set_reg8(bus, z, val);
                if z == 6 {
                    15
                } else {
                    8
                }
            }
        }
    }
}
