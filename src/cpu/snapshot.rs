//! Save-state (de)serialization for host-driven snapshots.
//!
//! # References
//! - `hunterchen7-ti84ce` core's `Cpu::to_bytes`/`from_bytes`

use super::{Cpu, InterruptMode};

/// Error returned by [`Cpu::from_bytes`] when a snapshot buffer can't be
/// decoded back into CPU state.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The buffer was shorter than [`Cpu::SNAPSHOT_SIZE`].
    #[error("snapshot buffer too small: got {got} bytes, need {need}")]
    BufferTooSmall {
        /// Bytes actually supplied.
        got: usize,
        /// Bytes required.
        need: usize,
    },
}

impl Cpu {
    /// Size in bytes of a CPU state snapshot.
    pub const SNAPSHOT_SIZE: usize = 36;

    /// Serialize architectural state into a fixed-size buffer.
    pub fn to_bytes(&self) -> [u8; Self::SNAPSHOT_SIZE] {
        let mut buf = [0u8; Self::SNAPSHOT_SIZE];
        let mut pos = 0;

        macro_rules! put_u8 {
            ($v:expr) => {{
                buf[pos] = $v;
                pos += 1;
            }};
        }
        macro_rules! put_u16 {
            ($v:expr) => {{
                buf[pos..pos + 2].copy_from_slice(&($v as u16).to_le_bytes());
                pos += 2;
            }};
        }

        put_u8!(self.a);
        put_u8!(self.f);
        put_u8!(self.b);
        put_u8!(self.c);
        put_u8!(self.d);
        put_u8!(self.e);
        put_u8!(self.h);
        put_u8!(self.l);

        put_u8!(self.a_);
        put_u8!(self.f_);
        put_u8!(self.b_);
        put_u8!(self.c_);
        put_u8!(self.d_);
        put_u8!(self.e_);
        put_u8!(self.h_);
        put_u8!(self.l_);

        put_u16!(self.ix);
        put_u16!(self.iy);
        put_u16!(self.sp);
        put_u16!(self.pc);

        put_u8!(self.i);
        put_u8!(self.r);

        let mut flags = 0u8;
        if self.iff1 {
            flags |= 1 << 0;
        }
        if self.iff2 {
            flags |= 1 << 1;
        }
        if self.halted {
            flags |= 1 << 2;
        }
        if self.ei_pending {
            flags |= 1 << 3;
        }
        put_u8!(flags);

        put_u8!(match self.im {
            InterruptMode::Mode0 => 0,
            InterruptMode::Mode1 => 1,
            InterruptMode::Mode2 => 2,
        });

        buf[pos..pos + 8].copy_from_slice(&self.clocks.to_le_bytes());
        pos += 8;

        debug_assert_eq!(pos, Self::SNAPSHOT_SIZE);
        buf
    }

    /// Restore architectural state from a buffer produced by [`Cpu::to_bytes`].
    pub fn from_bytes(&mut self, buf: &[u8]) -> Result<(), SnapshotError> {
        if buf.len() < Self::SNAPSHOT_SIZE {
            return Err(SnapshotError::BufferTooSmall {
                got: buf.len(),
                need: Self::SNAPSHOT_SIZE,
            });
        }

        let mut pos = 0;
        macro_rules! get_u8 {
            () => {{
                let v = buf[pos];
                pos += 1;
                v
            }};
        }
        macro_rules! get_u16 {
            () => {{
                let v = u16::from_le_bytes([buf[pos], buf[pos + 1]]);
                pos += 2;
                v
            }};
        }

        self.a = get_u8!();
        self.f = get_u8!();
        self.b = get_u8!();
        self.c = get_u8!();
        self.d = get_u8!();
        self.e = get_u8!();
        self.h = get_u8!();
        self.l = get_u8!();

        self.a_ = get_u8!();
        self.f_ = get_u8!();
        self.b_ = get_u8!();
        self.c_ = get_u8!();
        self.d_ = get_u8!();
        self.e_ = get_u8!();
        self.h_ = get_u8!();
        self.l_ = get_u8!();

        self.ix = get_u16!();
        self.iy = get_u16!();
        self.sp = get_u16!();
        self.pc = get_u16!();

        self.i = get_u8!();
        self.r = get_u8!();

        let flags = get_u8!();
        self.iff1 = flags & (1 << 0) != 0;
        self.iff2 = flags & (1 << 1) != 0;
        self.halted = flags & (1 << 2) != 0;
        self.ei_pending = flags & (1 << 3) != 0;

        self.im = match get_u8!() {
            0 => InterruptMode::Mode0,
            1 => InterruptMode::Mode1,
            _ => InterruptMode::Mode2,
        };

        self.clocks = u64::from_le_bytes(buf[pos..pos + 8].try_into().unwrap());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::Bus;

    struct NullBus;
    impl Bus for NullBus {
        fn mem_read(&mut self, _addr: u16) -> u8 {
            0
        }
        fn mem_write(&mut self, _addr: u16, _val: u8) {}
        fn io_in(&mut self, _port: u16) -> u8 {
            0xFF
        }
        fn io_out(&mut self, _port: u16, _val: u8) {}
    }

    #[test]
    fn round_trip_preserves_state() {
        let mut bus = NullBus;
        let mut cpu = Cpu::new();
        cpu.step(&mut bus);
        cpu.a = 0x42;
        cpu.ix = 0x1234;
        cpu.im = InterruptMode::Mode2;
        cpu.iff1 = true;

        let snap = cpu.to_bytes();
        let mut restored = Cpu::new();
        restored.from_bytes(&snap).unwrap();

        assert_eq!(restored.a, cpu.a);
        assert_eq!(restored.ix, cpu.ix);
        assert_eq!(restored.im, cpu.im);
        assert_eq!(restored.iff1, cpu.iff1);
        assert_eq!(restored.pc, cpu.pc);
        assert_eq!(restored.clocks, cpu.clocks);
    }

    #[test]
    fn rejects_short_buffer() {
        let mut cpu = Cpu::new();
        let err = cpu.from_bytes(&[0u8; 4]).unwrap_err();
        assert!(matches!(err, SnapshotError::BufferTooSmall { .. }));
    }
}
