//! Shared helpers for simulation tests

use rand::RngCore;

/// Generator that returns the same word forever, for exact-outcome tests
#[derive(Debug, Clone, Copy)]
pub struct FixedRng(pub u64);

impl FixedRng {
    /// Every `random::<f64>()` draw is 0.0: no graze roll or fire roll ever passes
    pub fn low() -> Self {
        FixedRng(0)
    }

    /// Every `random::<f64>()` draw is just under 1.0: every roll passes
    pub fn high() -> Self {
        FixedRng(u64::MAX)
    }
}

impl RngCore for FixedRng {
    fn next_u32(&mut self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(self.0 as u8);
    }
}
