use rand::RngCore;

/// Random source whose every draw is the lowest value of its range.
///
/// Probabilities drawn from it are `0.0`, so any event with a non-zero probability fires and
/// uniform ranges return their lower bound.
pub(crate) struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0);
    }
}
