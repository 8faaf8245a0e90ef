//! Lightweight xorshift32 PRNG for course layout

#[derive(Debug, Clone)]
pub struct CourseRng {
    state: u32,
}

impl CourseRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns -1.0 or 1.0
    pub fn sign(&mut self) -> f32 {
        if self.next_u32() & 1 == 0 {
            -1.0
        } else {
            1.0
        }
    }
}
