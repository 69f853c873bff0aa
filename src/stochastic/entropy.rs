use rand::Rng;

/// Largest seed the seed control can hold.
pub const MAX_SEED: u32 = i32::MAX as u32;

/// Where freshly generated seeds come from.
pub trait EntropySource: Send {
    fn next_seed(&mut self) -> u32;
}

/// Draws seeds from the thread-local generator.
#[derive(Debug, Default)]
pub struct ThreadEntropy;

impl EntropySource for ThreadEntropy {
    fn next_seed(&mut self) -> u32 {
        rand::thread_rng().gen_range(0..=MAX_SEED)
    }
}

/// Replays a fixed list of seeds, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct SequenceEntropy {
    seeds: Vec<u32>,
    position: usize,
}

impl SequenceEntropy {
    pub fn new(seeds: Vec<u32>) -> Self {
        Self { seeds, position: 0 }
    }
}

impl EntropySource for SequenceEntropy {
    fn next_seed(&mut self) -> u32 {
        if self.seeds.is_empty() {
            return 0;
        }
        let seed = self.seeds[self.position % self.seeds.len()];
        self.position = (self.position + 1) % self.seeds.len();
        seed.min(MAX_SEED)
    }
}
