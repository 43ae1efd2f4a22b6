use std::path::PathBuf;

use crate::error::{DqnError, Result};
use crate::memory::{Codec, ReplayMemory};

/// Builder for [`ReplayMemory`]
pub struct ReplayMemoryBuilder {
    capacity: Option<usize>,
    codec: Codec,
    seed: Option<u64>,
    preload: Option<PathBuf>,
}

impl ReplayMemoryBuilder {
    pub fn new() -> Self {
        ReplayMemoryBuilder {
            capacity: None,
            codec: Codec::default(),
            seed: None,
            preload: None,
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Seed the sampling RNG.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed the memory from a persisted transition log.
    pub fn preload<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.preload = Some(path.into());
        self
    }

    pub fn build(self) -> Result<ReplayMemory> {
        let capacity = self
            .capacity
            .ok_or_else(|| DqnError::invalid_parameter("capacity", "capacity not specified"))?;
        if capacity == 0 {
            return Err(DqnError::invalid_parameter("capacity", "capacity must be greater than 0"));
        }
        self.codec.validate()?;

        let mut memory = ReplayMemory::with_codec(capacity, self.codec);
        if let Some(seed) = self.seed {
            memory = memory.with_seed(seed);
        }
        if let Some(path) = &self.preload {
            memory.preload(path)?;
        }
        Ok(memory)
    }
}

impl Default for ReplayMemoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transition::{Observation, Transition};

    #[test]
    fn test_capacity_required_and_positive() {
        assert!(ReplayMemoryBuilder::new().build().is_err());
        assert!(ReplayMemoryBuilder::new().capacity(0).build().is_err());
        assert_eq!(ReplayMemoryBuilder::new().capacity(8).build().unwrap().capacity(), 8);
    }

    #[test]
    fn test_invalid_codec_rejected() {
        let result = ReplayMemoryBuilder::new()
            .capacity(4)
            .codec(Codec::Zlib { level: 12 })
            .build();
        assert!(matches!(result, Err(DqnError::InvalidParameter { .. })));
    }

    #[test]
    fn test_preload_from_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.bin");
        let mut source = ReplayMemory::new(4);
        for i in 0..3 {
            let obs = Observation::from_elem((1, 1, 2), i as f32);
            source.push(Transition::new(obs.clone(), 0, 0.0, obs, false)).unwrap();
        }
        source.persist(&path).unwrap();

        let memory = ReplayMemoryBuilder::new()
            .capacity(2)
            .seed(1)
            .preload(&path)
            .build()
            .unwrap();
        assert_eq!(memory.len(), 2);
        assert_eq!(memory.get(1).unwrap().state()[[0, 0, 0]], 1.0);
    }
}
