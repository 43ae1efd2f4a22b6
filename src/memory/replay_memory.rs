use std::collections::VecDeque;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::codec::Codec;
use crate::error::{DqnError, Result};
use crate::persist;
use crate::transition::Transition;

/// On-disk form of a replay memory, records in insertion order.
#[derive(Serialize, Deserialize)]
pub struct TransitionLog {
    pub codec: Codec,
    pub records: Vec<Vec<u8>>,
}

/// Fixed-capacity ring of encoded transitions.
///
/// Transitions are encoded by the memory's [`Codec`] on `push` and decoded
/// on every read. Once full, each push evicts the oldest transition.
pub struct ReplayMemory {
    buffer: VecDeque<Box<[u8]>>,
    capacity: usize,
    codec: Codec,
    rng: StdRng,
}

impl ReplayMemory {
    /// Empty memory using the default zlib codec.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0. [`ReplayMemoryBuilder`](crate::builders::ReplayMemoryBuilder)
    /// reports that case as [`DqnError::InvalidParameter`] instead.
    pub fn new(capacity: usize) -> Self {
        Self::with_codec(capacity, Codec::default())
    }

    /// Empty memory using `codec`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0, like [`ReplayMemory::new`].
    pub fn with_codec(capacity: usize, codec: Codec) -> Self {
        assert!(capacity > 0, "replay memory capacity must be positive");
        ReplayMemory {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
            codec,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reseed the sampling RNG for reproducible batches.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Create a memory seeded from a persisted transition log.
    pub fn with_preload(capacity: usize, codec: Codec, path: &Path) -> Result<Self> {
        if capacity == 0 {
            return Err(DqnError::invalid_parameter("capacity", "capacity must be greater than 0"));
        }
        let mut memory = Self::with_codec(capacity, codec);
        memory.preload(path)?;
        Ok(memory)
    }

    pub fn push(&mut self, transition: Transition) -> Result<()> {
        let encoded = self.codec.encode(&transition)?;
        self.push_encoded(encoded.into_boxed_slice());
        Ok(())
    }

    fn push_encoded(&mut self, record: Box<[u8]>) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(record);
    }

    /// Decode the transition at logical position `index` (0 is the oldest).
    pub fn get(&self, index: usize) -> Result<Transition> {
        let record = self.buffer.get(index).ok_or_else(|| {
            DqnError::invalid_parameter(
                "index".to_string(),
                format!("{} out of range for memory of length {}", index, self.buffer.len()),
            )
        })?;
        self.codec.decode(record)
    }

    pub fn latest(&self) -> Result<Transition> {
        match self.buffer.len() {
            0 => Err(DqnError::EmptyMemory),
            n => self.get(n - 1),
        }
    }

    /// Draw the logical indices of a batch of exactly `batch_size` entries.
    ///
    /// The newest transition is always included. The other slots are drawn
    /// without replacement from the older transitions; when there are too
    /// few of them, the remaining slots repeat the newest transition.
    pub fn sample_indices(&mut self, batch_size: usize) -> Result<Vec<usize>> {
        if self.buffer.is_empty() {
            return Err(DqnError::EmptyMemory);
        }
        if batch_size == 0 {
            return Err(DqnError::invalid_parameter("batch_size", "must be greater than 0"));
        }

        let newest = self.buffer.len() - 1;
        let draws = batch_size.min(self.buffer.len()) - 1;
        let mut indices = if draws > 0 {
            index::sample(&mut self.rng, newest, draws).into_vec()
        } else {
            Vec::with_capacity(batch_size)
        };
        indices.push(newest);
        indices.resize(batch_size, newest);
        Ok(indices)
    }

    pub fn sample(&mut self, batch_size: usize) -> Result<Vec<Transition>> {
        self.sample_indices(batch_size)?
            .into_iter()
            .map(|i| self.get(i))
            .collect()
    }

    /// Decode every stored transition, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Result<Transition>> + '_ {
        self.buffer.iter().map(move |record| self.codec.decode(record))
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Total size of the encoded records.
    pub fn encoded_bytes(&self) -> usize {
        self.buffer.iter().map(|r| r.len()).sum()
    }

    /// Append the leading `capacity` records of a transition log.
    ///
    /// Records stored under another codec are re-encoded. Returns the
    /// number of transitions taken from the log.
    pub fn preload(&mut self, path: &Path) -> Result<usize> {
        let log: TransitionLog = persist::load_bincode(path)?;
        let available = log.records.len();
        if available > self.capacity {
            warn!(
                available,
                capacity = self.capacity,
                "transition log exceeds memory capacity, truncating"
            );
        }

        let mut taken = 0;
        for record in log.records.into_iter().take(self.capacity) {
            if log.codec == self.codec {
                self.push_encoded(record.into_boxed_slice());
            } else {
                let transition = log.codec.decode(&record)?;
                self.push(transition)?;
            }
            taken += 1;
        }
        info!(taken, path = %path.display(), "preloaded transitions");
        Ok(taken)
    }

    /// Write the current contents as a transition log.
    pub fn persist(&self, path: &Path) -> Result<()> {
        let log = TransitionLog {
            codec: self.codec,
            records: self.buffer.iter().map(|r| r.to_vec()).collect(),
        };
        persist::save_bincode(&log, path)?;
        info!(count = log.records.len(), path = %path.display(), "persisted replay memory");
        Ok(())
    }
}
