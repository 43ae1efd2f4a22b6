use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::error::{DqnError, Result};
use crate::transition::Transition;

/// Storage codec applied to every transition on its way into the replay
/// memory. Any variant must decode to a value equal to what was encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Codec {
    /// bincode only
    Plain,
    /// bincode followed by zlib at the given level (0-9)
    Zlib { level: u32 },
}

impl Default for Codec {
    fn default() -> Self {
        Codec::Zlib { level: 6 }
    }
}

impl Codec {
    pub fn validate(&self) -> Result<()> {
        match self {
            Codec::Zlib { level } if *level > 9 => Err(DqnError::invalid_parameter(
                "codec.level".to_string(),
                format!("zlib level must be in 0..=9, got {}", level),
            )),
            _ => Ok(()),
        }
    }

    pub fn encode(&self, transition: &Transition) -> Result<Vec<u8>> {
        let bytes = bincode::serialize(transition)?;
        match self {
            Codec::Plain => Ok(bytes),
            Codec::Zlib { level } => {
                let mut encoder = ZlibEncoder::new(
                    Vec::with_capacity(bytes.len() / 4),
                    Compression::new(*level),
                );
                encoder.write_all(&bytes)?;
                Ok(encoder.finish()?)
            }
        }
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Transition> {
        match self {
            Codec::Plain => Ok(bincode::deserialize(bytes)?),
            Codec::Zlib { .. } => {
                let mut decoder = ZlibDecoder::new(bytes);
                let mut raw = Vec::new();
                decoder.read_to_end(&mut raw)?;
                Ok(bincode::deserialize(&raw)?)
            }
        }
    }
}
