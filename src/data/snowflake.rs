use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::yield_now;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::data::EntityId;
use crate::StoreConfig;

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;

const MAX_NODE_ID: u64 = (1 << NODE_ID_BITS) - 1;
const MAX_SEQUENCE: u64 = (1 << SEQUENCE_BITS) - 1;

const NODE_ID_SHIFT: u64 = SEQUENCE_BITS;
const TIMESTAMP_SHIFT: u64 = SEQUENCE_BITS + NODE_ID_BITS;

/// Time-ordered entity id generator: millisecond timestamp, node id, sequence.
pub struct Snowflake {
    node_id: u64,
    state: AtomicU64, // (timestamp << SEQUENCE_BITS) | sequence
}

impl Snowflake {
    pub fn new() -> Self {
        Self::from(StoreConfig::from_env().node_id)
    }

    pub fn generate(&self) -> u64 {
        loop {
            let now = current_timestamp();
            let last = self.state.load(Ordering::Relaxed);
            let last_ts = last >> SEQUENCE_BITS;

            let next = if now > last_ts {
                now << SEQUENCE_BITS
            } else if now == last_ts && (last & MAX_SEQUENCE) < MAX_SEQUENCE {
                last + 1
            } else {
                // Sequence exhausted or clock moved backwards: wait for time to move on.
                yield_now();
                continue;
            };

            if self
                .state
                .compare_exchange(last, next, Ordering::SeqCst, Ordering::Relaxed)
                .is_ok()
            {
                let seq = next & MAX_SEQUENCE;
                return (now << TIMESTAMP_SHIFT) | (self.node_id << NODE_ID_SHIFT) | seq;
            }
        }
    }

    pub fn next_entity_id(&self) -> EntityId {
        EntityId(self.generate())
    }
}

impl Default for Snowflake {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for Snowflake {
    fn from(node_id: u64) -> Self {
        if node_id > MAX_NODE_ID {
            log::warn!("Snowflake node id {} truncated to {} bits", node_id, NODE_ID_BITS);
        }

        Self {
            node_id: node_id & MAX_NODE_ID,
            state: AtomicU64::new(0),
        }
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
