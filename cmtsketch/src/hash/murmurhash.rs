// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.
use super::DEFAULT_SEED;

/// Maps arbitrary byte keys to 64-bit hashes and leaf positions.
///
/// Backed by the first half of MurmurHash3 x64/128. The same key and seed
/// always produce the same hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyIndexer {
    seed: u32,
}

impl KeyIndexer {
    pub fn with_seed(seed: u32) -> Self {
        KeyIndexer { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Returns the 64-bit hash of `key`.
    pub fn hash64(&self, key: &[u8]) -> u64 {
        let (h1, _) = mur3::murmurhash3_x64_128(key, self.seed);
        h1
    }

    /// Returns the leaf position of `key` in a layer of `base_size` slots.
    ///
    /// `base_size` must be non-zero.
    pub fn position(&self, key: &[u8], base_size: usize) -> usize {
        (self.hash64(key) % base_size as u64) as usize
    }
}

impl Default for KeyIndexer {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_reference_vectors() {
        let indexer = KeyIndexer::default();

        // remainder > 8
        let key = "The quick brown fox jumps over the lazy dog";
        assert_eq!(indexer.hash64(key.as_bytes()), 0xe34bbc7bbc071b6c);

        // change one bit
        let key = "The quick brown fox jumps over the lazy eog";
        assert_eq!(indexer.hash64(key.as_bytes()), 0x362108102c62d1c9);

        // remainder = 0
        let key = "The quick brown fox jumps over t";
        assert_eq!(indexer.hash64(key.as_bytes()), 0xdf6af91bb29bdacf);
    }

    #[test]
    fn test_position_is_stable_and_in_range() {
        let indexer = KeyIndexer::with_seed(7);
        for i in 0..1000u32 {
            let key = format!("flow-{i:09}");
            let pos = indexer.position(key.as_bytes(), 1 << 10);
            assert!(pos < 1 << 10);
            assert_eq!(pos, indexer.position(key.as_bytes(), 1 << 10));
        }
    }

    #[test]
    fn test_seed_changes_hash() {
        let key = b"flow-000000042";
        let h0 = KeyIndexer::with_seed(0).hash64(key);
        let h1 = KeyIndexer::with_seed(1).hash64(key);
        assert_ne!(h0, h1);
    }

    #[test]
    fn test_positions_spread_over_layer() {
        let indexer = KeyIndexer::default();
        let mut buckets = [0u32; 16];
        for i in 0..16_000u32 {
            let key = format!("flow-{i:09}");
            buckets[indexer.position(key.as_bytes(), 16)] += 1;
        }
        for count in buckets {
            assert!((700..1300).contains(&count), "bucket count {count}");
        }
    }
}
