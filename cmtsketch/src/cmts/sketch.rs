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
use std::fmt;

use tracing::debug;
use tracing::trace;

use super::CountMinTreeSketchBuilder;
use crate::bitvec::BitVector;
use crate::error::Error;
use crate::hash::KeyIndexer;

/// One level of the implicit counter tree.
///
/// Layer `i` holds `base_size >> i` slots; slot `q` is the parent of slots
/// `2q` and `2q + 1` of layer `i - 1`.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Layer {
    /// Set when the counter rooted here has outgrown this layer
    pub(super) barrier: BitVector,
    /// One bit of the residual value of the counter
    pub(super) counting: BitVector,
}

impl Layer {
    fn new(len: usize) -> Self {
        Layer {
            barrier: BitVector::new(len),
            counting: BitVector::new(len),
        }
    }
}

/// Count-Min-Tree sketch for approximate frequency estimation.
///
/// Keys hash to a leaf slot of the widest layer. A counter is stored as a run
/// of barrier bits climbing the leaf's ancestor chain plus one counting bit per
/// layer of that run, so its depth grows with the logarithm of its value. Keys
/// whose ancestor chains meet share the upper bits, which is where the estimate
/// error comes from. Counters that climb past the root share a single overflow
/// counter, the spire.
///
/// Use [`CountMinTreeSketch::new`] or [`CountMinTreeSketchBuilder`] to construct
/// instances.
#[derive(Clone, PartialEq)]
pub struct CountMinTreeSketch {
    base_size: usize,
    indexer: KeyIndexer,
    /// Index 0 is the leaf layer, the last index is the root
    layers: Vec<Layer>,
    spire: u64,
    total_count: u64,
}

impl CountMinTreeSketch {
    /// Creates a sketch with `base_size` leaf slots and the default seed.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid)
    /// unless `base_size` is a power of two in
    /// [`MIN_BASE_SIZE`](super::MIN_BASE_SIZE)..=[`MAX_BASE_SIZE`](super::MAX_BASE_SIZE).
    ///
    /// # Examples
    ///
    /// ```
    /// # use cmtsketch::cmts::CountMinTreeSketch;
    /// let sketch = CountMinTreeSketch::new(8).unwrap();
    /// assert_eq!(sketch.num_layers(), 4);
    ///
    /// assert!(CountMinTreeSketch::new(12).is_err());
    /// ```
    pub fn new(base_size: u64) -> Result<Self, Error> {
        CountMinTreeSketchBuilder::with_base_size(base_size).build()
    }

    /// Returns a builder for creating a sketch.
    pub fn builder() -> CountMinTreeSketchBuilder {
        CountMinTreeSketchBuilder::default()
    }

    /// `base_size` must already be validated as a power of two.
    pub(super) fn from_parts(base_size: usize, seed: u32) -> Self {
        let num_layers = base_size.trailing_zeros() as usize + 1;
        let layers = (0..num_layers)
            .map(|depth| Layer::new(base_size >> depth))
            .collect();
        let sketch = CountMinTreeSketch {
            base_size,
            indexer: KeyIndexer::with_seed(seed),
            layers,
            spire: 0,
            total_count: 0,
        };
        debug!(
            base_size,
            num_layers,
            seed,
            total_bits = sketch.total_bits(),
            "created count-min-tree sketch"
        );
        sketch
    }

    // ========================================================================
    // Update and Query Operations
    // ========================================================================

    /// Records one occurrence of `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cmtsketch::cmts::CountMinTreeSketch;
    /// let mut sketch = CountMinTreeSketch::new(1024).unwrap();
    /// sketch.increment("flow-1");
    /// sketch.increment(b"flow-1");
    /// sketch.increment(String::from("flow-1"));
    /// assert_eq!(sketch.get("flow-1"), 3);
    /// ```
    pub fn increment(&mut self, key: impl AsRef<[u8]>) {
        let pos = self.position(key.as_ref());
        self.encode(pos);
        self.total_count = self.total_count.saturating_add(1);
    }

    /// Returns the estimated number of occurrences of `key`.
    ///
    /// Keys that were never incremented read 0 unless they collide with an
    /// incremented key.
    pub fn get(&self, key: impl AsRef<[u8]>) -> u64 {
        self.decode(self.position(key.as_ref()))
    }

    // ========================================================================
    // Properties
    // ========================================================================

    /// Returns the number of slots in the leaf layer.
    pub fn base_size(&self) -> usize {
        self.base_size
    }

    /// Returns the number of layers, `log2(base_size) + 1`.
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Returns the length of the bit vectors of layer `depth`, or `None` above
    /// the root.
    pub fn layer_len(&self, depth: usize) -> Option<usize> {
        self.layers.get(depth).map(|layer| layer.barrier.len())
    }

    /// Returns the hash seed.
    pub fn seed(&self) -> u32 {
        self.indexer.seed()
    }

    /// Returns the overflow counter shared by every saturated counter.
    pub fn spire(&self) -> u64 {
        self.spire
    }

    /// Returns the exact number of increments recorded.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Returns whether no increment has been recorded.
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    /// Returns the number of bits held by all layers, `2 * (2 * base_size - 1)`.
    pub fn total_bits(&self) -> u64 {
        2 * (2 * self.base_size as u64 - 1)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    fn position(&self, key: &[u8]) -> usize {
        self.indexer.position(key, self.base_size)
    }

    /// Adds one to the counter at leaf `pos` and rewrites its bits.
    pub(super) fn encode(&mut self, pos: usize) {
        let value = self.decode(pos).saturating_add(1);
        let depth = bit_length(value.saturating_add(2) / 4).min(self.num_layers());
        let mut residual = value - filled_capacity(depth);

        // Barriers on layers 0..depth, residual bits on layers 0..=depth.
        for (i, layer) in self.layers.iter_mut().enumerate().take(depth + 1) {
            let slot = pos >> i;
            if i < depth {
                layer.barrier.set(slot);
            }
            layer.counting.set_to(slot, residual & 1 != 0);
            residual >>= 1;
        }

        // Only a counter whose run covers every layer has bits left over here.
        if residual > self.spire {
            trace!(old = self.spire, new = residual, "spire raised");
            self.spire = residual;
        }
    }

    /// Reconstructs the counter at leaf `pos`.
    pub(super) fn decode(&self, pos: usize) -> u64 {
        let depth = self
            .layers
            .iter()
            .enumerate()
            .take_while(|(i, layer)| layer.barrier.get(pos >> i))
            .count();

        let mut residual = 0u64;
        for (i, layer) in self.layers.iter().enumerate().take(depth + 1) {
            if layer.counting.get(pos >> i) {
                residual |= 1 << i;
            }
        }

        if depth == self.num_layers() {
            residual = self
                .spire
                .saturating_mul(1 << depth)
                .saturating_add(residual);
        }

        residual.saturating_add(filled_capacity(depth))
    }

    pub(super) fn layers(&self) -> &[Layer] {
        &self.layers
    }
}

impl fmt::Debug for CountMinTreeSketch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountMinTreeSketch")
            .field("base_size", &self.base_size)
            .field("num_layers", &self.layers.len())
            .field("seed", &self.indexer.seed())
            .field("spire", &self.spire)
            .field("total_count", &self.total_count)
            .finish()
    }
}

/// Number of bits needed to write `x` in binary; 0 for 0.
fn bit_length(x: u64) -> usize {
    (u64::BITS - x.leading_zeros()) as usize
}

/// Sum of the capacities of the `depth` lowest layers, `2 * (2^depth - 1)`.
fn filled_capacity(depth: usize) -> u64 {
    2 * ((1u64 << depth) - 1)
}
