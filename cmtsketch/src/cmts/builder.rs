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
use super::CountMinTreeSketch;
use super::MAX_BASE_SIZE;
use super::MIN_BASE_SIZE;
use crate::error::Error;
use crate::hash::DEFAULT_SEED;

/// Builder for creating [`CountMinTreeSketch`] instances.
///
/// Provides two sizing modes:
/// - [`with_base_size()`](Self::with_base_size): Specify the number of leaf slots
/// - [`with_memory_budget()`](Self::with_memory_budget): Specify a byte budget for
///   all layers
#[derive(Debug, Clone)]
pub struct CountMinTreeSketchBuilder {
    base_size: Option<u64>,
    seed: u32,
}

impl Default for CountMinTreeSketchBuilder {
    fn default() -> Self {
        CountMinTreeSketchBuilder {
            base_size: None,
            seed: DEFAULT_SEED,
        }
    }
}

impl CountMinTreeSketchBuilder {
    /// Creates a builder for a sketch with `base_size` leaf slots.
    ///
    /// `base_size` must be a power of two in
    /// [`MIN_BASE_SIZE`]..=[`MAX_BASE_SIZE`]; this is checked by
    /// [`build()`](Self::build).
    ///
    /// # Examples
    ///
    /// ```
    /// # use cmtsketch::cmts::CountMinTreeSketchBuilder;
    /// let sketch = CountMinTreeSketchBuilder::with_base_size(1024).build().unwrap();
    /// assert_eq!(sketch.num_layers(), 11);
    /// ```
    pub fn with_base_size(base_size: u64) -> Self {
        CountMinTreeSketchBuilder {
            base_size: Some(base_size),
            seed: DEFAULT_SEED,
        }
    }

    /// Creates a builder for the largest sketch whose layers fit in
    /// `memory_bytes` bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cmtsketch::cmts::CountMinTreeSketchBuilder;
    /// let sketch = CountMinTreeSketchBuilder::with_memory_budget(4096)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(sketch.base_size(), 8192);
    /// ```
    pub fn with_memory_budget(memory_bytes: u64) -> Self {
        Self::with_base_size(Self::suggest_base_size(memory_bytes))
    }

    /// Sets the number of leaf slots, replacing any earlier size setting.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cmtsketch::cmts::CountMinTreeSketch;
    /// let sketch = CountMinTreeSketch::builder()
    ///     .base_size(256)
    ///     .seed(3)
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(sketch.layer_len(8), Some(1));
    /// ```
    pub fn base_size(mut self, base_size: u64) -> Self {
        self.base_size = Some(base_size);
        self
    }

    /// Sets a custom hash seed (default: 0).
    ///
    /// Sketches built with different seeds place the same key at different
    /// leaf positions.
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the sketch.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ConfigInvalid`](crate::error::ErrorKind::ConfigInvalid) if:
    /// - No size was configured
    /// - The base size is not a power of two, or lies outside
    ///   [`MIN_BASE_SIZE`]..=[`MAX_BASE_SIZE`]
    /// - The base size does not fit in `usize` on this target
    pub fn build(self) -> Result<CountMinTreeSketch, Error> {
        let base_size = self.base_size.ok_or_else(|| {
            Error::config_invalid(
                "must set a base size or memory budget before build()",
            )
        })?;
        let base_size = Self::validate_base_size(base_size)?;
        Ok(CountMinTreeSketch::from_parts(base_size, self.seed))
    }

    /// Suggests the largest power-of-two base size whose layers fit in
    /// `memory_bytes`.
    ///
    /// A sketch with base size `n` holds `2 * (2n - 1)` bits: one barrier and
    /// one counting bit per node of a perfect binary tree with `n` leaves. The
    /// result is capped at [`MAX_BASE_SIZE`] and is below [`MIN_BASE_SIZE`]
    /// when the budget is too small for any sketch.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cmtsketch::cmts::CountMinTreeSketchBuilder;
    /// // 1 MiB = 8,388,608 bits, enough for 2^21 leaves (8,388,606 bits).
    /// assert_eq!(CountMinTreeSketchBuilder::suggest_base_size(1 << 20), 1 << 21);
    /// assert_eq!(CountMinTreeSketchBuilder::suggest_base_size(0), 0);
    /// ```
    pub fn suggest_base_size(memory_bytes: u64) -> u64 {
        let bits = memory_bytes.saturating_mul(8);
        let max_leaves = (bits.saturating_add(2) / 4).min(MAX_BASE_SIZE);
        if max_leaves == 0 {
            return 0;
        }
        1 << (u64::BITS - 1 - max_leaves.leading_zeros())
    }

    fn validate_base_size(base_size: u64) -> Result<usize, Error> {
        if base_size < MIN_BASE_SIZE {
            return Err(
                Error::config_invalid(format!("base size must be at least {MIN_BASE_SIZE}"))
                    .with_context("base_size", base_size),
            );
        }
        if base_size > MAX_BASE_SIZE {
            return Err(
                Error::config_invalid(format!("base size must not exceed {MAX_BASE_SIZE}"))
                    .with_context("base_size", base_size),
            );
        }
        if !base_size.is_power_of_two() {
            return Err(Error::config_invalid("base size must be a power of two")
                .with_context("base_size", base_size));
        }
        usize::try_from(base_size).map_err(|err| {
            Error::config_invalid("base size does not fit in usize")
                .with_context("base_size", base_size)
                .set_source(err)
        })
    }
}
