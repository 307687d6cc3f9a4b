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
//! Count-Min-Tree sketch implementation for frequency estimation.
//!
//! The Count-Min-Tree sketch estimates how many times each key of a stream has
//! been seen. Counters live in a stack of bit layers that form an implicit
//! perfect binary tree over the leaf slots: a counter that grows promotes into
//! its ancestors, so large counts cost a few shared bits instead of a wide
//! per-slot register. Accuracy is best on skewed (Zipfian) streams, where only
//! a few keys ever reach the shared upper layers.
//!
//! # Usage
//!
//! ```rust
//! use cmtsketch::cmts::CountMinTreeSketch;
//!
//! let mut sketch = CountMinTreeSketch::new(1 << 16).unwrap();
//!
//! sketch.increment("apple");
//! sketch.increment("banana");
//! sketch.increment("banana");
//!
//! assert_eq!(sketch.get("banana"), 2);
//! assert_eq!(sketch.total_count(), 3);
//! ```
//!
//! # Configuration Helpers
//!
//! ```rust
//! use cmtsketch::cmts::CountMinTreeSketchBuilder;
//!
//! // Largest sketch fitting in 1 MiB, hashed with a custom seed.
//! let sketch = CountMinTreeSketchBuilder::with_memory_budget(1 << 20)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(sketch.base_size(), 1 << 21);
//! assert!(sketch.total_bits() <= 8 << 20);
//! ```
//!
//! # Concurrency
//!
//! [`CountMinTreeSketch::increment`] takes `&mut self`, so a sketch has a single
//! writer at a time. Upper layers and the shared overflow counter are touched by
//! many keys, so shared mutation must guard the whole sketch, e.g. with a
//! `Mutex<CountMinTreeSketch>`.

mod builder;
mod dump;
mod sketch;

pub use self::builder::CountMinTreeSketchBuilder;
pub use self::sketch::CountMinTreeSketch;

/// Smallest accepted base size.
pub const MIN_BASE_SIZE: u64 = 2;
/// Largest accepted base size.
pub const MAX_BASE_SIZE: u64 = 1 << 34;
