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
//! Fixed-size bit arrays.

/// A fixed-length array of bits packed into `u64` words.
///
/// The length is set at construction and never changes. Indexing past
/// [`len()`](Self::len) panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitVector {
    /// Number of addressable bits
    len: usize,
    /// Length = ceil(len / 64)
    words: Vec<u64>,
}

impl BitVector {
    /// Creates a bit vector of `len` bits, all clear.
    pub fn new(len: usize) -> Self {
        BitVector {
            len,
            words: vec![0u64; len.div_ceil(64)],
        }
    }

    /// Returns the number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the vector holds no bits at all.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the bit at `index`.
    pub fn get(&self, index: usize) -> bool {
        let (word, mask) = self.locate(index);
        (self.words[word] & mask) != 0
    }

    /// Sets the bit at `index`.
    pub fn set(&mut self, index: usize) {
        let (word, mask) = self.locate(index);
        self.words[word] |= mask;
    }

    /// Clears the bit at `index`.
    pub fn clear(&mut self, index: usize) {
        let (word, mask) = self.locate(index);
        self.words[word] &= !mask;
    }

    /// Sets the bit at `index` to `value`.
    pub fn set_to(&mut self, index: usize, value: bool) {
        if value {
            self.set(index);
        } else {
            self.clear(index);
        }
    }

    /// Flips the bit at `index` and returns its new value.
    pub fn flip(&mut self, index: usize) -> bool {
        let (word, mask) = self.locate(index);
        self.words[word] ^= mask;
        (self.words[word] & mask) != 0
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> u64 {
        self.words.iter().map(|word| word.count_ones() as u64).sum()
    }

    /// Iterates over the bits in index order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |index| self.get(index))
    }

    fn locate(&self, index: usize) -> (usize, u64) {
        assert!(
            index < self.len,
            "bit index {index} out of range for length {}",
            self.len
        );
        (index / 64, 1u64 << (index % 64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_clear() {
        let bits = BitVector::new(130);
        assert_eq!(bits.len(), 130);
        assert!(!bits.is_empty());
        assert_eq!(bits.count_ones(), 0);
        assert!(bits.iter().all(|bit| !bit));
    }

    #[test]
    fn test_set_get_clear_across_words() {
        let mut bits = BitVector::new(130);
        for index in [0, 63, 64, 129] {
            bits.set(index);
            assert!(bits.get(index));
        }
        assert_eq!(bits.count_ones(), 4);
        assert!(!bits.get(1));

        bits.clear(64);
        assert!(!bits.get(64));
        assert_eq!(bits.count_ones(), 3);
    }

    #[test]
    fn test_set_to_and_flip() {
        let mut bits = BitVector::new(8);
        bits.set_to(3, true);
        assert!(bits.get(3));
        bits.set_to(3, false);
        assert!(!bits.get(3));

        assert!(bits.flip(5));
        assert!(!bits.flip(5));
        assert_eq!(bits.count_ones(), 0);
    }

    #[test]
    fn test_zero_length() {
        let bits = BitVector::new(0);
        assert!(bits.is_empty());
        assert_eq!(bits.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_panics() {
        let bits = BitVector::new(64);
        bits.get(64);
    }
}
