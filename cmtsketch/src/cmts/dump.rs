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
//! Human-readable rendering of the sketch bits for debugging.
//!
//! The format is not stable.

use std::fmt;

use super::CountMinTreeSketch;
use crate::bitvec::BitVector;

struct LayerDump<'a>(&'a CountMinTreeSketch);

impl fmt::Display for LayerDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "s  {:064b}", self.0.spire())?;
        for (depth, layer) in self.0.layers().iter().enumerate().rev() {
            write_bits(f, 'b', depth, &layer.barrier)?;
            write_bits(f, 'c', depth, &layer.counting)?;
        }
        Ok(())
    }
}

fn write_bits(
    f: &mut fmt::Formatter<'_>,
    tag: char,
    depth: usize,
    bits: &BitVector,
) -> fmt::Result {
    write!(f, "{tag}{depth} ")?;
    for bit in bits.iter() {
        f.write_str(if bit { "1" } else { "0" })?;
    }
    writeln!(f)
}

impl CountMinTreeSketch {
    /// Renders the spire and every layer, root first.
    ///
    /// Each layer contributes a `b<depth>` line of barrier bits and a
    /// `c<depth>` line of counting bits, in slot order. Meant for small
    /// sketches; the output has `2 * (2 * base_size - 1)` digits.
    ///
    /// # Examples
    ///
    /// ```
    /// # use cmtsketch::cmts::CountMinTreeSketch;
    /// let mut sketch = CountMinTreeSketch::new(2).unwrap();
    /// sketch.increment("a");
    /// let dump = sketch.dump_layers();
    /// assert_eq!(dump.lines().count(), 5);
    /// assert!(dump.lines().nth(1).unwrap().starts_with("b1 "));
    /// ```
    pub fn dump_layers(&self) -> String {
        LayerDump(self).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_after_updates() {
        let mut sketch = CountMinTreeSketch::from_parts(4, 0);
        // Value 2 at leaf 1: leaf barrier set, residual 0.
        sketch.encode(1);
        sketch.encode(1);
        // Value 1 at leaf 2: residual 1 in the leaf counting bit.
        sketch.encode(2);

        let expected = format!(
            "s  {}\nb2 0\nc2 0\nb1 00\nc1 00\nb0 0100\nc0 0010\n",
            "0".repeat(64)
        );
        assert_eq!(sketch.dump_layers(), expected);
    }
}
