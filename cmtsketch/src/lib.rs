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
//! Count-Min-Tree sketches for approximate frequency counting.
//!
//! A Count-Min-Tree sketch answers "how many times has this key been seen?"
//! for high-cardinality streams such as network flows, in a fixed number of
//! bits and with error that shrinks as the stream gets more skewed. See
//! [`cmts`] for the sketch itself.

pub mod bitvec;
pub mod cmts;
pub mod error;
pub mod hash;
