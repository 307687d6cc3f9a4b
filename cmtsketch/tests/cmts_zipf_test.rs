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
use std::collections::HashMap;

use cmtsketch::cmts::CountMinTreeSketch;
use googletest::assert_that;
use googletest::prelude::ge;
use googletest::prelude::le;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::Distribution;
use rand_distr::Zipf;

const NUM_KEYS: usize = 10_000;
const NUM_CHECKED: usize = 1_000;
const MAX_RELATIVE_ERROR: f64 = 0.05;

fn relative_error(estimate: u64, exact: u64) -> f64 {
    estimate.abs_diff(exact) as f64 / exact as f64
}

// Keys whose ancestor chains meet a heavier key's chain can be off by more
// than the bound, so a small share of outliers is tolerated.
#[test]
fn test_heavy_hitters_on_zipf_stream() {
    let mut sketch = CountMinTreeSketch::new(8_388_608).unwrap();
    let zipf = Zipf::new(NUM_KEYS as f64, 1.1).unwrap();
    let mut rng = StdRng::seed_from_u64(0);

    let mut exact: HashMap<String, u64> = HashMap::new();
    while exact.len() < NUM_KEYS {
        let rank = zipf.sample(&mut rng) as u64;
        let id = format!("flow-{rank:09}");
        sketch.increment(&id);
        *exact.entry(id).or_default() += 1;
    }
    assert_eq!(sketch.total_count(), exact.values().sum::<u64>());

    let mut heaviest: Vec<(&String, &u64)> = exact.iter().collect();
    heaviest.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    heaviest.truncate(NUM_CHECKED);

    let mut errors: Vec<f64> = heaviest
        .iter()
        .map(|(id, count)| relative_error(sketch.get(id), **count))
        .collect();
    errors.sort_by(f64::total_cmp);

    let within = errors.iter().filter(|e| **e <= MAX_RELATIVE_ERROR).count();
    assert_that!(within, ge(NUM_CHECKED * 95 / 100));
    assert_that!(errors[NUM_CHECKED * 9 / 10], le(MAX_RELATIVE_ERROR));
}

#[test]
fn test_light_stream_is_exact() {
    let mut sketch = CountMinTreeSketch::new(1 << 22).unwrap();
    let zipf = Zipf::new(200.0, 1.1).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let mut exact: HashMap<String, u64> = HashMap::new();
    for _ in 0..20_000 {
        let rank = zipf.sample(&mut rng) as u64;
        let id = format!("flow-{rank:09}");
        sketch.increment(&id);
        *exact.entry(id).or_default() += 1;
    }

    let exact_hits = exact
        .iter()
        .filter(|(id, count)| sketch.get(id) == **count)
        .count();
    assert_that!(exact_hits, ge(exact.len() * 98 / 100));
}
