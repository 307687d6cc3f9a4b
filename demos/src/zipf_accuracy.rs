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
//! Feeds a Zipf-distributed stream of flow ids into a Count-Min-Tree sketch
//! and prints how far each estimate lands from the exact count.

use std::collections::HashSet;
use std::process::ExitCode;

use clap::Parser;
use cmtsketch::cmts::CountMinTreeSketchBuilder;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::Distribution;
use rand_distr::Zipf;
use tracing::Level;
use tracing::error;
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Compare Count-Min-Tree estimates against exact counts on a Zipf stream")]
struct Args {
    /// Leaf slots of the sketch; a power of two.
    #[arg(long, default_value_t = 8_388_608)]
    base_size: u64,
    /// Number of distinct flow ids to observe before stopping.
    #[arg(long, default_value_t = 10_000)]
    keys: u64,
    /// Zipf exponent of the stream.
    #[arg(long, default_value_t = 1.1)]
    skew: f64,
    /// Seed of the stream generator.
    #[arg(long, default_value_t = 0)]
    stream_seed: u64,
    /// Seed of the sketch hash.
    #[arg(long, default_value_t = 0)]
    hash_seed: u32,
    /// Rows printed from the head, middle and tail of the ranking.
    #[arg(long, default_value_t = 20)]
    rows: usize,
    /// Log sketch internals.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    let mut sketch = match CountMinTreeSketchBuilder::with_base_size(args.base_size)
        .seed(args.hash_seed)
        .build()
    {
        Ok(sketch) => sketch,
        Err(err) => {
            error!(%err, "invalid sketch configuration");
            return ExitCode::FAILURE;
        }
    };
    let zipf = match Zipf::new(args.keys as f64, args.skew) {
        Ok(zipf) => zipf,
        Err(err) => {
            error!(%err, keys = args.keys, skew = args.skew, "invalid zipf parameters");
            return ExitCode::FAILURE;
        }
    };
    let mut rng = StdRng::seed_from_u64(args.stream_seed);

    // Index r - 1 holds the exact count of the flow of rank r.
    let mut expected = vec![0u64; args.keys as usize];
    let mut seen = HashSet::new();
    let mut hits = 0u64;
    while (seen.len() as u64) < args.keys {
        let rank = zipf.sample(&mut rng) as u64;
        sketch.increment(flow_id(rank));
        expected[(rank - 1) as usize] += 1;
        seen.insert(rank);
        hits += 1;
        if hits % 1_000_000 == 0 {
            info!(hits, cardinality = seen.len(), "streaming");
        }
    }
    info!(
        hits,
        cardinality = seen.len(),
        spire = sketch.spire(),
        total_bits = sketch.total_bits(),
        "stream done"
    );

    let len = expected.len();
    let middle = len / 2;
    let sections = [
        (0, args.rows.min(len)),
        (
            middle.saturating_sub(args.rows / 2),
            (middle + args.rows / 2).min(len),
        ),
        (len.saturating_sub(args.rows), len),
    ];
    let mut total_error = 0.0;
    let mut printed = 0usize;
    for (start, end) in sections {
        println!("---");
        for index in start..end {
            let rank = index as u64 + 1;
            let exact = expected[index];
            let estimate = sketch.get(flow_id(rank));
            let ratio = 100.0 * estimate as f64 / exact as f64 - 100.0;
            total_error += ratio.abs();
            printed += 1;
            println!("{}:\texpected {exact}\tcmts ~= {ratio:+.2}%", flow_id(rank));
        }
    }

    if printed > 0 {
        println!("---\nmean absolute error {:.2}%", total_error / printed as f64);
    }
    ExitCode::SUCCESS
}

fn flow_id(rank: u64) -> String {
    format!("flow-{rank:09}")
}
