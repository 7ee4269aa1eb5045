// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use chrono::{NaiveDate, TimeDelta};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use timeperiod_core::period::TimeRange;
use timeperiod_timeline::{
    combiner::TimePeriodCombiner, gaps::TimeGapCalculator, intersector::TimePeriodIntersector,
    moments::TimeLineMomentCollection, subtractor::TimePeriodSubtractor,
};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

/// Random periods of up to a day, scattered over roughly a year.
fn random_periods(rng: &mut ChaCha8Rng, n: usize) -> Vec<TimeRange> {
    let origin = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid origin");
    (0..n)
        .map(|_| {
            let start = origin + TimeDelta::minutes(rng.random_range(0..525_600));
            TimeRange::from_duration(start, TimeDelta::minutes(rng.random_range(1..1_440)))
        })
        .collect()
}

fn bench_operators(c: &mut Criterion) {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut group = c.benchmark_group("timeline_operators");

    for n in SIZES {
        let periods = random_periods(&mut rng, n);
        let subtracting = random_periods(&mut rng, n / 2);
        let limits = TimeRange::new(
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid limit start"),
            NaiveDate::from_ymd_opt(2024, 9, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid limit end"),
        );

        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("moment_index", n), &periods, |b, p| {
            b.iter(|| {
                let index = TimeLineMomentCollection::from_periods(black_box(p));
                black_box(index.has_overlaps() || index.has_gaps())
            })
        });
        group.bench_with_input(BenchmarkId::new("combine", n), &periods, |b, p| {
            b.iter(|| TimePeriodCombiner::new().combine_periods(black_box(p)))
        });
        group.bench_with_input(BenchmarkId::new("intersect", n), &periods, |b, p| {
            b.iter(|| TimePeriodIntersector::new().intersect_periods(black_box(p), true))
        });
        group.bench_with_input(BenchmarkId::new("gaps", n), &periods, |b, p| {
            b.iter(|| TimeGapCalculator::new().gaps(black_box(p), Some(&limits)))
        });
        group.bench_with_input(BenchmarkId::new("subtract", n), &periods, |b, p| {
            b.iter(|| {
                TimePeriodSubtractor::new().subtract_periods(
                    black_box(p),
                    black_box(&subtracting),
                    true,
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_operators);
criterion_main!(benches);
