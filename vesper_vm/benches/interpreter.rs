// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vesper_vm::embedding::{Engine, EngineOptions};

fn fib(c: &mut Criterion) {
    c.bench_function("fib(18)", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineOptions::default());
            let result = engine
                .execute("function fib(n) { return n < 2 ? n : fib(n - 1) + fib(n - 2); } fib(18)")
                .unwrap();
            black_box(result);
        })
    });
}

fn property_churn(c: &mut Criterion) {
    c.bench_function("property churn", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineOptions::default());
            let result = engine
                .execute(
                    "var o = {};\n\
                     for (var i = 0; i < 2000; i++) { o['k' + (i % 64)] = i; }\n\
                     Object.keys(o).length",
                )
                .unwrap();
            black_box(result);
        })
    });
}

fn json_round_trip(c: &mut Criterion) {
    c.bench_function("json round trip", |b| {
        b.iter(|| {
            let mut engine = Engine::new(EngineOptions::default());
            let result = engine
                .execute(
                    "var v = { list: [1, 2, 3, 4, 5], nested: { a: 'x', b: null } };\n\
                     for (var i = 0; i < 100; i++) { v = JSON.parse(JSON.stringify(v)); }\n\
                     v.list.length",
                )
                .unwrap();
            black_box(result);
        })
    });
}

criterion_group!(benches, fib, property_churn, json_round_trip);
criterion_main!(benches);
