use criterion::{Criterion, criterion_group, criterion_main};
use mixology::matcher::{DEFAULT_MAX_DISTANCE, distance, filter_near};
use std::hint::black_box;

fn catalog() -> Vec<String> {
    let bases = [
        "Mojito",
        "Moscow Mule",
        "Margarita",
        "Negroni",
        "Old Fashioned",
        "Piña Colada",
        "Daiquiri",
        "Whiskey Sour",
        "Espresso Martini",
        "Long Island Iced Tea",
    ];
    (0..60)
        .flat_map(|i| bases.iter().map(move |b| format!("{b} #{i}")))
        .collect()
}

fn bench_distance(c: &mut Criterion) {
    c.bench_function("distance/short", |b| {
        b.iter(|| distance(black_box("Mojto"), black_box("Mojito")));
    });
    c.bench_function("distance/long", |b| {
        b.iter(|| distance(black_box("Long Island Ice Tea"), black_box("Long Island Iced Tea")));
    });
}

fn bench_filter_near(c: &mut Criterion) {
    let names = catalog();
    c.bench_function("filter_near/600_names", |b| {
        b.iter(|| filter_near(black_box("Mojto"), names.iter(), DEFAULT_MAX_DISTANCE));
    });
}

criterion_group!(benches, bench_distance, bench_filter_near);
criterion_main!(benches);
