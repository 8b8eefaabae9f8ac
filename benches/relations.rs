use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use amplitude_rels::algebra::{table_orbit, FINAL_ENTRIES, INTEGRABILITY};
use amplitude_rels::matcher::{match_in_word, SlotPolicy};
use amplitude_rels::sampler::nontrivial_word;
use amplitude_rels::symbol::{Symbol, WordFormat};

fn bench_table_orbit(c: &mut Criterion) {
    c.bench_function("final_entries_orbit", |b| {
        b.iter(|| table_orbit(&FINAL_ENTRIES).unwrap())
    });
}

fn bench_integrability_matching(c: &mut Criterion) {
    // the 14-term integrability relation is the documented hotspot
    let rel = &INTEGRABILITY[2];
    let mut rng = StdRng::seed_from_u64(0);
    let words: Vec<_> = (0..256)
        .map(|_| nontrivial_word(5, WordFormat::Full, &mut rng).unwrap())
        .collect();
    let symb = Symbol::new();

    c.bench_function("integrability_14term_match", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for word in &words {
                total += match_in_word(word, rel, SlotPolicy::Any, WordFormat::Full, &symb)
                    .unwrap()
                    .len();
            }
            total
        })
    });
}

criterion_group!(benches, bench_table_orbit, bench_integrability_matching);
criterion_main!(benches);
