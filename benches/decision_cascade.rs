use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tsc_agent::domain::models::{LaneGroup, LaneGroupState, PhaseCatalog, StateSnapshot};
use tsc_agent::services::{decide, PromptBuilder};

fn congested_state() -> StateSnapshot {
    let mut state = StateSnapshot::new();
    for (i, group) in LaneGroup::ALL.into_iter().enumerate() {
        let n = u32::try_from(i).unwrap_or_default();
        state.insert(
            group,
            LaneGroupState::new(n % 3 + 2, [n % 2 + 1, n, 2, 1], f64::from(n) * 7.5),
        );
    }
    state
}

fn bench_decide(c: &mut Criterion) {
    let state = congested_state();
    let mut group = c.benchmark_group("decide");
    for catalog in [PhaseCatalog::FourPhase, PhaseCatalog::EightPhase] {
        group.bench_with_input(
            BenchmarkId::from_parameter(catalog.phase_count()),
            &catalog,
            |b, &catalog| b.iter(|| decide(black_box(&state), catalog)),
        );
    }
    group.finish();
}

fn bench_prompt(c: &mut Criterion) {
    let state = congested_state();
    let builder = PromptBuilder::new(PhaseCatalog::FourPhase);
    c.bench_function("build_prompt", |b| b.iter(|| builder.build(black_box(&state))));
}

criterion_group!(benches, bench_decide, bench_prompt);
criterion_main!(benches);
