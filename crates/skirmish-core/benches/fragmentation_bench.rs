use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec2;
use skirmish_core::entity::EntityBuilder;
use skirmish_core::fragmentation::cascade;
use skirmish_core::{Registry, SimRng, Simulation};

fn bench_cascade(c: &mut Criterion) {
    let missile = EntityBuilder::frag_missile()
        .velocity(Vec2::new(300.0, 0.0))
        .build()
        .unwrap();
    let config = *missile.fragmentation().unwrap();
    let mut rng = SimRng::new(1);

    c.bench_function("cascade_500", |b| {
        b.iter_batched(
            Registry::new,
            |mut registry| {
                cascade(&missile, &config, false, &mut rng, &mut registry).unwrap();
                black_box(registry)
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_swarm_step(c: &mut Criterion) {
    // Detonate one missile so the world holds a full fragment swarm
    let mut sim = Simulation::new(2);
    let ship = sim.spawn(EntityBuilder::ship().at(Vec2::new(5000.0, 0.0)).build().unwrap());
    let missile = sim.spawn(EntityBuilder::frag_missile().target(ship).build().unwrap());
    sim.step().unwrap();
    if let Some(entity) = sim.registry_mut().get_mut(missile) {
        entity.mark_for_disposal();
    }
    sim.run(2).unwrap();

    c.bench_function("swarm_step", |b| {
        b.iter_batched(
            || sim.clone(),
            |mut sim| {
                sim.step().unwrap();
                black_box(sim.tick())
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut sim = Simulation::new(3);
    for i in 0..50 {
        #[allow(clippy::cast_precision_loss)]
        let y = i as f32 * 20.0;
        sim.spawn(EntityBuilder::ship().at(Vec2::new(0.0, y)).build().unwrap());
    }
    sim.run(30).unwrap();

    c.bench_function("snapshot_50_ships", |b| b.iter(|| black_box(sim.snapshot())));
}

criterion_group!(benches, bench_cascade, bench_swarm_step, bench_snapshot);
criterion_main!(benches);
