//! Effect container and world throughput benchmarks.
//!
//! ## Usage
//!
//! ```bash
//! cargo bench --bench container
//! open target/criterion/report/index.html
//! ```

use std::sync::Arc;

use buff_engine::container::EffectContainer;
use buff_engine::core::{Character, EntityId, StatDelta, Stats};
use buff_engine::effects::{
    DefinitionRegistry, EffectCommands, EffectDefinition, EffectId, Hook, ModifyStats,
    RefreshPolicy,
};
use buff_engine::world::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Never-expiring definitions with spread-out priorities, half of them ticking.
fn definitions(count: u32) -> Vec<EffectDefinition> {
    (0..count)
        .map(|i| {
            let definition = EffectDefinition::new(EffectId::new(i), format!("Effect {}", i))
                .with_priority((i * 7 % 13) as i32)
                .with_max_stack(3)
                .with_refresh(RefreshPolicy::Replace)
                .forever();
            if i % 2 == 0 {
                definition
                    .with_tick_interval(0.5)
                    .on(Hook::Tick, ModifyStats::new(StatDelta::new().speed(1)))
            } else {
                definition
            }
        })
        .collect()
}

fn bench_container_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("container_add");

    for count in [8u32, 32, 128] {
        let defs: Vec<_> = definitions(count).into_iter().map(Arc::new).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_effects", count)),
            &defs,
            |b, defs| {
                b.iter(|| {
                    let mut container = EffectContainer::new(EntityId::new(0));
                    let mut target = Character::new("Bench", 100, Stats::default());
                    let mut commands = EffectCommands::new();
                    for definition in defs {
                        container.add(definition, None, &mut target, &mut commands).unwrap();
                    }
                    black_box(container.len())
                });
            },
        );
    }

    group.finish();
}

fn bench_world_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_advance");

    for entities in [10usize, 100] {
        let (registry, _) = DefinitionRegistry::load(definitions(16));
        let mut world = World::new(Arc::new(registry));
        for _ in 0..entities {
            let id = world.spawn(Character::new("Bench", 100, Stats::default()));
            for effect in 0..16 {
                let _ = world.add_effect(id, EffectId::new(effect), None);
            }
        }

        group.bench_function(BenchmarkId::from_parameter(format!("{}_entities", entities)), |b| {
            b.iter(|| black_box(world.advance(black_box(0.016))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_container_add, bench_world_advance);
criterion_main!(benches);
