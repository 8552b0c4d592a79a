//! Property tests for container and scheduler laws.

use std::sync::Arc;

use proptest::prelude::*;

use buff_engine::container::EffectContainer;
use buff_engine::core::{Character, EntityId, Stats, Target, TickPolicy};
use buff_engine::effects::{
    EffectCommands, EffectDefinition, EffectId, RefreshPolicy, RemovalPolicy,
};
use buff_engine::scheduler::EffectScheduler;

#[derive(Clone, Debug)]
enum Op {
    Add(usize),
    Remove(usize),
    Advance(f32),
}

fn definition_strategy(id: u32) -> impl Strategy<Value = EffectDefinition> {
    (
        -3i32..3,
        1u32..4,
        prop_oneof![
            Just(RefreshPolicy::Keep),
            Just(RefreshPolicy::Add),
            Just(RefreshPolicy::Replace)
        ],
        prop_oneof![Just(RemovalPolicy::Clear), Just(RemovalPolicy::Reduce)],
        0.5f32..6.0,
        prop_oneof![Just(0.0f32), 0.25f32..2.0],
        any::<bool>(),
    )
        .prop_map(
            move |(priority, max_stack, refresh, removal, duration, tick_interval, forever)| {
                let definition = EffectDefinition::new(EffectId::new(id), format!("E{}", id))
                    .with_priority(priority)
                    .with_max_stack(max_stack)
                    .with_refresh(refresh)
                    .with_removal(removal)
                    .with_duration(duration)
                    .with_tick_interval(tick_interval);
                if forever {
                    definition.forever()
                } else {
                    definition
                }
            },
        )
}

fn definitions_strategy() -> impl Strategy<Value = Vec<Arc<EffectDefinition>>> {
    (1usize..7)
        .prop_flat_map(|count| {
            (0..count)
                .map(|i| definition_strategy(i as u32))
                .collect::<Vec<_>>()
        })
        .prop_map(|defs| defs.into_iter().map(Arc::new).collect())
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            3 => (0usize..8).prop_map(Op::Add),
            1 => (0usize..8).prop_map(Op::Remove),
            1 => (0.0f32..3.0).prop_map(Op::Advance),
        ],
        0..40,
    )
}

fn run(
    definitions: &[Arc<EffectDefinition>],
    ops: &[Op],
    policy: TickPolicy,
) -> (EffectContainer, Character) {
    let mut container = EffectContainer::new(EntityId::new(1));
    let mut target = Character::new("Subject", 100, Stats::default());
    let mut commands = EffectCommands::new();
    let scheduler = EffectScheduler::new(policy);

    for op in ops {
        match op {
            Op::Add(i) => {
                let definition = &definitions[i % definitions.len()];
                container.add(definition, None, &mut target, &mut commands).unwrap();
            }
            Op::Remove(i) => {
                let effect = definitions[i % definitions.len()].id;
                container.remove_effect(effect, &mut target, &mut commands);
            }
            Op::Advance(dt) => {
                scheduler.advance(&mut container, &mut target, *dt, &mut commands);
            }
        }
    }
    (container, target)
}

proptest! {
    /// Ascending priority; equal priorities in creation order.
    #[test]
    fn prop_container_order_is_stable(
        definitions in definitions_strategy(),
        ops in ops_strategy(),
    ) {
        let (container, _) = run(&definitions, &ops, TickPolicy::Reset);

        let keys: Vec<(i32, u32)> = container
            .instances()
            .map(|i| (i.priority(), i.id().raw()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn prop_stack_bounds_and_uniqueness(
        definitions in definitions_strategy(),
        ops in ops_strategy(),
    ) {
        let (container, _) = run(&definitions, &ops, TickPolicy::Accumulate);

        let mut seen = Vec::new();
        for instance in container.instances() {
            prop_assert!(instance.stack() >= 1);
            prop_assert!(instance.stack() <= instance.definition().max_stack);
            prop_assert!(!seen.contains(&instance.effect_id()));
            seen.push(instance.effect_id());
        }
    }

    #[test]
    fn prop_advance_zero_is_identity(
        definitions in definitions_strategy(),
        ops in ops_strategy(),
    ) {
        let (mut container, mut target) = run(&definitions, &ops, TickPolicy::Reset);
        let before = container.snapshot();
        let health = target.health();

        let mut commands = EffectCommands::new();
        EffectScheduler::default().advance(&mut container, &mut target, 0.0, &mut commands);

        let after = container.snapshot();
        prop_assert_eq!(before.len(), after.len());
        for (a, b) in before.iter().zip(after.iter()) {
            prop_assert_eq!(a.id(), b.id());
            prop_assert_eq!(a.remaining_duration(), b.remaining_duration());
            prop_assert_eq!(a.remaining_tick_time(), b.remaining_tick_time());
            prop_assert_eq!(a.stack(), b.stack());
        }
        prop_assert_eq!(health, target.health());
        prop_assert!(commands.is_empty());
    }

    #[test]
    fn prop_replace_resets_to_base_duration(
        duration in 0.5f32..20.0,
        elapsed in 0.0f32..1.0,
    ) {
        let definition = Arc::new(
            EffectDefinition::new(EffectId::new(1), "Replace")
                .with_max_stack(2)
                .with_refresh(RefreshPolicy::Replace)
                .with_duration(duration),
        );
        let mut container = EffectContainer::new(EntityId::new(1));
        let mut target = Character::new("Subject", 10, Stats::default());
        let mut commands = EffectCommands::new();

        container.add(&definition, None, &mut target, &mut commands).unwrap();
        let dt = elapsed * duration;
        EffectScheduler::default().advance(&mut container, &mut target, dt, &mut commands);
        container.add(&definition, None, &mut target, &mut commands).unwrap();

        let instance = container.find(EffectId::new(1)).unwrap();
        prop_assert_eq!(instance.remaining_duration(), duration);
    }

    #[test]
    fn prop_add_extends_by_base_duration(
        duration in 0.5f32..20.0,
        elapsed in 0.0f32..1.0,
        stacks in 2u32..6,
    ) {
        let definition = Arc::new(
            EffectDefinition::new(EffectId::new(1), "Add")
                .with_max_stack(stacks)
                .with_refresh(RefreshPolicy::Add)
                .with_duration(duration),
        );
        let mut container = EffectContainer::new(EntityId::new(1));
        let mut target = Character::new("Subject", 10, Stats::default());
        let mut commands = EffectCommands::new();

        container.add(&definition, None, &mut target, &mut commands).unwrap();
        let dt = elapsed * duration;
        EffectScheduler::default().advance(&mut container, &mut target, dt, &mut commands);

        for _ in 1..stacks {
            let before = container.find(EffectId::new(1)).unwrap().remaining_duration();
            container.add(&definition, None, &mut target, &mut commands).unwrap();
            let after = container.find(EffectId::new(1)).unwrap().remaining_duration();
            prop_assert_eq!(after, before + duration);
        }
    }
}
