#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use arcade_dqn::agent::{td_targets, AgentState};
    use arcade_dqn::memory::{Codec, ReplayMemory};
    use arcade_dqn::transition::{Observation, Transition};
    use ndarray::Array1;

    fn tagged(tag: usize) -> Transition {
        Transition::new(
            Observation::from_elem((1, 1, 2), tag as f32),
            tag % 3,
            tag as f32,
            Observation::from_elem((1, 1, 2), tag as f32 + 1.0),
            tag % 2 == 0,
        )
    }

    fn codec_strategy() -> impl Strategy<Value = Codec> {
        prop_oneof![Just(Codec::Plain), (0u32..=9).prop_map(|level| Codec::Zlib { level })]
    }

    proptest! {
        #[test]
        fn test_memory_keeps_most_recent_in_order(
            capacity in 1usize..20,
            pushes in 0usize..60,
            codec in codec_strategy(),
        ) {
            let mut memory = ReplayMemory::with_codec(capacity, codec);
            for tag in 0..pushes {
                memory.push(tagged(tag)).unwrap();
            }
            prop_assert_eq!(memory.len(), pushes.min(capacity));
            let first = pushes.saturating_sub(capacity);
            for (offset, stored) in memory.iter().enumerate() {
                prop_assert_eq!(stored.unwrap(), tagged(first + offset));
            }
        }

        #[test]
        fn test_batch_always_contains_newest(
            capacity in 1usize..30,
            pushes in 1usize..60,
            batch_size in 1usize..40,
            seed in any::<u64>(),
        ) {
            let mut memory = ReplayMemory::new(capacity).with_seed(seed);
            for tag in 0..pushes {
                memory.push(tagged(tag)).unwrap();
            }
            let batch = memory.sample(batch_size).unwrap();
            prop_assert_eq!(batch.len(), batch_size);
            prop_assert!(batch.contains(&tagged(pushes - 1)));

            let oldest = pushes.saturating_sub(capacity);
            for t in &batch {
                let tag = t.state()[[0, 0, 0]] as usize;
                prop_assert!(tag >= oldest && tag < pushes);
            }
        }

        #[test]
        fn test_epsilon_never_below_floor(
            start in 0.0f32..=1.0,
            decay in 0.5f32..=1.0,
            min in 0.0f32..=1.0,
            steps in 0usize..500,
        ) {
            let mut state = AgentState::new(start);
            for _ in 0..steps {
                let before = state.epsilon;
                state.decay_epsilon(decay, min);
                prop_assert!(state.epsilon >= min);
                prop_assert!(state.epsilon <= before.max(min));
            }
        }

        #[test]
        fn test_terminal_targets_ignore_bootstrap(
            rewards in prop::collection::vec(-100.0f32..100.0, 1..16),
            next_value in -1e3f32..1e3,
            gamma in 0.0f32..=1.0,
            scale in 1.0f32..200.0,
        ) {
            let n = rewards.len();
            let rewards = Array1::from_vec(rewards);
            let next_values = Array1::from_elem(n, next_value);
            let dones = vec![true; n];
            let targets = td_targets(rewards.view(), next_values.view(), &dones, gamma, scale).unwrap();
            for (target, reward) in targets.iter().zip(rewards.iter()) {
                prop_assert_eq!(*target, reward / scale);
            }
        }
    }
}
