//! Property tests for the session timer state machine.

use proptest::prelude::*;
use respira_core::{format_remaining, SessionDefinition, SessionTimer, TimerStatus};

#[derive(Debug, Clone)]
enum Op {
    Tick,
    Toggle,
    Stop,
    Start(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        8 => Just(Op::Tick),
        2 => Just(Op::Toggle),
        1 => Just(Op::Stop),
        1 => (1u64..3).prop_map(Op::Start),
    ]
}

proptest! {
    #[test]
    fn running_ticks_decrement_by_exactly_one(minutes in 1u64..4, ticks in 0u64..240) {
        let mut timer = SessionTimer::new();
        timer.start(SessionDefinition::new("p", minutes, "P", "")).unwrap();
        let total = minutes * 60;
        let ticks = ticks.min(total - 1);
        for n in 1..=ticks {
            timer.tick();
            prop_assert_eq!(timer.remaining_secs(), Some(total - n));
        }
    }

    #[test]
    fn invariants_hold_for_any_operation_sequence(ops in prop::collection::vec(op(), 0..400)) {
        let mut timer = SessionTimer::new();
        let mut completions = 0usize;

        for op in ops {
            match op {
                Op::Tick => {
                    if let Some(event) = timer.tick() {
                        if event.is_completion() {
                            completions += 1;
                        }
                    }
                }
                Op::Toggle => { timer.toggle_pause(); }
                Op::Stop => { timer.stop(); }
                Op::Start(m) => {
                    timer.start(SessionDefinition::new(format!("s{m}"), m, "S", "")).unwrap();
                }
            }

            let ratio = timer.progress_ratio();
            prop_assert!((0.0..=1.0).contains(&ratio));
            match (timer.remaining_secs(), timer.total_secs()) {
                (Some(remaining), Some(total)) => {
                    prop_assert!(remaining <= total);
                    prop_assert!(remaining > 0);
                }
                (None, None) => {
                    prop_assert_eq!(timer.status(), TimerStatus::Idle);
                    prop_assert!(!timer.is_running());
                }
                other => prop_assert!(false, "half-cleared session fields: {:?}", other),
            }
            prop_assert_eq!(timer.history().len(), completions);
        }
    }

    #[test]
    fn format_round_trips_through_minutes_and_seconds(secs in 0u64..100_000) {
        let text = format_remaining(secs);
        let (m, s) = text.split_once(':').unwrap();
        prop_assert!(m.len() >= 2);
        prop_assert_eq!(s.len(), 2);
        prop_assert_eq!(m.parse::<u64>().unwrap() * 60 + s.parse::<u64>().unwrap(), secs);
    }
}
