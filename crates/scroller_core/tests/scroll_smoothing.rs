use scroller_core::{ScrollMetrics, ScrollState, StepOutcome, END_SLACK_PX, SPEED_LERP};

fn tall_container(scroll_top: f64) -> ScrollMetrics {
    ScrollMetrics {
        scroll_top,
        scroll_height: 1_000_000.0,
        client_height: 600.0,
    }
}

#[test]
fn speed_converges_monotonically_without_overshoot() {
    let mut state = ScrollState::new();
    state.start(2.0).unwrap();
    assert_eq!(state.current_speed(), 2.0);

    let mut previous = state.current_speed();
    for _ in 0..500 {
        let speed = state.smooth_toward(0.4);
        assert!(speed < previous, "speed did not decrease: {speed} >= {previous}");
        assert!(speed > 0.4, "speed overshot the target: {speed}");
        previous = speed;
    }
    assert!((previous - 0.4).abs() < 1e-6);
}

#[test]
fn first_smoothing_step_closes_lerp_fraction_of_gap() {
    let mut state = ScrollState::new();
    state.start(2.0).unwrap();
    let speed = state.smooth_toward(0.4);
    assert!((speed - (2.0 - 1.6 * SPEED_LERP)).abs() < 1e-12);
}

#[test]
fn steps_advance_by_current_speed() {
    let mut state = ScrollState::new();
    let mut ticket = state.start(2.0).unwrap();
    let mut top = 0.0;
    for _ in 0..10 {
        match state.step(ticket, Some(tall_container(top)), 2.0) {
            StepOutcome::Advanced { scroll_top, next } => {
                assert!((scroll_top - top - 2.0).abs() < 1e-9);
                top = scroll_top;
                ticket = next;
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    assert!((top - 20.0).abs() < 1e-9);
}

#[test]
fn reaching_the_end_stops_once() {
    let mut state = ScrollState::new();
    let ticket = state.start(2.0).unwrap();
    let near_end = ScrollMetrics {
        scroll_top: 398.0 - END_SLACK_PX,
        scroll_height: 1000.0,
        client_height: 600.0,
    };

    let outcome = state.step(ticket, Some(near_end), 2.0);
    assert_eq!(outcome, StepOutcome::ReachedEnd { scroll_top: 395.0 });
    assert!(!state.is_running());

    // The spent ticket cannot trigger a second arrival.
    assert_eq!(state.step(ticket, Some(near_end), 2.0), StepOutcome::Stale);
}
