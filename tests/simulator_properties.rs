//! Property tests for the simulator, discretizer and value table.

use coin_grabber::{
    Action,
    platformer::{Outcome, Rect, SimState, WorldConfig, step},
    q_learning::{EpsilonSchedule, StateDiscretizer, ValueTable},
};

fn reference_discretizer() -> StateDiscretizer {
    let config = coin_grabber::AgentConfig::default();
    StateDiscretizer::new(config.x_bins, config.x_bin_size).unwrap()
}

#[test]
fn state_keys_stay_in_range_across_the_screen() {
    let discretizer = reference_discretizer();
    for x in 0..630 {
        let x = x as f64 + 0.5;
        let ground = discretizer.state_key(x, false).value();
        let air = discretizer.state_key(x, true).value();
        assert!(ground < 128 && air < 128, "x={x}");
        assert_eq!(air, ground + 1);
    }
}

#[test]
fn ensure_state_twice_changes_nothing() {
    let discretizer = reference_discretizer();
    let mut table = ValueTable::new(0.3, 0.96);
    let key = discretizer.state_key(300.0, false);

    table.ensure_state(key);
    let first = table.entries();
    table.ensure_state(key);
    assert_eq!(table.entries(), first);
    assert_eq!(first, vec![(key, [0.0; 4])]);
}

#[test]
fn best_action_breaks_ties_toward_lowest_index() {
    let discretizer = reference_discretizer();
    let mut table = ValueTable::new(0.3, 0.96);
    let zero = discretizer.state_key(10.0, false);
    let tied = discretizer.state_key(20.0, false);

    assert_eq!(table.best_action(zero).0, Action::MoveLeft);

    *table.ensure_state(tied) = [1.0, 1.0, 2.0, 2.0];
    assert_eq!(table.best_action(tied), (Action::Jump, 2.0));
}

#[test]
fn collision_is_strict_on_both_axes() {
    let player = Rect::new(220.0, 396.0, 30.0, 30.0);
    let obstacle = Rect::new(250.0, 396.0, 30.0, 30.0);
    assert!(!player.overlaps(&obstacle));

    let above = Rect::new(250.0, 366.0, 30.0, 30.0);
    assert!(!above.overlaps(&obstacle));

    let nudged = Rect::new(220.5, 396.0, 30.0, 30.0);
    assert!(nudged.overlaps(&obstacle));
}

#[test]
fn reward_tracks_progress_toward_the_coin() {
    let world = WorldConfig::default();
    for x in [30.0, 120.0, 180.0] {
        let start = SimState {
            x,
            ..SimState::reset(&world)
        };
        assert!(step(&world, start, Action::MoveRight).reward > -0.01);
        assert!(step(&world, start, Action::MoveLeft).reward < -0.01);
    }

    // Past the coin the signs flip.
    let beyond = SimState {
        x: 500.0,
        ..SimState::reset(&world)
    };
    assert!(step(&world, beyond, Action::MoveLeft).reward > -0.01);
    assert!(step(&world, beyond, Action::MoveRight).reward < -0.01);
}

#[test]
fn walking_right_reaches_an_unblocked_coin_within_134_steps() {
    let world = WorldConfig::default().with_obstacle(560.0, 396.0);
    let mut state = SimState::reset(&world);

    for steps in 1..=134 {
        let transition = step(&world, state, Action::MoveRight);
        state = transition.next;
        if transition.done() {
            assert_eq!(transition.outcome, Some(Outcome::ReachedCoin));
            assert!(transition.reward > 100.0);
            assert_eq!(steps, 124);
            return;
        }
    }
    panic!("coin not reached, x = {}", state.x);
}

#[test]
fn walking_right_in_the_reference_world_hits_the_obstacle() {
    let world = WorldConfig::default();
    let mut state = SimState::reset(&world);
    let mut outcome = None;
    for _ in 0..134 {
        let transition = step(&world, state, Action::MoveRight);
        state = transition.next;
        if transition.done() {
            outcome = transition.outcome;
            break;
        }
    }
    assert_eq!(outcome, Some(Outcome::HitObstacle));
    assert!(state.x < world.coin_x);
}

#[test]
fn jumping_over_the_obstacle_is_possible() {
    let world = WorldConfig::default();
    let mut state = SimState {
        x: 189.0,
        ..SimState::reset(&world)
    };
    let mut transition = step(&world, state, Action::Jump);
    state = transition.next;
    while state.is_jumping {
        transition = step(&world, state, Action::MoveRight);
        state = transition.next;
        assert_ne!(transition.outcome, Some(Outcome::HitObstacle));
    }
    assert!(state.x > world.obstacle_x + world.item_size);
}

#[test]
fn epsilon_schedule_never_increases() {
    let schedule = EpsilonSchedule::default();
    let total = 5_000;
    let values: Vec<f64> = (0..total).map(|ep| schedule.epsilon_at(ep, total)).collect();
    assert!(values.windows(2).all(|w| w[1] <= w[0]));
    assert!((values[0] - 1.0).abs() < 1e-12);
    assert!(values[total - 1] > 0.2);
}
