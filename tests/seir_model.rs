use approx::assert_relative_eq;
use seirfit::prelude::*;

fn example_params() -> ModelParams {
    ModelParams::new(4.0, 0.5, 60.0, 0.8)
}

#[test]
fn single_day_returns_initial_condition() {
    let scenario = Scenario::new(1000, 4.0, 3.0);
    let trajectory = simulate(1, &scenario, &example_params()).expect("simulation");

    assert_eq!(trajectory.len(), 1);
    assert_eq!(trajectory.s, vec![999.0]);
    assert_eq!(trajectory.e, vec![1.0]);
    assert_eq!(trajectory.i, vec![0.0]);
    assert_eq!(trajectory.r, vec![0.0]);
}

#[test]
fn example_epidemic_rises_and_falls() {
    let scenario = Scenario::new(1000, 4.0, 3.0);
    let trajectory = simulate(100, &scenario, &example_params()).expect("simulation");

    assert_eq!(trajectory.len(), 100);
    assert_eq!(trajectory.t.first(), Some(&0.0));
    assert_eq!(trajectory.t.last(), Some(&99.0));

    let (peak_day, peak) = trajectory.peak_infected().expect("non-empty trajectory");
    assert!(peak_day > 0 && peak_day < 99, "peak on day {}", peak_day);
    assert!(peak > trajectory.i[0]);
    assert!(trajectory.i[99] < peak);

    let last = trajectory.state(99).expect("day 99");
    assert_relative_eq!(last.total(), 1000.0, max_relative = 1e-6);
}

#[test]
fn population_is_conserved_every_day() {
    let scenario = Scenario::new(50_000, 5.0, 2.0);
    let params = ModelParams::new(3.2, 0.2, 30.0, 1.1);
    let trajectory = simulate(150, &scenario, &params).expect("simulation");

    for day in 0..trajectory.len() {
        let state = trajectory.state(day).unwrap();
        assert_relative_eq!(state.total(), 50_000.0, max_relative = 1e-6);
    }
}

#[test]
fn reported_r0_follows_the_prescribed_schedule() {
    let scenario = Scenario::default();
    let params = example_params();
    let trajectory = simulate(100, &scenario, &params).expect("simulation");

    for (t, r0) in trajectory.t.iter().zip(&trajectory.r0) {
        assert_eq!(*r0, logistic_r0(*t, 4.0, 0.5, 60.0, 0.8));
    }
    assert_relative_eq!(trajectory.r0[60], 2.4, epsilon = 1e-12);
}

#[test]
fn simulation_is_deterministic() {
    let simulator = Simulator::new(Scenario::new(1000, 4.0, 3.0)).unwrap();
    let first = simulator.simulate(100, &example_params()).unwrap();
    let second = simulator.simulate(100, &example_params()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn constant_transmission_below_one_dies_out() {
    let scenario = Scenario::new(1000, 4.0, 3.0);
    let params = ModelParams::new(0.5, 1.0, 0.0, 0.5);
    let trajectory = simulate(120, &scenario, &params).expect("simulation");

    let (_, peak) = trajectory.peak_infected().unwrap();
    assert!(peak < 1.0);
    assert!(trajectory.s[119] > 997.0);
}

#[test]
fn zero_steepness_is_accepted() {
    let scenario = Scenario::default();
    let params = ModelParams::new(3.0, 0.0, 20.0, 1.0);
    let trajectory = simulate(30, &scenario, &params).expect("simulation");

    assert!(trajectory.r0.iter().all(|&r0| r0 == 2.0));
}

#[test]
fn invalid_inputs_are_domain_errors() {
    let params = example_params();
    assert!(matches!(
        simulate(10, &Scenario::new(0, 4.0, 3.0), &params),
        Err(SeirError::Domain { .. })
    ));
    assert!(matches!(
        simulate(10, &Scenario::new(1000, -1.0, 3.0), &params),
        Err(SeirError::Domain { .. })
    ));
    assert!(matches!(
        simulate(0, &Scenario::default(), &params),
        Err(SeirError::Domain { .. })
    ));
    assert!(matches!(
        simulate(10, &Scenario::default(), &ModelParams::new(f64::NAN, 0.5, 1.0, 1.0)),
        Err(SeirError::Domain { .. })
    ));
}

#[test]
fn stiff_transmission_is_an_integration_error() {
    let params = ModelParams::new(1e200, 0.5, 60.0, 1e200);
    let simulator = Simulator::new(Scenario::default()).unwrap();

    match simulator.simulate(10, &params) {
        Err(SeirError::Integration {
            params: failed,
            time,
            reason,
        }) => {
            assert_eq!(failed, params);
            assert_eq!(time, 0.0);
            assert!(
                reason.to_lowercase().contains("step size"),
                "unexpected reason: {}",
                reason
            );
        }
        other => panic!("expected Integration error, got {:?}", other),
    }
}
