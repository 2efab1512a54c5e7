use seirfit::prelude::*;

fn scenario() -> Scenario {
    Scenario::new(10_000, 4.0, 3.0)
}

fn true_params() -> ModelParams {
    ModelParams::new(3.0, 0.4, 25.0, 0.9)
}

fn bounds() -> ParamBounds {
    ParamBounds {
        r0_start: ParamSpec::new(2.7, 1.0, 6.0),
        k: ParamSpec::new(0.5, 0.05, 2.0),
        x0: ParamSpec::new(22.0, 5.0, 50.0),
        r0_end: ParamSpec::new(1.0, 0.3, 3.0),
    }
}

fn options() -> FitOptions {
    FitOptions {
        max_iters: 3000,
        window: None,
        ..Default::default()
    }
}

fn synthetic_infected(days: usize) -> Vec<f64> {
    simulate(days, &scenario(), &true_params())
        .expect("synthetic data")
        .i
}

fn assert_recovers(label: &str, fitted: &ModelParams) {
    let truth = true_params();
    let checks = [
        ("r0_start", fitted.r0_start, truth.r0_start, 0.05),
        ("k", fitted.k, truth.k, 0.15),
        ("x0", fitted.x0, truth.x0, 1.0),
        ("r0_end", fitted.r0_end, truth.r0_end, 0.05),
    ];
    for (name, value, expected, tol) in checks {
        assert!(
            (value - expected).abs() <= tol,
            "{}: {} = {} (expected {} +/- {})",
            label,
            name,
            value,
            expected,
            tol
        );
    }
}

#[test]
fn recovers_parameters_from_noise_free_data() {
    let observed = ObservedSeries::new(synthetic_infected(60));
    let fitter = Fitter::new(scenario(), bounds(), options()).unwrap();

    let fit = fitter.fit(&observed, 0).expect("fit converges");

    assert_recovers("no shift", &fit.params);
    assert_eq!(fit.days(), 60);
    assert!(fit.rmse() < 1.0, "rmse = {}", fit.rmse());
    assert!(bounds().contains(&fit.params));
}

#[test]
fn outbreak_shift_pads_the_observed_series() {
    let infected = synthetic_infected(65);
    let observed = ObservedSeries::new(infected[5..].to_vec());
    let fitter = Fitter::new(scenario(), bounds(), options()).unwrap();

    let aligned = fitter.prepare(&observed, 5).unwrap();
    assert_eq!(aligned.days(), 65);
    assert_eq!(&aligned.values()[..5], &[0.0; 5]);

    let fit = fitter.fit(&observed, 5).expect("fit converges");
    assert_eq!(fit.days(), 65);
    assert_eq!(fit.outbreak_shift, 5);
    assert_recovers("shift 5", &fit.params);

    let trajectory = fit.trajectory(fitter.simulator()).unwrap();
    assert_eq!(trajectory.len(), 65);
}

#[test]
fn window_limits_the_fitted_days() {
    let observed = ObservedSeries::new(synthetic_infected(60));
    let fitter = Fitter::new(
        scenario(),
        bounds(),
        FitOptions {
            window: Some(40),
            ..options()
        },
    )
    .unwrap();

    assert_eq!(fitter.prepare(&observed, 0).unwrap().days(), 40);
    assert_eq!(fitter.prepare(&observed, 3).unwrap().days(), 43);
    assert_eq!(fitter.prepare(&observed, -3).unwrap().days(), 37);
}

#[test]
fn non_finite_observations_fail_fast() {
    let mut values = synthetic_infected(60);
    values[10] = f64::NAN;
    let observed = ObservedSeries::new(values);
    let fitter = Fitter::new(scenario(), bounds(), options()).unwrap();

    match fitter.fit(&observed, 0) {
        Err(SeirError::InvalidObservedData { index, .. }) => assert_eq!(index, 10),
        other => panic!("expected InvalidObservedData, got {:?}", other),
    }
}

#[test]
fn zero_filled_edges_can_be_fitted() {
    let cumulative: Vec<f64> = synthetic_infected(60)
        .iter()
        .scan(0.0, |total, daily| {
            *total += daily;
            Some(*total)
        })
        .collect();
    let mut observed = ObservedSeries::from_cumulative(&cumulative)
        .rolling_mean(7)
        .unwrap();
    assert!(fitter_rejects_missing(&observed));

    assert_eq!(observed.fill_missing_zero(), 6);
    let fitter = Fitter::new(scenario(), bounds(), options()).unwrap();
    let fit = fitter.fit(&observed, 0).expect("fit converges");
    assert!(bounds().contains(&fit.params));
}

fn fitter_rejects_missing(observed: &ObservedSeries) -> bool {
    let fitter = Fitter::new(scenario(), bounds(), options()).unwrap();
    matches!(
        fitter.fit(observed, 0),
        Err(SeirError::InvalidObservedData { index: 0, .. })
    )
}

#[test]
fn exhausted_budget_is_reported() {
    let observed = ObservedSeries::new(synthetic_infected(60));
    let fitter = Fitter::new(
        scenario(),
        bounds(),
        FitOptions {
            max_iters: 3,
            restarts: 0,
            ..options()
        },
    )
    .unwrap();

    match fitter.fit(&observed, 0) {
        Err(SeirError::FitDidNotConverge {
            params, iterations, ..
        }) => {
            assert!(iterations <= 3);
            assert!(bounds().contains(&params));
        }
        other => panic!("expected FitDidNotConverge, got {:?}", other),
    }
}

#[test]
fn multistart_keeps_the_best_fit() {
    let observed = ObservedSeries::new(synthetic_infected(60));
    let fitter = Fitter::new(scenario(), bounds(), options()).unwrap();

    let single = fitter.fit(&observed, 0).expect("single fit");
    let multi = fitter
        .fit_multistart(&observed, 0, 3, 42)
        .expect("multi-start fit");

    assert!(multi.cost <= single.cost);
    assert_recovers("multi-start", &multi.params);
}

#[test]
fn configured_fitter_runs() {
    let json = r#"{
        "scenario": { "population": 10000, "infectious_period": 4.0, "incubation_period": 3.0 },
        "bounds": {
            "r0_start": { "init": 2.7, "min": 1.0, "max": 6.0 },
            "k": { "init": 0.5, "min": 0.05, "max": 2.0 },
            "x0": { "init": 22.0, "min": 5.0, "max": 50.0 },
            "r0_end": { "init": 1.0, "min": 0.3, "max": 3.0 }
        },
        "options": { "max_iters": 3000, "window": null }
    }"#;
    let fitter = FitConfig::from_json(json).unwrap().fitter().unwrap();
    let observed = ObservedSeries::new(synthetic_infected(60));

    let fit = fitter.fit(&observed, 0).expect("fit converges");
    assert_recovers("from config", &fit.params);
}
