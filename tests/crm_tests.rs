use crmcore::prelude::*;

const PRIORS: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];

/// Reference values were obtained once with an independent Simpson-rule integration
#[test]
fn test_logistic_reference_scenario() -> Result<(), CrmError> {
    let rec = crm(2, 0.3, &PRIORS, 1.0, 3.0, &[1], &[0])?;
    assert!(
        (rec.posterior_mean() - 1.4859271).abs() < 1e-4,
        "posterior mean {}",
        rec.posterior_mean()
    );
    assert_eq!(rec.next_level(), 5);
    Ok(())
}

#[test]
fn test_tanh_reference_scenario() -> Result<(), CrmError> {
    let rec = crm(1, 0.3, &PRIORS, 1.0, 3.0, &[3, 3, 3], &[0, 1, 0])?;
    assert!((rec.posterior_mean() - 0.9639875).abs() < 1e-4);
    assert_eq!(rec.next_level(), 3);
    Ok(())
}

#[test]
fn test_six_level_logistic_scenario() -> Result<(), CrmError> {
    let priors = [0.05, 0.1, 0.2, 0.3, 0.5, 0.7];
    let rec = crm(2, 0.2, &priors, 1.0, 3.0, &[1, 2, 3, 3, 3], &[0, 0, 1, 0, 0])?;
    assert!((rec.posterior_mean() - 0.9592418).abs() < 1e-4);
    assert_eq!(rec.next_level(), 3);
    Ok(())
}

#[test]
fn test_deterministic() -> Result<(), CrmError> {
    let first = crm(1, 0.25, &PRIORS, 1.0, 3.0, &[1, 2, 2, 3], &[0, 0, 1, 0])?;
    for _ in 0..5 {
        let again = crm(1, 0.25, &PRIORS, 1.0, 3.0, &[1, 2, 2, 3], &[0, 0, 1, 0])?;
        assert_eq!(again.next_level(), first.next_level());
        assert_eq!(again.posterior_mean(), first.posterior_mean());
        assert_eq!(again, first);
    }
    Ok(())
}

#[test]
fn test_toxicities_lower_the_posterior_mean() -> Result<(), CrmError> {
    // In both models a larger `a` means a lower toxicity probability at every level
    for model in [1, 2] {
        let means = (0..=3)
            .map(|k| {
                let outcomes: Vec<i32> = (0..3).map(|i| if i < k { 1 } else { 0 }).collect();
                crm(model, 0.3, &PRIORS, 1.0, 3.0, &[3, 3, 3], &outcomes)
                    .map(|rec| rec.posterior_mean())
            })
            .collect::<Result<Vec<f64>, CrmError>>()?;

        for pair in means.windows(2) {
            assert!(pair[0] > pair[1], "model {}: {:?}", model, means);
        }
        // The prior mean of `a` is 1
        assert!(means[0] > 1.0);
        assert!(means[3] < 1.0);
        assert!(means.iter().all(|&m| m > 0.0));
    }
    Ok(())
}

#[test]
fn test_escalation_and_deescalation() -> Result<(), CrmError> {
    let safe = crm(1, 0.3, &PRIORS, 1.0, 3.0, &[1; 10], &[0; 10])?;
    assert_eq!(safe.next_level(), 5);

    let toxic = crm(1, 0.3, &PRIORS, 1.0, 3.0, &[5; 6], &[1; 6])?;
    assert_eq!(toxic.next_level(), 1);
    assert!(toxic.posterior_mean() > 0.0);
    Ok(())
}

#[test]
fn test_tie_resolves_to_lower_level() -> Result<(), CrmError> {
    // Levels 2 and 3 share a prior, so their fitted probabilities are identical
    let rec = crm(1, 0.3, &[0.1, 0.3, 0.3, 0.5], 1.0, 3.0, &[1], &[0])?;
    let levels = rec.levels();
    assert_eq!(levels[1].distance, levels[2].distance);
    assert_eq!(rec.next_level(), 2);
    Ok(())
}

#[test]
fn test_dose_coordinates_use_initial_guess() -> Result<(), CrmError> {
    let model = Logistic::new(3.0);
    let rec = crm(2, 0.3, &PRIORS, 2.0, 3.0, &[2, 2], &[0, 1])?;
    for (level, &p) in rec.levels().iter().zip(PRIORS.iter()) {
        assert_eq!(level.dose, model.dose_from_probability(p, 2.0));
        assert!(
            (level.probability - model.probability(rec.posterior_mean(), level.dose)).abs()
                < 1e-15
        );
    }
    Ok(())
}

#[test]
fn test_intercept_ignored_by_tanh() -> Result<(), CrmError> {
    let a = crm(1, 0.3, &PRIORS, 1.0, 3.0, &[2, 3], &[0, 1])?;
    for b0 in [-12.0, f64::NAN, f64::INFINITY] {
        let b = crm(1, 0.3, &PRIORS, 1.0, b0, &[2, 3], &[0, 1])?;
        assert_eq!(a.posterior_mean(), b.posterior_mean());
        assert_eq!(a.next_level(), b.next_level());
    }
    Ok(())
}

#[test]
fn test_non_finite_intercept_rejected_by_logistic() {
    for b0 in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = crm(2, 0.3, &PRIORS, 1.0, b0, &[2, 3], &[0, 1]).unwrap_err();
        assert!(matches!(err, CrmError::Input(_)), "{} accepted", b0);
    }
}

#[test]
fn test_negative_initial_guess_logistic() -> Result<(), CrmError> {
    let rec = crm(2, 0.3, &PRIORS, -1.0, 3.0, &[1], &[0])?;
    assert!(rec.posterior_mean().is_finite());
    assert!((1..=PRIORS.len()).contains(&rec.next_level()));
    Ok(())
}

#[test]
fn test_single_dose_level() -> Result<(), CrmError> {
    let rec = crm(2, 0.3, &[0.25], 1.0, 3.0, &[1, 1], &[1, 0])?;
    assert_eq!(rec.next_level(), 1);
    Ok(())
}

#[test]
fn test_invalid_model_selector() {
    for model in [0, 3, 42] {
        let err = crm(model, 0.3, &PRIORS, 1.0, 3.0, &[1], &[0]).unwrap_err();
        match err {
            CrmError::Configuration(msg) => assert!(msg.contains("Model must be 1 or 2")),
            other => panic!("Expected a configuration error, got {:?}", other),
        }
    }
}

#[test]
fn test_empty_priors() {
    let err = crm(2, 0.3, &[], 1.0, 3.0, &[1], &[0]).unwrap_err();
    assert!(matches!(err, CrmError::Input(_)));
}

#[test]
fn test_empty_patient_data() {
    let err = crm(1, 0.3, &PRIORS, 1.0, 3.0, &[], &[]).unwrap_err();
    assert!(matches!(err, CrmError::Input(_)));
}

#[test]
fn test_out_of_range_dose_level() {
    for level in [0, 6, -3] {
        let err = crm(1, 0.3, &PRIORS, 1.0, 3.0, &[1, level], &[0, 0]).unwrap_err();
        assert!(matches!(err, CrmError::Input(_)), "level {} accepted", level);
    }
}

#[test]
fn test_invalid_outcome() {
    let err = crm(1, 0.3, &PRIORS, 1.0, 3.0, &[1, 2], &[0, 2]).unwrap_err();
    assert!(matches!(err, CrmError::Input(_)));
}

#[test]
fn test_boundary_prior() {
    let err = crm(1, 0.3, &[0.1, 1.0], 1.0, 3.0, &[1], &[0]).unwrap_err();
    assert!(matches!(err, CrmError::Input(_)));
}

#[test]
fn test_typed_trial_matches_raw_entrypoint() -> Result<(), CrmError> {
    let records = vec![
        PatientRecord::new(1, false),
        PatientRecord::new(2, false),
        PatientRecord::new(2, true),
    ];
    let trial = Trial::new(
        ModelKind::Logistic,
        0.3,
        &PRIORS,
        1.0,
        3.0,
        Patients::from_records(records)?,
    )?;
    let typed = trial.recommend(&IntegrationSettings::default())?;
    let raw = crm(2, 0.3, &PRIORS, 1.0, 3.0, &[1, 2, 2], &[0, 0, 1])?;
    assert_eq!(typed, raw);
    assert_eq!(recommend(&trial, &IntegrationSettings::default())?, raw);
    Ok(())
}

#[test]
fn test_tolerance_changes_are_consistent() -> Result<(), CrmError> {
    let patients = Patients::from_columns(&[1, 2, 3], &[0, 0, 1])?;
    let trial = Trial::new(ModelKind::Tanh, 0.3, &PRIORS, 1.0, 3.0, patients)?;
    let coarse = trial.recommend(&IntegrationSettings {
        epsabs: 0.0,
        epsrel: 1e-4,
        limit: 1000,
    })?;
    let fine = trial.recommend(&IntegrationSettings {
        epsabs: 0.0,
        epsrel: 1e-10,
        limit: 1000,
    })?;
    assert!((coarse.posterior_mean() - fine.posterior_mean()).abs() < 1e-3);
    Ok(())
}
