use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use wattdf::{
    Frequency, FrequencySpec, Method, MethodKind, Origin, ResampleConfig, Resampler, TimeSeries,
    WattError, energy_to_freq, power_to_freq, to_freq, trim_out_of_bounds,
};

fn d(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, day, 0, 0, 0).unwrap()
}

fn h(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, 1, hour, 0, 0).unwrap()
}

fn every(s: &str) -> FrequencySpec {
    s.parse().unwrap()
}

fn all_methods() -> Vec<Method> {
    MethodKind::ALL.into_iter().map(Method::from).collect()
}

#[test]
fn affine_every_two_days() {
    let s = TimeSeries::from_f64(vec![d(1), d(2), d(3)], vec![1.0, 2.0, 3.0]).unwrap();
    let out = to_freq(&s, &every("2D"), Origin::Unspecified, None, &Method::PiecewiseAffine).unwrap();
    assert_eq!(out.instants(), &[d(1), d(3)]);
    assert_eq!(out.values(), &[Some(1.0), Some(3.0)]);
}

#[test]
fn index_label_is_preserved_by_every_method() {
    let s = TimeSeries::from_f64(vec![h(0), h(1), h(2)], vec![1.0, 2.0, 3.0])
        .unwrap()
        .with_index_name("timestamp");
    for method in all_methods() {
        let out = to_freq(&s, &every("30min"), Origin::Unspecified, Some(3_600.0), &method).unwrap();
        assert_eq!(out.index_name(), Some("timestamp"), "{method:?}");
    }
}

#[test]
fn empty_source_fails_for_every_method() {
    let empty = TimeSeries::new(vec![], vec![]).unwrap();
    for method in all_methods() {
        let err = to_freq(&empty, &every("1h"), Origin::Unspecified, None, &method).unwrap_err();
        assert_eq!(err, WattError::EmptySource, "{method:?}");
    }
}

#[test]
fn unknown_method_name_is_rejected() {
    let err = "cubic_spline".parse::<Method>().unwrap_err();
    assert_eq!(err, WattError::invalid_method("cubic_spline"));
    assert!(err.is_resampling_error());
    assert_eq!(
        "flow-rate-conservative".parse::<Method>().unwrap().kind(),
        Some(MethodKind::FlowRateConservative)
    );
}

#[test]
fn custom_method_receives_targets_and_options() {
    let s = TimeSeries::from_f64(vec![h(0), h(4)], vec![1.0, 5.0])
        .unwrap()
        .with_index_name("ts");
    // Nearest-sample strategy built outside the library.
    let nearest = Method::custom(|source, targets, opts| {
        assert_eq!(opts.freq, FrequencySpec::Every(Frequency::hours(1)));
        let values = targets
            .iter()
            .map(|&t| {
                source
                    .iter()
                    .min_by_key(|(x, _)| (*x - t).num_seconds().abs())
                    .and_then(|(_, v)| v)
            })
            .collect();
        TimeSeries::new(targets.to_vec(), values)
    });
    let out = to_freq(&s, &every("1h"), Origin::Unspecified, None, &nearest).unwrap();
    assert_eq!(out.len(), 5);
    assert_eq!(
        out.values(),
        &[Some(1.0), Some(1.0), Some(1.0), Some(5.0), Some(5.0)]
    );
    assert_eq!(out.index_name(), Some("ts"));
}

#[test]
fn energy_and_power_shortcuts() {
    let day = d(1);
    let energy = TimeSeries::from_f64(vec![day], vec![100.0]).unwrap();
    let out = energy_to_freq(&energy, &every("6h"), Origin::Unspecified, Some(86_400.0)).unwrap();
    assert_eq!(out.values(), &[Some(25.0); 4]);

    let power = TimeSeries::from_f64(vec![h(0), h(1)], vec![2.0, 4.0]).unwrap();
    let out = power_to_freq(&power, &every("2h"), Origin::Unspecified, Some(3_600.0)).unwrap();
    assert_eq!(out.values(), &[Some(3.0)]);

    let err = energy_to_freq(&energy, &every("6h"), Origin::Unspecified, None).unwrap_err();
    assert!(matches!(err, WattError::UndefinedTimestep(_)));
}

#[test]
fn conservative_methods_refuse_to_guess_the_last_interval() {
    let energy = TimeSeries::from_f64(vec![h(0), h(1), h(2)], vec![10.0; 3]).unwrap();
    for method in all_methods() {
        let out = to_freq(&energy, &every("90min"), Origin::Unspecified, None, &method);
        match method.kind() {
            Some(MethodKind::VolumeConservative | MethodKind::FlowRateConservative) => {
                assert!(matches!(out, Err(WattError::UndefinedTimestep(_))), "{method:?}");
            }
            _ => assert_eq!(out.unwrap().instants(), &[h(0), h(0) + TimeDelta::minutes(90)]),
        }
    }

    // With the last step the total survives the change of grid.
    let out = energy_to_freq(&energy, &every("90min"), Origin::Unspecified, Some(3_600.0)).unwrap();
    assert_eq!(out.values(), &[Some(15.0), Some(15.0)]);
}

#[test]
fn trimming_enforces_a_sentinel() {
    let s = TimeSeries::from_f64(vec![h(1), h(2)], vec![1.0, 2.0]).unwrap();
    let targets = FrequencySpec::Instants(vec![h(0), h(1), h(2), h(3)]);
    let out = to_freq(&s, &targets, Origin::Unspecified, None, &Method::PiecewiseConstant).unwrap();
    let trimmed = trim_out_of_bounds(&s, &out, Some(-1.0)).unwrap();
    assert_eq!(trimmed.values(), &[Some(-1.0), Some(1.0), Some(2.0), Some(-1.0)]);
}

#[test]
fn resampler_from_builder_and_config() {
    let resampler = Resampler::builder()
        .origin(Origin::Floor)
        .last_step_duration(900.0)
        .method(MethodKind::VolumeConservative)
        .build()
        .unwrap();
    let cfg = resampler.config().unwrap();
    assert_eq!(cfg.method, MethodKind::VolumeConservative);
    assert_eq!(cfg.last_step_duration, Some(900.0));
    assert_eq!(Resampler::from_config(cfg).unwrap().origin(), Origin::Floor);

    let instants: Vec<_> = (0..4).map(|i| h(0) + TimeDelta::minutes(15 * i)).collect();
    let energy = TimeSeries::from_f64(instants, vec![1.0; 4]).unwrap();
    let out = resampler.to_freq(&energy, &every("1h")).unwrap();
    assert_eq!(out.instants(), &[h(0)]);
    assert_eq!(out.values(), &[Some(4.0)]);

    // Samples off the hour spill into the next target.
    let shifted = TimeSeries::from_f64(
        (0..4).map(|i| h(0) + TimeDelta::minutes(5 + 15 * i)).collect(),
        vec![3.0; 4],
    )
    .unwrap();
    let out = resampler.to_freq(&shifted, &every("1h")).unwrap();
    assert_eq!(out.instants(), &[h(0), h(1)]);
    assert_eq!(out.values(), &[Some(11.0), Some(1.0)]);

    let custom = Resampler::builder()
        .method(Method::custom(|s, _, _| Ok(s.clone())))
        .build()
        .unwrap();
    assert!(custom.config().is_none());
    assert_eq!(custom.method().name(), "custom");
}

#[test]
fn invalid_last_step_is_rejected_when_building() {
    let err = Resampler::builder().last_step_duration(-5.0).build().unwrap_err();
    assert!(matches!(err, WattError::InvalidTimestepDuration(_)));

    let cfg = ResampleConfig {
        last_step_duration: Some(0.0),
        ..ResampleConfig::default()
    };
    assert!(Resampler::from_config(cfg).is_err());
}

#[test]
fn config_deserializes_with_defaults() {
    let cfg: ResampleConfig =
        serde_json::from_str(r#"{"method":"piecewise_constant","last_step_duration":3600.0}"#).unwrap();
    let resampler = Resampler::from_config(cfg).unwrap();
    assert_eq!(resampler.origin(), Origin::Unspecified);
    assert_eq!(resampler.method().kind(), Some(MethodKind::PiecewiseConstant));
    assert_eq!(resampler.last_step_duration(), Some(3_600.0));
}
