use chrono::{TimeZone, Utc};
use wattdf_types::{Frequency, FrequencySpec, MethodKind, Origin, ResampleConfig, WattError};

#[test]
fn resample_config_roundtrip() {
    let cfg = ResampleConfig {
        origin: Origin::At(Utc.with_ymd_and_hms(2022, 1, 1, 6, 0, 0).unwrap()),
        last_step_duration: Some(3600.0),
        method: MethodKind::FlowRateConservative,
    };

    let json = serde_json::to_string(&cfg).expect("serialize resample config");
    let de: ResampleConfig = serde_json::from_str(&json).expect("deserialize resample config");

    assert_eq!(de, cfg);
}

#[test]
fn resample_config_defaults_when_fields_missing() {
    let de: ResampleConfig = serde_json::from_str("{}").expect("deserialize empty config");
    assert_eq!(de, ResampleConfig::default());
    assert_eq!(de.method, MethodKind::PiecewiseAffine);
    assert_eq!(de.origin, Origin::Unspecified);
    assert!(de.last_step_duration.is_none());
}

#[test]
fn method_kind_uses_snake_case_tags() {
    let json = serde_json::to_string(&MethodKind::VolumeConservative).unwrap();
    assert_eq!(json, "\"volume_conservative\"");
    let de: MethodKind = serde_json::from_str("\"piecewise_constant\"").unwrap();
    assert_eq!(de, MethodKind::PiecewiseConstant);
}

#[test]
fn origin_tags() {
    assert_eq!(serde_json::to_string(&Origin::Floor).unwrap(), "\"floor\"");
    let de: Origin = serde_json::from_str("\"ceil\"").unwrap();
    assert_eq!(de, Origin::Ceil);
}

#[test]
fn frequency_serializes_as_period_string() {
    let f = Frequency::minutes(15);
    let json = serde_json::to_string(&f).unwrap();
    assert_eq!(json, "\"15min\"");
    let de: Frequency = serde_json::from_str(&json).unwrap();
    assert_eq!(de, f);
    assert!(serde_json::from_str::<Frequency>("\"0min\"").is_err());
}

#[test]
fn frequency_spec_accepts_string_or_instants() {
    let every: FrequencySpec = serde_json::from_str("\"1h\"").unwrap();
    assert_eq!(every, FrequencySpec::Every(Frequency::hours(1)));

    let t0 = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
    let explicit = FrequencySpec::Instants(vec![t0]);
    let json = serde_json::to_string(&explicit).unwrap();
    let de: FrequencySpec = serde_json::from_str(&json).unwrap();
    assert_eq!(de, explicit);
}

#[test]
fn validate_rejects_non_positive_last_step() {
    for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let cfg = ResampleConfig {
            last_step_duration: Some(bad),
            ..ResampleConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, WattError::InvalidTimestepDuration(_)));
        assert!(err.is_invalid_timeseries());
    }
    assert!(ResampleConfig::default().validate().is_ok());
}
