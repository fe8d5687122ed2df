use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Europe::Paris;
use chrono_tz::UTC;
use proptest::prelude::*;
use wattdf_core::{Frequency, FrequencySpec, MAX_TARGETS, Origin, WattError, index_to_freq};

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn every(s: &str) -> FrequencySpec {
    s.parse().unwrap()
}

#[test]
fn floor_and_ceil_align_on_period_boundaries() {
    let source = [at(2022, 1, 1, 0, 7), at(2022, 1, 1, 0, 22), at(2022, 1, 1, 0, 37)];

    let floored = index_to_freq(&source, &every("15min"), Origin::Floor, None, UTC).unwrap();
    assert_eq!(
        floored,
        vec![at(2022, 1, 1, 0, 0), at(2022, 1, 1, 0, 15), at(2022, 1, 1, 0, 30)]
    );

    let ceiled = index_to_freq(&source, &every("15min"), Origin::Ceil, None, UTC).unwrap();
    assert_eq!(ceiled, vec![at(2022, 1, 1, 0, 15), at(2022, 1, 1, 0, 30)]);

    let unaligned = index_to_freq(&source, &every("15min"), Origin::Unspecified, None, UTC).unwrap();
    assert_eq!(
        unaligned,
        vec![at(2022, 1, 1, 0, 7), at(2022, 1, 1, 0, 22), at(2022, 1, 1, 0, 37)]
    );
}

#[test]
fn explicit_origin_may_precede_source() {
    let source = [at(2022, 1, 1, 0, 0), at(2022, 1, 1, 0, 30)];
    let origin = Origin::At(at(2021, 12, 31, 23, 50));
    let targets = index_to_freq(&source, &every("15min"), origin, None, UTC).unwrap();
    assert_eq!(
        targets,
        vec![
            at(2021, 12, 31, 23, 50),
            at(2022, 1, 1, 0, 5),
            at(2022, 1, 1, 0, 20),
        ]
    );
}

#[test]
fn last_step_extends_grid_half_open() {
    let source = [at(2022, 1, 1, 0, 0), at(2022, 1, 2, 0, 0), at(2022, 1, 3, 0, 0)];
    let targets =
        index_to_freq(&source, &every("12h"), Origin::Unspecified, Some(86_400.0), UTC).unwrap();
    assert_eq!(targets.len(), 6);
    assert_eq!(targets.last().copied(), Some(at(2022, 1, 3, 12, 0)));

    // Without a last step the grid stops on the last source instant.
    let closed = index_to_freq(&source, &every("12h"), Origin::Unspecified, None, UTC).unwrap();
    assert_eq!(closed.len(), 5);
    assert_eq!(closed.last().copied(), Some(at(2022, 1, 3, 0, 0)));
}

#[test]
fn local_days_follow_daylight_saving() {
    // Local midnights around the 2022-03-27 spring-forward in Paris.
    let source = [
        at(2022, 3, 25, 23, 0),
        at(2022, 3, 26, 23, 0),
        at(2022, 3, 27, 22, 0),
    ];
    let targets = index_to_freq(&source, &every("1D"), Origin::Unspecified, None, Paris).unwrap();
    assert_eq!(targets, source.to_vec());
    assert_eq!(targets[2] - targets[1], TimeDelta::hours(23));

    // In UTC the same grid keeps 24-hour days.
    let utc = index_to_freq(&source, &every("1D"), Origin::Unspecified, None, UTC).unwrap();
    assert_eq!(utc, vec![at(2022, 3, 25, 23, 0), at(2022, 3, 26, 23, 0)]);
}

#[test]
fn floor_day_uses_local_midnight() {
    let source = [at(2022, 3, 27, 10, 0), at(2022, 3, 28, 10, 0)];
    let targets = index_to_freq(&source, &every("D"), Origin::Floor, None, Paris).unwrap();
    assert_eq!(targets, vec![at(2022, 3, 26, 23, 0), at(2022, 3, 27, 22, 0)]);
}

#[test]
fn months_start_on_first_day() {
    let source = [at(2022, 1, 31, 0, 0), at(2022, 4, 30, 0, 0)];
    let targets = index_to_freq(&source, &every("MS"), Origin::Floor, None, UTC).unwrap();
    assert_eq!(
        targets,
        vec![
            at(2022, 1, 1, 0, 0),
            at(2022, 2, 1, 0, 0),
            at(2022, 3, 1, 0, 0),
            at(2022, 4, 1, 0, 0),
        ]
    );
}

#[test]
fn weeks_start_on_monday() {
    // 2022-01-05 is a Wednesday.
    let source = [at(2022, 1, 5, 12, 0), at(2022, 1, 20, 0, 0)];
    let targets = index_to_freq(&source, &every("W"), Origin::Floor, None, UTC).unwrap();
    assert_eq!(
        targets,
        vec![at(2022, 1, 3, 0, 0), at(2022, 1, 10, 0, 0), at(2022, 1, 17, 0, 0)]
    );
}

#[test]
fn explicit_instants_are_returned_unchanged() {
    let source = [at(2022, 1, 1, 0, 0), at(2022, 1, 1, 1, 0)];
    let wanted = vec![at(2021, 6, 1, 0, 0), at(2022, 1, 1, 0, 30), at(2023, 1, 1, 0, 0)];
    let targets = index_to_freq(
        &source,
        &FrequencySpec::Instants(wanted.clone()),
        Origin::Ceil,
        None,
        UTC,
    )
    .unwrap();
    assert_eq!(targets, wanted);
}

#[test]
fn errors_are_classified() {
    let source = [at(2022, 1, 1, 0, 0), at(2022, 1, 1, 1, 0)];

    let err = index_to_freq(&[], &every("1h"), Origin::Unspecified, None, UTC).unwrap_err();
    assert_eq!(err, WattError::EmptySource);

    let err = index_to_freq(&source, &FrequencySpec::Instants(vec![]), Origin::Unspecified, None, UTC)
        .unwrap_err();
    assert_eq!(err, WattError::EmptyTargets);

    let unordered = FrequencySpec::Instants(vec![source[1], source[0]]);
    let err = index_to_freq(&source, &unordered, Origin::Unspecified, None, UTC).unwrap_err();
    assert!(err.is_invalid_timeseries());

    let late = Origin::At(at(2030, 1, 1, 0, 0));
    let err = index_to_freq(&source, &every("1h"), late, None, UTC).unwrap_err();
    assert_eq!(err, WattError::EmptyTargets);

    let decades_early = Origin::At(at(1970, 1, 1, 0, 0));
    let err = index_to_freq(&source, &every("1s"), decades_early, None, UTC).unwrap_err();
    assert!(matches!(err, WattError::Resampling(_)), "{err}");
    assert!(err.to_string().contains(&MAX_TARGETS.to_string()), "{err}");
    // Coarse steps from the same origin stay well under the limit.
    let monthly = index_to_freq(&source, &every("MS"), decades_early, None, UTC).unwrap();
    assert_eq!(monthly.len(), 52 * 12 + 1);

    for bad in [0.0, -60.0, f64::NAN] {
        let err = index_to_freq(&source, &every("1h"), Origin::Unspecified, Some(bad), UTC)
            .unwrap_err();
        assert!(matches!(err, WattError::InvalidTimestepDuration(_)), "{bad}: {err}");
    }
}

proptest! {
    #[test]
    fn fixed_grid_is_increasing_and_in_range(
        offsets in proptest::collection::btree_set(0i64..200_000, 1..40),
        step_idx in 0usize..5,
    ) {
        let steps = [Frequency::minutes(1), Frequency::minutes(7), Frequency::minutes(15), Frequency::hours(1), Frequency::hours(5)];
        let freq = FrequencySpec::Every(steps[step_idx]);
        let base = at(2022, 1, 1, 0, 0);
        let source: Vec<_> = offsets.iter().map(|&s| base + TimeDelta::seconds(s)).collect();

        let targets = index_to_freq(&source, &freq, Origin::Unspecified, None, UTC).unwrap();
        prop_assert_eq!(targets[0], source[0]);
        prop_assert!(targets.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(targets.iter().all(|&t| t >= source[0] && t <= source[source.len() - 1]));
    }

    #[test]
    fn multi_unit_steps_are_spaced_by_their_full_length(
        offsets in proptest::collection::btree_set(0i64..400_000, 2..30),
        step_idx in 0usize..6,
        floor in any::<bool>(),
    ) {
        let steps = [
            Frequency::seconds(7),
            Frequency::minutes(15),
            Frequency::minutes(90),
            Frequency::hours(2),
            Frequency::hours(12),
            Frequency::hours(30),
        ];
        let freq = steps[step_idx];
        let step = TimeDelta::seconds(freq.fixed_seconds().unwrap());
        let base = at(2022, 1, 1, 0, 0);
        let source: Vec<_> = offsets.iter().map(|&s| base + TimeDelta::seconds(s)).collect();
        let origin = if floor { Origin::Floor } else { Origin::Unspecified };

        let targets = index_to_freq(&source, &FrequencySpec::Every(freq), origin, None, UTC).unwrap();
        prop_assert!(targets.windows(2).all(|w| w[1] - w[0] == step));
        // The grid reaches the last sample without stepping past it.
        let last = source[source.len() - 1];
        prop_assert!(targets[targets.len() - 1] <= last);
        prop_assert!(targets[targets.len() - 1] + step > last);
    }
}
