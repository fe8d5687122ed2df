use chrono::{TimeDelta, TimeZone, Utc};
use tracing_subscriber::fmt::format::FmtSpan;
use wattdf::{Method, MethodKind, Origin, Resampler, TimeSeries, to_freq, trim_out_of_bounds};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Spans are recorded with `--features tracing`.
    // Suggested: RUST_LOG=wattdf=trace,wattdf_core=debug
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();

    // Half-hourly meter readings in kWh over one morning in Paris.
    let start = Utc.with_ymd_and_hms(2022, 3, 27, 5, 0, 0).single().ok_or("bad start")?;
    let readings = [0.4, 0.5, 0.9, 1.2, 1.1, 0.8, 0.7, 0.6];
    let instants = (0..readings.len())
        .map(|i| start + TimeDelta::minutes(30 * i as i64))
        .collect();
    let energy = TimeSeries::from_f64(instants, readings.to_vec())?
        .with_name("energy_kwh")
        .with_index_name("timestamp")
        .with_timezone(chrono_tz::Europe::Paris);

    // 1. Hourly energy, keeping the total.
    let hourly = Resampler::builder()
        .origin(Origin::Floor)
        .last_step_duration(1_800.0)
        .method(MethodKind::VolumeConservative)
        .build()?
        .to_freq(&energy, &"1h".parse()?)?;
    println!("hourly energy:");
    for (t, v) in hourly.iter() {
        println!("  {t}  {v:?}");
    }

    // 2. Quarter-hourly values, read off the original curve.
    let quarters = to_freq(
        &energy,
        &"15min".parse()?,
        Origin::Unspecified,
        None,
        &Method::PiecewiseAffine,
    )?;
    println!("quarter-hourly interpolation: {} points", quarters.len());

    // 3. Explicit instants with a sentinel outside the readings.
    let checkpoints = vec![start - TimeDelta::hours(1), start, start + TimeDelta::hours(5)];
    let held = to_freq(&energy, &checkpoints.into(), Origin::Unspecified, None, &Method::PiecewiseConstant)?;
    let held = trim_out_of_bounds(&energy, &held, Some(0.0))?;
    println!("checkpoints: {:?}", held.values());

    Ok(())
}
