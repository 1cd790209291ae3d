use chrono::Local;
use keather_core::{CurrentWeather, ForecastPoint, Phase, Units, ViewState};
use std::fmt::Write;

const TITLE: &str = "KEATHER";

/// Text rendering of the screen state.
pub fn render(state: &ViewState, units: Units) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_screen(&mut out, state, units);
    out
}

fn write_screen(out: &mut String, state: &ViewState, units: Units) -> std::fmt::Result {
    match &state.phase {
        Phase::Loading => writeln!(out, "Loading data..."),
        Phase::Error => writeln!(out, "Unable to fetch weather data."),
        Phase::Ready(current) => {
            writeln!(out, "{TITLE}")?;
            writeln!(out)?;
            write_current(out, current, units)?;
            let forecast = state.visible_forecast();
            if !forecast.is_empty() {
                writeln!(out)?;
                write_forecast(out, forecast)?;
            }
            let [top, bottom] = state.gradient();
            writeln!(out)?;
            writeln!(out, "theme    {top} -> {bottom}")
        }
    }
}

fn write_current(out: &mut String, current: &CurrentWeather, units: Units) -> std::fmt::Result {
    match &current.place {
        Some(place) => writeln!(out, "{place}")?,
        None => writeln!(out, "Unknown Location")?,
    }
    writeln!(out, "[{}]", current.condition.icon())?;
    writeln!(out, "{}°", rounded(current.temperature))?;
    writeln!(out, "{}", current.description)?;
    writeln!(out)?;
    writeln!(out, "wind     {:.1} {}", current.wind_speed, units.wind_speed_label())?;
    writeln!(out, "humidity {}%", current.humidity_pct)?;
    if let Some(sunrise) = current.sunrise {
        writeln!(out, "sunrise  {}", sunrise.with_timezone(&Local).format("%H:%M:%S"))?;
    }
    Ok(())
}

fn write_forecast(out: &mut String, forecast: &[ForecastPoint]) -> std::fmt::Result {
    for point in forecast {
        writeln!(
            out,
            "{:<4} {:>4}°  {}",
            point.time.with_timezone(&Local).format("%a").to_string(),
            rounded(point.temperature),
            point.condition.icon()
        )?;
    }
    Ok(())
}

/// Nearest whole degree, halves rounding up (-2.5 -> -2), never `-0`.
fn rounded(temperature: f64) -> f64 {
    let whole = (temperature + 0.5).floor();
    if whole == 0.0 { 0.0 } else { whole }
}
