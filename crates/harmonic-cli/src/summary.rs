use console::Style;
use ndarray::Array2;
use harmonic_core::pipeline::config::PipelineConfig;
use harmonic_core::pipeline::PipelineOutput;
use harmonic_core::regression::summary::amplitude_phase;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_pipeline_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Harmonic Regression"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(19)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(config.input.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Output"),
        s.path.apply_to(config.output.display())
    );
    println!();

    // Selection
    println!("  {}", s.header.apply_to("Selection"));
    match config.selection.max_cloud_cover {
        Some(cc) => println!(
            "    {:<12}{}",
            s.label.apply_to("Cloud"),
            s.value.apply_to(format!("<= {cc}%"))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Cloud"),
            s.disabled.apply_to("any")
        ),
    }
    if let Some(r) = config.selection.region {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Clip"),
            s.value
                .apply_to(format!("{}x{} at ({}, {})", r.width, r.height, r.col, r.row))
        );
    }
    println!();

    // Model
    let h = &config.harmonic;
    println!("  {}", s.header.apply_to("Model"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Dependent"),
        s.value.apply_to(&h.dependent)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Order"),
        s.value.apply_to(format!("{} ({} coefficients)", h.order, 2 + 2 * h.order))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Epoch"),
        s.value.apply_to(h.epoch.to_rfc3339())
    );
    if let Some(w) = h.window {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Window"),
            s.value.apply_to(format!("{} .. {}", w.start, w.end))
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Solver"),
        s.method.apply_to(h.solver.strategy)
    );
    match h.solver.max_condition_number {
        Some(limit) => println!(
            "    {:<12}{}",
            s.label.apply_to("Max cond."),
            s.value.apply_to(format!("{limit:e}"))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("Max cond."),
            s.disabled.apply_to("off")
        ),
    }
    println!();

    // Extrema
    if let Some(ref ec) = config.extrema {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Max NDVI"),
            s.value
                .apply_to(format!("{} .. {}", ec.window.start, ec.window.end))
        );
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Max NDVI"),
            s.disabled.apply_to("disabled")
        );
    }
    if let Some(ref cc) = config.chart {
        let r = cc.region;
        println!(
            "  {:<14}{}",
            s.header.apply_to("Chart"),
            s.value
                .apply_to(format!("{}x{} at ({}, {})", r.width, r.height, r.col, r.row))
        );
    } else {
        println!(
            "  {:<14}{}",
            s.header.apply_to("Chart"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();
}

pub fn print_result_summary(config: &PipelineConfig, output: &PipelineOutput) {
    let s = Styles::new();
    let summary = &output.summary;

    println!();
    println!("  {}", s.header.apply_to("Fit"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(output.fitted.len())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Raster"),
        s.value.apply_to(format!("{}x{}", summary.cols, summary.rows))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Valid"),
        s.value.apply_to(summary.valid_pixels)
    );
    if summary.invalid_pixels > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Invalid"),
            s.disabled.apply_to(summary.invalid_pixels)
        );
    }
    println!();

    println!(
        "    {:<12}{:>12}{:>12}{:>12}",
        s.label.apply_to("Coefficient"),
        s.label.apply_to("min"),
        s.label.apply_to("mean"),
        s.label.apply_to("max")
    );
    for c in &summary.coefficients {
        println!(
            "    {:<12}{:>12.5}{:>12.5}{:>12.5}",
            s.method.apply_to(&c.name),
            c.min,
            c.mean,
            c.max
        );
    }
    println!();

    for i in 1..=config.harmonic.order {
        let Some((amplitude, phase)) = amplitude_phase(&output.coefficients, i) else {
            continue;
        };
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("Harmonic {i}")),
            s.value.apply_to(format!(
                "amplitude {:.4}, phase {:.3} rad",
                finite_mean(&amplitude),
                circular_mean(&phase)
            ))
        );
    }

    if let Some(ref rows) = output.chart {
        println!();
        println!(
            "    {:<12}{}",
            s.label.apply_to("Chart"),
            s.value.apply_to(format!("{} points", rows.len()))
        );
    }
}

fn finite_mean(values: &Array2<f64>) -> f64 {
    let (sum, n) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Mean direction of angles in radians, `atan2(mean sin, mean cos)`.
fn circular_mean(angles: &Array2<f64>) -> f64 {
    let (s, c, n) = angles
        .iter()
        .filter(|v| v.is_finite())
        .fold((0.0, 0.0, 0usize), |(s, c, n), &a| (s + a.sin(), c + a.cos(), n + 1));
    if n == 0 {
        f64::NAN
    } else {
        s.atan2(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::f64::consts::PI;

    #[test]
    fn circular_mean_wraps_at_pi() {
        let angles = array![[PI - 0.1, -PI + 0.1], [f64::NAN, PI - 0.1]];
        let mean = circular_mean(&angles);
        assert!((mean.abs() - (PI - 0.1 / 3.0)).abs() < 1e-3, "got {mean}");
    }

    #[test]
    fn means_of_all_nan_are_nan() {
        let empty = Array2::from_elem((2, 2), f64::NAN);
        assert!(finite_mean(&empty).is_nan());
        assert!(circular_mean(&empty).is_nan());
    }
}
