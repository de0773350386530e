//! @ai:module:intent Chart generation for benchmark results
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator
//! @ai:module:stateless true

use crate::metrics::BenchmarkResult;
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Generate all charts from results
    fn generate_all(&self, result: &BenchmarkResult, output_dir: &Path) -> Result<Vec<String>>;
}

/// @ai:intent Generates per-model comparison charts from benchmark results
pub struct ChartGenerator;

impl ChartGenerator {
    /// @ai:intent Create a new chart generator
    /// @ai:effects pure
    pub fn new() -> Self {
        Self
    }

    /// @ai:intent Upper bound for a value axis, never zero
    /// @ai:effects pure
    fn axis_max(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.fold(0.0, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    /// @ai:intent Generate p50/p99 latency bars per model
    /// @ai:effects fs:write
    fn generate_latency_chart(&self, result: &BenchmarkResult, output_path: &Path) -> Result<()> {
        let data: Vec<(&str, f64, f64)> = result
            .models
            .iter()
            .map(|m| {
                (
                    m.model.as_str(),
                    m.p50_latency_ms.unwrap_or(0) as f64,
                    m.p99_latency_ms.unwrap_or(0) as f64,
                )
            })
            .collect();

        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = Self::axis_max(data.iter().map(|(_, _, p99)| *p99));
        let mut chart = ChartBuilder::on(&root)
            .caption("Latency by Model", ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..data.len() as i32, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.len().max(1))
            .y_desc("Latency (ms)")
            .x_label_formatter(&|x| {
                data.get(*x as usize)
                    .map(|(name, _, _)| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart
            .draw_series(data.iter().enumerate().map(|(i, (_, p50, _))| {
                let mut bar =
                    Rectangle::new([(i as i32, 0.0), (i as i32 + 1, *p50)], BLUE.mix(0.7).filled());
                bar.set_margin(0, 0, 10, 45);
                bar
            }))?
            .label("p50")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.mix(0.7).filled()));

        chart
            .draw_series(data.iter().enumerate().map(|(i, (_, _, p99))| {
                let mut bar =
                    Rectangle::new([(i as i32, 0.0), (i as i32 + 1, *p99)], RED.mix(0.7).filled());
                bar.set_margin(0, 0, 45, 10);
                bar
            }))?
            .label("p99")
            .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], RED.mix(0.7).filled()));

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    /// @ai:intent Generate cost-per-request bars per model
    /// @ai:effects fs:write
    fn generate_cost_chart(&self, result: &BenchmarkResult, output_path: &Path) -> Result<()> {
        let data: Vec<(&str, f64)> = result
            .models
            .iter()
            .map(|m| (m.model.as_str(), m.cost_per_request.unwrap_or(0.0)))
            .collect();

        let root = BitMapBackend::new(output_path, (800, 500)).into_drawing_area();
        root.fill(&WHITE)?;

        let y_max = Self::axis_max(data.iter().map(|(_, cost)| *cost));
        let mut chart = ChartBuilder::on(&root)
            .caption("Cost per Request by Model", ("sans-serif", 25))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(0..data.len() as i32, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(data.len().max(1))
            .y_desc("USD")
            .y_label_formatter(&|y| format!("{:.4}", y))
            .x_label_formatter(&|x| {
                data.get(*x as usize)
                    .map(|(name, _)| name.to_string())
                    .unwrap_or_default()
            })
            .draw()?;

        chart.draw_series(data.iter().enumerate().map(|(i, (_, cost))| {
            let mut bar =
                Rectangle::new([(i as i32, 0.0), (i as i32 + 1, *cost)], GREEN.mix(0.7).filled());
            bar.set_margin(0, 0, 15, 15);
            bar
        }))?;

        root.present()?;
        Ok(())
    }
}

impl Default for ChartGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Generate all charts
    /// @ai:effects fs:write
    fn generate_all(&self, result: &BenchmarkResult, output_dir: &Path) -> Result<Vec<String>> {
        std::fs::create_dir_all(output_dir)?;

        if result.models.is_empty() {
            return Ok(vec![]);
        }

        let mut generated = Vec::new();

        self.generate_latency_chart(result, &output_dir.join("latency.png"))?;
        generated.push("latency.png".to_string());

        self.generate_cost_chart(result, &output_dir.join("cost.png"))?;
        generated.push("cost.png".to_string());

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::sample_benchmark;
    use tempfile::TempDir;

    #[test]
    fn test_axis_max() {
        assert_eq!(ChartGenerator::axis_max(std::iter::empty()), 1.0);
        assert!((ChartGenerator::axis_max([10.0, 20.0].into_iter()) - 22.0).abs() < 1e-9);
    }

    #[test]
    fn test_generate_all_charts() {
        let generator = ChartGenerator::new();
        let temp = TempDir::new().unwrap();

        let files = generator.generate_all(&sample_benchmark(), temp.path()).unwrap();

        assert_eq!(files.len(), 2);
        assert!(temp.path().join("latency.png").exists());
        assert!(temp.path().join("cost.png").exists());
    }
}
