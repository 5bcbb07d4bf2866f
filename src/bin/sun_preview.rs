use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use nalgebra::Vector3;
use plotters::prelude::*;
use rust_orrery::shading::sun::{heat_to_color, surface_color, PALETTE, RAMP_BREAKS};

/// Renders the sun's surface shader on the CPU, for eyeballing changes without a GPU.
#[derive(Debug, Parser)]
#[command(name = "sun_preview")]
struct Args {
    /// Shader clock, in seconds
    #[arg(long, default_value_t = 0.0)]
    time: f32,

    /// Side length of the disc image, in pixels
    #[arg(long, default_value_t = 256)]
    size: u32,

    /// Where to put the images
    #[arg(long, default_value = "plots")]
    out_dir: PathBuf,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    std::fs::create_dir_all(&args.out_dir)?;

    let disc_path = args.out_dir.join(format!("sun-disc-{:.2}.png", args.time));
    draw_disc(&disc_path, args.size, args.time)?;
    log::info!("Wrote {}", disc_path.display());

    let ramp_path = args.out_dir.join("sun-ramp.png");
    draw_ramp(&ramp_path, 200)?;
    log::info!("Wrote {}", ramp_path.display());

    Ok(())
}

/// The front hemisphere of the sun, seen straight on.
fn draw_disc(path: &Path, size: u32, time: f32) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (size, size)).into_drawing_area();
    root.fill(&BLACK)?;

    let half = size as f32 / 2.0;
    for py in 0..size {
        for px in 0..size {
            let x = (px as f32 + 0.5 - half) / half;
            let y = (half - py as f32 - 0.5) / half;
            let rr = x * x + y * y;
            if rr > 1.0 {
                continue;
            }

            let point = Vector3::new(x, y, (1.0 - rr).sqrt());
            let color = surface_color(&point, time);
            root.draw_pixel((px as i32, py as i32), &to_rgb(&color.xyz()))?;
        }
    }

    root.present()?;
    Ok(())
}

/// Each channel of the heat ramp, plus faint markers where the ramp changes segment.
fn draw_ramp(path: &Path, n_points: usize) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (640, 480)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Heat ramp", ("sans-serif", 20))
        .margin(5)
        .x_label_area_size(30)
        .y_label_area_size(30)
        .build_cartesian_2d(0.0f32..1.0f32, 0.0f32..1.05f32)?;

    chart.configure_mesh().x_desc("heat").draw()?;

    let samples: Vec<(f32, Vector3<f32>)> = (0..=n_points)
        .map(|i| i as f32 / n_points as f32)
        .map(|h| (h, heat_to_color(h)))
        .collect();

    for (channel, color) in [(0, RED), (1, GREEN), (2, BLUE)].iter() {
        chart.draw_series(LineSeries::new(
            samples.iter().map(|(h, c)| (*h, c[*channel])),
            color,
        ))?;
    }

    for &edge in RAMP_BREAKS.iter() {
        chart.draw_series(LineSeries::new(
            vec![(edge, 0.0), (edge, 1.05)],
            BLACK.mix(0.3),
        ))?;
    }

    // Swatches for the palette stops along the top
    let stops = PALETTE.len();
    chart.draw_series(PALETTE.iter().enumerate().map(|(i, stop)| {
        let x0 = i as f32 / stops as f32;
        let x1 = (i + 1) as f32 / stops as f32;
        Rectangle::new([(x0, 1.0), (x1, 1.05)], to_rgb(&Vector3::from(*stop)).filled())
    }))?;

    root.present()?;
    Ok(())
}

fn to_rgb(color: &Vector3<f32>) -> RGBColor {
    let channel = |c: f32| (c.max(0.0).min(1.0) * 255.0).round() as u8;
    RGBColor(channel(color.x), channel(color.y), channel(color.z))
}
