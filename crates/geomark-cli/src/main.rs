//! geomark CLI - Geodesic measurement tools
//!
//! One-shot measurements between coordinates and inspection of saved
//! measurement documents.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use geomark::{azimuth, distance, midpoint, GeoPoint, Snapshot};

#[derive(Parser)]
#[command(name = "geomark")]
#[command(about = "Geodesic measurement toolbox", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure the geodesic between two coordinates
    Measure {
        /// Start coordinate as "lat,lng" in decimal degrees
        from: String,
        /// End coordinate as "lat,lng" in decimal degrees
        to: String,
    },
    /// Display information about a measurement document
    Info {
        /// Path to the .json document
        file: PathBuf,
    },
    /// Re-derive all measurements in a document and write it back out
    Normalize {
        /// Input .json document
        input: PathBuf,
        /// Output .json document
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Measure { from, to } => {
            measure(&from, &to)?;
        }
        Commands::Info { file } => {
            show_info(&file)?;
        }
        Commands::Normalize { input, output } => {
            normalize(&input, &output)?;
        }
    }

    Ok(())
}

/// Parse "lat,lng" in decimal degrees.
fn parse_coordinate(text: &str) -> Result<GeoPoint> {
    let (lat, lng) = text
        .split_once(',')
        .ok_or_else(|| anyhow::anyhow!("expected \"lat,lng\", got {:?}", text))?;
    let lat: f64 = lat.trim().parse()?;
    let lng: f64 = lng.trim().parse()?;
    if !(-90.0..=90.0).contains(&lat) {
        anyhow::bail!("latitude {} out of range [-90, 90]", lat);
    }
    if !(-180.0..=180.0).contains(&lng) {
        anyhow::bail!("longitude {} out of range [-180, 180]", lng);
    }
    Ok(GeoPoint::new(lat, lng))
}

fn measure(from: &str, to: &str) -> Result<()> {
    let a = parse_coordinate(from)?;
    let b = parse_coordinate(to)?;

    let d = distance(a, b);
    let az = azimuth(a, b);
    let mid = midpoint(a, b);

    if d >= 1000.0 {
        println!("Distance: {:.3} km", d / 1000.0);
    } else {
        println!("Distance: {:.1} m", d);
    }
    println!("Azimuth:  {:.1}\u{b0}", az);
    println!("Midpoint: {:.6}, {:.6}", mid.lat, mid.lng);

    Ok(())
}

fn show_info(file: &PathBuf) -> Result<()> {
    use std::fs;

    let json = fs::read_to_string(file)?;
    let snapshot = Snapshot::from_json(&json)?;

    println!("geomark document: {}", file.display());
    println!("  Version: {}", snapshot.version);
    println!("  Points: {}", snapshot.points.len());
    println!("  Lines: {}", snapshot.lines.len());
    println!("  Circles: {}", snapshot.circles.len());
    println!("  Polygons: {}", snapshot.polygons.len());
    if !snapshot.triangles.is_empty() {
        println!("  Triangles: {}", snapshot.triangles.len());
    }
    if !snapshot.boundaries.is_empty() {
        println!("  Boundaries: {}", snapshot.boundaries.len());
    }

    if !snapshot.lines.is_empty() {
        println!("\nLines:");
        for (i, line) in snapshot.lines.iter().enumerate() {
            println!(
                "  {}: {} vertices, {:.1} m",
                i + 1,
                line.points.len(),
                line.total_distance
            );
        }
    }
    if !snapshot.polygons.is_empty() {
        println!("\nPolygons:");
        for (i, polygon) in snapshot.polygons.iter().enumerate() {
            println!(
                "  {}: {} vertices, area {:.1} m\u{b2}, perimeter {:.1} m",
                i + 1,
                polygon.points.len(),
                polygon.area,
                polygon.perimeter
            );
        }
    }

    Ok(())
}

fn normalize(input: &PathBuf, output: &PathBuf) -> Result<()> {
    use std::fs;

    let json = fs::read_to_string(input)?;
    let snapshot = Snapshot::from_json(&json)?;

    // Restoring recomputes every derived measurement from the stored
    // coordinates, so stale totals in hand-edited files get fixed.
    let graph = snapshot.restore()?;
    let normalized = Snapshot::capture(&graph);

    fs::write(output, normalized.to_json()?)?;
    println!(
        "Normalized {} to {}",
        input.display(),
        output.display()
    );
    Ok(())
}
