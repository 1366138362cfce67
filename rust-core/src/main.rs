use anyhow::{Context, Result};
use brillouin_zones::geometries::vector_ops::lattice_from_rows;
use brillouin_zones::lattice::{
    build_zone, fermi_sphere_radius, reciprocal_lattice, FaceLoops, Polyhedron,
};
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::{debug, info};
use nalgebra::Vector3;
use serde::Serialize;

#[derive(Parser)]
#[command(name = "brillouin-zones")]
#[command(about = "Construct n-th Brillouin zones and their face loops")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct LatticeArgs {
    /// Three primitive vectors, each given as "x,y,z"
    #[arg(long, num_args = 3, value_name = "X,Y,Z", value_parser = parse_vector, allow_hyphen_values = true)]
    vectors: Vec<Vec<f64>>,

    /// The vectors already span the reciprocal lattice
    #[arg(long)]
    reciprocal_input: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reciprocal basis of a direct lattice
    Reciprocal {
        /// Three primitive vectors, each given as "x,y,z"
        #[arg(long, num_args = 3, value_name = "X,Y,Z", value_parser = parse_vector, allow_hyphen_values = true)]
        vectors: Vec<Vec<f64>>,

        /// Print JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Build the n-th Brillouin zone and its face loops
    Zone {
        #[command(flatten)]
        lattice: LatticeArgs,

        /// Zone number (1 to 3)
        #[arg(short, long, default_value = "1")]
        zone: u32,

        /// Print JSON instead of plain text
        #[arg(long)]
        json: bool,
    },
    /// Radius of the free-electron Fermi sphere
    Fermi {
        #[command(flatten)]
        lattice: LatticeArgs,

        /// Valence electrons per primitive cell
        #[arg(long, default_value = "1")]
        valence: f64,
    },
}

#[derive(Serialize)]
struct ZoneReport<'a> {
    zone_number: u32,
    reciprocal_vectors: [Vector3<f64>; 3],
    polyhedron: &'a Polyhedron,
    face_loops: Vec<FaceLoops>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    debug!("Starting brillouin-zones v{}", brillouin_zones::VERSION);

    match cli.command {
        Commands::Reciprocal { vectors, json } => print_reciprocal(&vectors, json),
        Commands::Zone { lattice, zone, json } => print_zone(&lattice, zone, json),
        Commands::Fermi { lattice, valence } => print_fermi(&lattice, valence),
    }
}

fn parse_vector(text: &str) -> std::result::Result<Vec<f64>, String> {
    text.split(',')
        .map(|component| {
            component
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid component '{}': {}", component, e))
        })
        .collect()
}

impl LatticeArgs {
    /// Reciprocal basis, transforming the input first unless it already is one.
    fn reciprocal_vectors(&self) -> Result<[Vector3<f64>; 3]> {
        let vectors = lattice_from_rows(&self.vectors).context("Invalid lattice vectors")?;
        if self.reciprocal_input {
            return Ok(vectors);
        }
        reciprocal_lattice(&vectors).context("Cannot build the reciprocal lattice")
    }
}

fn print_reciprocal(rows: &[Vec<f64>], json: bool) -> Result<()> {
    let vectors = lattice_from_rows(rows).context("Invalid lattice vectors")?;
    let reciprocal = reciprocal_lattice(&vectors)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reciprocal)?);
    } else {
        for (i, b) in reciprocal.iter().enumerate() {
            println!("b{} = [{:.6}, {:.6}, {:.6}]", i, b.x, b.y, b.z);
        }
    }
    Ok(())
}

fn print_zone(lattice: &LatticeArgs, zone_number: u32, json: bool) -> Result<()> {
    let reciprocal_vectors = lattice.reciprocal_vectors()?;
    info!("Building Brillouin zone {}", zone_number);
    let polyhedron = build_zone(&reciprocal_vectors, zone_number)
        .with_context(|| format!("Cannot build zone {}", zone_number))?;
    let face_loops = polyhedron.face_loops();

    if json {
        let report = ZoneReport {
            zone_number,
            reciprocal_vectors,
            polyhedron: &polyhedron,
            face_loops,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Zone {}: {} faces, {} edges, {} vertices",
        zone_number,
        polyhedron.faces.len(),
        polyhedron.edges.len(),
        polyhedron.vertices.len()
    );
    for face_loops in &face_loops {
        let n = face_loops.normal;
        println!(
            "face {} (normal [{:.4}, {:.4}, {:.4}], offset {:.4}): {} loop(s)",
            face_loops.face,
            n.x,
            n.y,
            n.z,
            face_loops.offset,
            face_loops.loops.len()
        );
        for points in &face_loops.loops {
            let corners: Vec<String> = points
                .iter()
                .map(|p| format!("[{:.4}, {:.4}, {:.4}]", p.x, p.y, p.z))
                .collect();
            println!("  {}", corners.join(" -> "));
        }
    }
    Ok(())
}

fn print_fermi(lattice: &LatticeArgs, valence: f64) -> Result<()> {
    let reciprocal_vectors = lattice.reciprocal_vectors()?;
    let radius = fermi_sphere_radius(&reciprocal_vectors, valence);
    println!("Fermi sphere radius: {:.6}", radius);
    Ok(())
}
