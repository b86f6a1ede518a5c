use std::sync::Arc;

use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;

use iterboot::bootstrap::IterativeBootstrapper;
use iterboot::compat::{validate_tags, ValidatedPairing};
use iterboot::params::presets::{iterative_composite, iterative_flexible, single_pass};
use iterboot::params::ContextParams;
use iterboot::precision::measure_precision;
use iterboot::sampling::sample_real_slots;
use iterboot::sim::{SimCiphertext, SimDecoder, SimulatedBootstrapper};

type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// 3 words per level, 2 iterations
    Composite,
    /// single-word levels, 2 iterations
    Flexible,
    /// single-word levels, 1 iteration
    Single,
}

/// Iterative bootstrapping walk-through on the simulated backend.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Context configuration.
    #[arg(long, value_enum, default_value = "composite")]
    preset: Preset,

    /// Refresh passes for the amplified bootstrap.
    #[arg(long, default_value_t = 2)]
    iterations: u32,

    /// Declared single-pass precision in bits. Defaults to the calibrated value.
    #[arg(long)]
    precision: Option<u32>,

    /// Precision one simulated pass reaches.
    #[arg(long, default_value_t = 20.0)]
    single_pass_bits: f64,

    /// Seed for the input vector and the simulated noise.
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Number of input values to encrypt. Defaults to every slot of the context.
    #[arg(long)]
    slots: Option<usize>,

    /// Bootstrapping method checked by the compatibility gate.
    #[arg(long, default_value = "GINX")]
    method: String,

    /// Parameter set paired with --method.
    #[arg(long, default_value = "STD128")]
    profile: String,
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let pairing = gate(&args.method, &args.profile)?;
    println!(
        "Bootstrapping method {} accepted for parameter set {}",
        pairing.method(),
        pairing.profile()
    );

    let params = match args.preset {
        Preset::Composite => iterative_composite(pairing)?,
        Preset::Flexible => iterative_flexible(pairing)?,
        Preset::Single => single_pass(pairing)?,
    };
    print_context(&params);
    run(&args, params)
}

/// Rejected pairings stop the program before any context is set up.
fn gate(method: &str, profile: &str) -> AppResult<ValidatedPairing> {
    validate_tags(method, profile).map_err(|err| {
        eprintln!("configuration rejected: {err}");
        err.into()
    })
}

fn print_context(params: &ContextParams) {
    println!("CKKS scheme is using ring dimension {}", params.ring_dim);
    println!(
        "scaling={} compositeDegree={} modBitWidth={:.2} targetHWArchWordSize={}",
        params.scaling_technique,
        params.composite_degree,
        params.mod_bit_width(),
        params.register_word_size
    );
    println!(
        "depth={} (levels after bootstrap {}, bootstrap {}, iterations {})",
        params.multiplicative_depth(),
        params.depth.levels_after_bootstrap(),
        params.depth.bootstrap_depth(),
        params.iterations()
    );
    println!();
}

fn run(args: &Args, params: Arc<ContextParams>) -> AppResult<()> {
    let mut rng = ChaCha20Rng::seed_from_u64(args.seed);
    let values = sample_real_slots(args.slots.unwrap_or(params.num_slots), &mut rng);
    let input = SimCiphertext::encrypt_depleted(&values, &params)?;

    let primitive = SimulatedBootstrapper::new(params.clone(), args.single_pass_bits, args.seed)?;
    let boot = IterativeBootstrapper::with_params(primitive, SimDecoder, &params)?;

    let mut session = boot.open(input, args.iterations);
    let (_, calibration) = boot.calibrate(&mut session, &values)?;
    println!("Bootstrapping precision after 1 iteration: {}", calibration.hint);
    if let Some(declared) = args.precision {
        println!("Precision input to algorithm: {declared}");
    }

    let outcome = boot.amplify(&mut session, args.precision)?;
    let precision = measure_precision(outcome.ciphertext.slots(), &values)?;

    println!();
    println!(
        "Bootstrapping precision after {} iterations: {:.4}",
        outcome.iterations,
        precision.bits()
    );
    println!(
        "Number of levels remaining after {} bootstrappings: {}",
        outcome.iterations, outcome.remaining_levels
    );
    Ok(())
}
