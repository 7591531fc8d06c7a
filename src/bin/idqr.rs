use aadhaar_qr::tools::{BatchSummary, dataset_iter, load_image_bytes};
use aadhaar_qr::{
    IdentifierSalt, RawPayload, Verifier, VerifierOptions, compute_fingerprint,
    hash_full_identifier,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "idqr", version, about = "Identity QR decoding tools")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode the identity QR in an image and print the record
    Verify {
        #[arg(long)]
        image: PathBuf,
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the deduplication fingerprint for the identity QR in an image
    Fingerprint {
        #[arg(long)]
        image: PathBuf,
    },
    /// Classify and decode a raw QR payload string
    Classify {
        #[arg(long)]
        payload: String,
    },
    /// Hash a full 12-digit identifier with the salt from IDQR_HASH_SALT
    HashId {
        #[arg(long)]
        number: String,
    },
    /// Verify every image under a directory and report the reading rate
    Batch {
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let verifier = Verifier::with_options(VerifierOptions::from_env());
    let ok = match cli.command {
        Command::Verify { image, json } => verify_cmd(&verifier, &image, json),
        Command::Fingerprint { image } => fingerprint_cmd(&verifier, &image),
        Command::Classify { payload } => classify_cmd(&verifier, &payload),
        Command::HashId { number } => hash_id_cmd(&number),
        Command::Batch { root, limit } => batch_cmd(&verifier, &root, limit),
    };
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_image(path: &Path) -> Option<Vec<u8>> {
    match load_image_bytes(path) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            eprintln!("Failed to read image {}: {}", path.display(), err);
            None
        }
    }
}

fn verify_cmd(verifier: &Verifier, image: &Path, json: bool) -> bool {
    let Some(bytes) = read_image(image) else {
        return false;
    };
    match verifier.verify(&bytes) {
        Ok(verification) => {
            if json {
                match serde_json::to_string_pretty(&verification) {
                    Ok(text) => println!("{text}"),
                    Err(err) => {
                        eprintln!("Failed to serialize result: {err}");
                        return false;
                    }
                }
            } else {
                let record = &verification.record;
                println!("Image: {}", image.display());
                println!("Format: {:?}", verification.payload_kind);
                println!("Reference: {}", verification.reference_id);
                println!("Name: {}", record.name.as_deref().unwrap_or("-"));
                println!("DOB: {}", record.date_of_birth.as_deref().unwrap_or("-"));
                println!(
                    "Gender: {}",
                    record.gender.as_ref().map(|g| g.as_str()).unwrap_or("-")
                );
                println!("UID (last 4): {}", record.uid_last_four.as_deref().unwrap_or("-"));
                println!("Postcode: {}", record.postcode.as_deref().unwrap_or("-"));
                println!("Signature: not checked");
            }
            true
        }
        Err(failure) => {
            eprintln!("Verification failed: {failure}");
            false
        }
    }
}

fn fingerprint_cmd(verifier: &Verifier, image: &Path) -> bool {
    let Some(bytes) = read_image(image) else {
        return false;
    };
    match verifier.verify(&bytes) {
        Ok(verification) => {
            println!("{}", compute_fingerprint(&verification.record));
            true
        }
        Err(failure) => {
            eprintln!("Verification failed: {failure}");
            false
        }
    }
}

fn classify_cmd(verifier: &Verifier, payload: &str) -> bool {
    match verifier.decode_record(&RawPayload::from(payload)) {
        Ok((kind, record)) => {
            println!("Format: {kind:?}");
            match serde_json::to_string_pretty(&record) {
                Ok(text) => println!("{text}"),
                Err(err) => eprintln!("Failed to serialize record: {err}"),
            }
            true
        }
        Err(failure) => {
            eprintln!("Decode failed: {failure}");
            false
        }
    }
}

fn hash_id_cmd(number: &str) -> bool {
    let salt = match IdentifierSalt::from_env() {
        Ok(salt) => salt,
        Err(err) => {
            eprintln!("Configuration error: {err}");
            return false;
        }
    };
    match hash_full_identifier(number, &salt) {
        Ok(hash) => {
            println!("{hash}");
            true
        }
        Err(err) => {
            eprintln!("{err}");
            false
        }
    }
}

fn batch_cmd(verifier: &Verifier, root: &Path, limit: Option<usize>) -> bool {
    if !root.exists() {
        eprintln!("Dataset root not found: {}", root.display());
        return false;
    }
    let paths: Vec<PathBuf> = dataset_iter(root, limit).collect();
    if paths.is_empty() {
        println!("No images found under {}", root.display());
        return true;
    }

    let images: Vec<Vec<u8>> = paths.iter().filter_map(|p| read_image(p)).collect();
    let slices: Vec<&[u8]> = images.iter().map(Vec::as_slice).collect();

    let start = Instant::now();
    let results = verifier.verify_batch(&slices);
    let elapsed = start.elapsed();

    let mut summary = BatchSummary::default();
    for result in &results {
        summary.record(result);
    }

    println!("Images: {}", summary.total);
    println!(
        "Reading rate: {}/{} = {:.2}%",
        summary.decoded,
        summary.total,
        summary.reading_rate()
    );
    for (reason, count) in &summary.failures {
        println!("  {reason}: {count}");
    }
    println!("Elapsed: {:.1}ms", elapsed.as_secs_f64() * 1000.0);
    true
}
