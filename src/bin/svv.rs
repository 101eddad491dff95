use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use svv::election::{Election, ElectionParameters};
use svv::sbb::JsonIndent;
use svv::verifier;

const LOG_TARGET: &str = "bin::svv";

#[derive(Debug, Parser)]
#[command(name = "svv")]
#[command(about = "Run a simulated split-value election and verify its transcript", long_about = None)]
struct Args {
    /// Election id; parameters are read from `<election_id>.parameters.txt`
    /// if that file exists, else the built-in demo parameters are used (with
    /// this id substituted in).
    #[arg(env = "SVV_ELECTION_ID")]
    election_id: Option<String>,

    /// Skip re-verifying the transcript after running the election.
    #[arg(long, env = "SVV_NO_VERIFY", default_value_t = false)]
    no_verify: bool,

    /// Toggle structured (JSON) logs.
    #[arg(long, env = "SVV_LOG_JSON", default_value_t = false)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.json)?;

    let params = load_parameters(args.election_id.as_deref()).context("failed to load election parameters")?;
    let election_id = params.election_id.clone();
    tracing::info!(target: LOG_TARGET, election_id = %election_id, n_voters = params.n_voters, "starting election simulation");

    let mut election = Election::new(params).context("failed to set up election")?;
    election.run().context("failed to run election")?;

    let sbb_path = PathBuf::from(format!("{election_id}.sbb.txt"));
    write_transcript(&election, &sbb_path).with_context(|| format!("failed to write {}", sbb_path.display()))?;
    tracing::info!(target: LOG_TARGET, path = %sbb_path.display(), "transcript written");

    if !args.no_verify {
        tracing::info!(target: LOG_TARGET, "verifying transcript");
        verifier::verify(&election.sbb).context("transcript verification failed")?;
        tracing::info!(target: LOG_TARGET, "all verifications passed");
    }

    Ok(())
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::fmt().with_env_filter(filter).with_target(false);
    if json {
        builder.json().flatten_event(true).init();
    } else {
        builder.compact().init();
    }
    Ok(())
}

/// Read `<election_id>.parameters.txt` if given and present on disk,
/// otherwise fall back to the built-in demo election (substituting in the
/// requested id, if any, so `<id>.sbb.txt` still lands where expected).
fn load_parameters(election_id: Option<&str>) -> Result<ElectionParameters> {
    if let Some(election_id) = election_id {
        let path = PathBuf::from(format!("{election_id}.parameters.txt"));
        if path.exists() {
            let contents = std::fs::read_to_string(&path).with_context(|| format!("failed to read {}", path.display()))?;
            let params: ElectionParameters = serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
            params.validate().context("election parameters failed validation")?;
            return Ok(params);
        }
        let mut params = ElectionParameters::default_election();
        params.election_id = election_id.to_string();
        params.validate().context("election parameters failed validation")?;
        return Ok(params);
    }
    let params = ElectionParameters::default_election();
    params.validate().context("election parameters failed validation")?;
    Ok(params)
}

fn write_transcript(election: &Election, path: &PathBuf) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let indent = match election.params.json_indent {
        0 => JsonIndent::Compact,
        n => JsonIndent::Pretty(n),
    };
    election.sbb.write(&mut writer, indent)?;
    Ok(())
}
