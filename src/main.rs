use hero_battle::simulate::PolicyKind;
use hero_battle::{run, CliOptions};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!(
        "Usage: hero-battle [--roster roster.json] [--seed SEED] [--policy first|random] \
[--sims N] [--campaign] [--log-json log.json]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut roster_path = PathBuf::from("roster.json");
    let mut seed = None;
    let mut policy = PolicyKind::FirstTarget;
    let mut sims = None;
    let mut campaign = false;
    let mut log_json = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--roster" => {
                roster_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--roster requires a path (e.g. --roster roster.json)")
                })?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = Some(val.parse()?);
            }
            "--policy" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--policy requires first or random"))?;
                policy = match val.to_ascii_lowercase().as_str() {
                    "first" => PolicyKind::FirstTarget,
                    "random" => PolicyKind::Random,
                    other => anyhow::bail!("Unknown policy {other} (use first or random)"),
                };
            }
            "--sims" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sims requires a number"))?;
                sims = Some(val.parse()?);
            }
            "--campaign" => campaign = true,
            "--log-json" => {
                log_json = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--log-json requires a path (e.g. --log-json log.json)")
                })?);
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    Ok(CliOptions {
        roster_path,
        seed,
        policy,
        sims,
        campaign,
        log_json,
    })
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let opts = parse_args()?;
    run(opts)
}
