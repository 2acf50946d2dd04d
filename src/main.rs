use std::process::ExitCode;

use log::LevelFilter;
use neuralbg::{ConfigError, NetworkConfig};

const USAGE: &str = "usage: neuralbg [attract|repel|CONFIG.json] [--seed N]";

struct Args {
    config: NetworkConfig,
    seed: Option<u64>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut source = None;
    let mut seed = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                let parsed = value
                    .parse::<u64>()
                    .map_err(|e| format!("invalid seed '{}': {}", value, e))?;
                seed = Some(parsed);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ if source.is_none() => source = Some(arg),
            _ => return Err(format!("unexpected argument '{}'\n{}", arg, USAGE)),
        }
    }

    let config = match source.as_deref() {
        None => NetworkConfig::attract(),
        Some(path) if path.ends_with(".json") => NetworkConfig::load(path).map_err(describe)?,
        Some(name) => NetworkConfig::preset(name).map_err(describe)?,
    };

    Ok(Args { config, seed })
}

fn describe(e: ConfigError) -> String {
    e.to_string()
}

fn init_logging() {
    let level = std::env::var("NEURALBG_LOG")
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    let result = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {} {} {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .level_for("wgpu_core", LevelFilter::Warn)
        .level_for("wgpu_hal", LevelFilter::Warn)
        .level_for("naga", LevelFilter::Warn)
        .chain(std::io::stderr())
        .apply();

    if let Err(e) = result {
        eprintln!("logging initialization failed: {}", e);
    }
}

fn main() -> ExitCode {
    init_logging();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    match neuralbg::run(args.config, args.seed) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
