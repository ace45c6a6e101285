use imgixer::constants::ENV_LOG_LEVEL;
use imgixer::{Imgixer, ParamSet, ParamValue};
use std::env;
use std::process;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn usage() -> ! {
    eprintln!("usage: imgixer <path> [key=value ...]");
    process::exit(2);
}

fn parse_params(args: impl Iterator<Item = String>) -> Result<ParamSet, String> {
    let mut params = ParamSet::new();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected key=value, got `{}`", arg))?;
        if key.is_empty() {
            return Err(format!("missing key in `{}`", arg));
        }
        params.insert(key, ParamValue::parse_loose(value));
    }
    Ok(params)
}

fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_env(ENV_LOG_LEVEL))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        usage();
    };

    let params = match parse_params(args) {
        Ok(params) => params,
        Err(e) => {
            error!("{}", e);
            usage();
        }
    };

    let imgixer = match Imgixer::from_env() {
        Ok(imgixer) => imgixer,
        Err(e) => {
            error!("Failed to load config: {}", e);
            process::exit(1);
        }
    };

    match imgixer.imgix(path.as_str(), &params) {
        Ok(url) => println!("{}", url),
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    }
}
