use std::env;

use anyhow::Context;
use getopts::Options;
use tracing_subscriber::EnvFilter;

use pipemap::{server, Settings};

#[derive(Debug, PartialEq)]
enum Command {
    Help(String),
    Serve {
        host: Option<String>,
        port: Option<u16>,
    },
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("H", "host", "address to listen on", "HOST");
    opts.optopt("p", "port", "port to listen on", "PORT");
    opts.optflag("h", "help", "print this help menu");
    opts
}

fn usage(program: &str, opts: &Options) -> String {
    let brief = format!("Usage: {} [options]", program);
    opts.usage(&brief)
}

/// Parse `argv`, program name first. An empty `argv` is accepted.
fn parse_args<I>(argv: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut argv = argv.into_iter();
    let program = argv.next().unwrap_or_else(|| "pipemapd".into());
    let args: Vec<String> = argv.collect();

    let opts = options();
    let matches = opts.parse(&args).context("invalid arguments")?;
    if matches.opt_present("h") {
        return Ok(Command::Help(usage(&program, &opts)));
    }

    let port = match matches.opt_str("p") {
        Some(port) => Some(
            port.parse()
                .with_context(|| format!("invalid port {:?}", port))?,
        ),
        None => None,
    };

    Ok(Command::Serve {
        host: matches.opt_str("H"),
        port,
    })
}

/// Install the global subscriber. Returns false when one was already set.
fn init_logging() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        Ok(()) => true,
        Err(err) => {
            eprintln!("logging not initialised: {err}");
            false
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    init_logging();

    let (host, port) = match parse_args(env::args())? {
        Command::Help(usage) => {
            print!("{}", usage);
            return Ok(());
        }
        Command::Serve { host, port } => (host, port),
    };

    let mut settings = Settings::from_env()?;
    if let Some(host) = host {
        settings.host = host;
    }
    if let Some(port) = port {
        settings.port = port;
    }

    actix_web::rt::System::new()
        .block_on(server::run(settings))
        .context("pipe map server failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|a| a.to_string()).collect()
    }

    #[test]
    fn empty_argv_serves_with_defaults() {
        let command = parse_args(Vec::new()).unwrap();
        assert_eq!(
            command,
            Command::Serve {
                host: None,
                port: None
            }
        );
    }

    #[test]
    fn help_prints_usage() {
        match parse_args(argv(&["pipemapd", "-h"])).unwrap() {
            Command::Help(text) => assert!(text.starts_with("Usage: pipemapd [options]")),
            other => panic!("expected help, got {:?}", other),
        }
    }

    #[test]
    fn flags_override_host_and_port() {
        let command = parse_args(argv(&["pipemapd", "-H", "127.0.0.1", "--port", "9000"])).unwrap();
        assert_eq!(
            command,
            Command::Serve {
                host: Some("127.0.0.1".into()),
                port: Some(9000)
            }
        );
    }

    #[test]
    fn bad_port_is_an_error() {
        assert!(parse_args(argv(&["pipemapd", "-p", "eighty"])).is_err());
        assert!(parse_args(argv(&["pipemapd", "--bogus"])).is_err());
    }

    #[test]
    fn second_logging_init_reports_instead_of_panicking() {
        init_logging();
        assert!(!init_logging());
    }
}
