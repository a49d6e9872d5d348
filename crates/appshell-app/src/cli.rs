use clap::Parser;

/// appshell: hosts local web applications in borderless native windows.
#[derive(Parser, Debug)]
#[command(name = "appshell", version, about)]
pub struct Args {
    /// Config file path override. Defaults to `app.json` next to the
    /// executable.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level or filter override (trace, debug, info, warn, error, or an
    /// `EnvFilter` directive).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Control-plane port override.
    #[arg(long)]
    pub port: Option<u16>,

    /// Run without native windows.
    #[arg(long)]
    pub headless: bool,

    /// Start even if another instance already answers on the port.
    #[arg(long)]
    pub no_singleton_check: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
