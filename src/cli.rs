use clap::Parser;
use std::ffi::OsString;

#[derive(Parser)]
#[command(name = "km-install")]
#[command(about = "Install the prebuilt Komodo CLI (km) from GitHub Releases")]
#[command(
    disable_version_flag = true,
    after_help = "Options:\n  --version=<TAG>  Install release TAG instead of the latest release\n  --user           Install to $HOME/.local/bin instead of /usr/local/bin\n\nExamples:\n  km-install\n  km-install --user\n  km-install -v --version=v1.16.2 --user"
)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long)]
    pub quiet: bool,

    /// Installer options; unrecognized ones are ignored
    #[arg(
        value_name = "OPTIONS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub options: Vec<OsString>,
}

impl Cli {
    /// Pick up `-v`/`-q` given after the first installer option, where clap
    /// has already folded them into `options`.
    pub fn absorb_logging_flags(mut self) -> Self {
        for option in &self.options {
            match option.to_str() {
                Some("-q") | Some("--quiet") => self.quiet = true,
                Some("--verbose") => self.verbose = self.verbose.saturating_add(1),
                Some(flag)
                    if flag.len() > 1
                        && flag.starts_with('-')
                        && flag[1..].chars().all(|c| c == 'v') =>
                {
                    let count = u8::try_from(flag.len() - 1).unwrap_or(u8::MAX);
                    self.verbose = self.verbose.saturating_add(count);
                }
                _ => {}
            }
        }
        self
    }

    /// Installer options as text; invalid UTF-8 is replaced, never rejected.
    pub fn installer_args(&self) -> Vec<String> {
        self.options
            .iter()
            .map(|option| option.to_string_lossy().into_owned())
            .collect()
    }
}
