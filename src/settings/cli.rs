use super::Parser;

#[derive(Parser, Debug)]
#[command(name = "moneyfit")]
pub struct Cli {
    /// Path to a settings TOML file; defaults to the build profile's file.
    #[arg(long)]
    pub settings: Option<String>,
}
