use colored::Colorize;
use commands::command_argument_builder;
use sitemapper::handlers::{RunConfig, handle_generate};

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    // Both arguments carry defaults, so the lookups cannot fail.
    let config = RunConfig {
        file_path: matches.get_one::<String>("file-path").unwrap().clone(),
        max_depth: *matches.get_one::<usize>("max-depth").unwrap(),
    };

    if let Err(err) = handle_generate(config).await {
        eprintln!("{} {:#}", "✗".red().bold(), err);
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
