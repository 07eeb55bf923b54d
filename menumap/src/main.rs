use colored::Colorize;
use commands::command_argument_builder;
use menumap::handlers;
use menumap_core::print_banner;
use tracing_subscriber;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    tracing_subscriber::fmt::init();

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("scan", primary_command)) => {
            if let Err(e) = handlers::handle_scan(primary_command, quiet).await {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
        Some(("report", primary_command)) => {
            if let Err(e) = handlers::handle_report(primary_command) {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        }
        // No subcommand provided, just show the banner
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
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
