use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("menumap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("menumap")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("scan")
                .about(
                    "Scan a page's dynamically rendered navigation menu into a structural \
                record.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(true)
                        .help("The page whose menu to scan")
                        .value_parser(clap::value_parser!(Url)),
                )
                .arg(
                    arg!(-w --"webdriver" <URL>)
                        .required(false)
                        .help("WebDriver endpoint to drive the browser through")
                        .default_value("http://localhost:4444"),
                )
                .arg(
                    arg!(--"section-template" <TEMPLATE>)
                        .required(false)
                        .help(
                            "Indexed naming template for section trigger elements \
                        ({index} is replaced with the section position)",
                        )
                        .default_value(menumap_scanner::DEFAULT_SECTION_TEMPLATE),
                )
                .arg(
                    arg!(--"item-pattern" <CSS>)
                        .required(false)
                        .help("CSS pattern matching command item elements")
                        .default_value(menumap_scanner::DEFAULT_ITEM_PATTERN),
                )
                .arg(
                    arg!(--"settle-ms" <MS>)
                        .required(false)
                        .help("Upper bound on waiting for a menu render to settle")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("2000"),
                )
                .arg(
                    arg!(--"poll-ms" <MS>)
                        .required(false)
                        .help("Interval between visible-count samples while settling")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("100"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the rendered output to a file (default: print to screen)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json, markdown")
                        .value_parser(["text", "json", "markdown"])
                        .default_value("json"),
                ),
        )
        .subcommand(
            command!("report")
                .about("Render a previously saved scan record in another format.")
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .help("Path to a saved scan JSON document")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Output format: text, json, markdown")
                        .value_parser(["text", "json", "markdown"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save the rendered output to a file (default: print to screen)"),
                ),
        )
}
