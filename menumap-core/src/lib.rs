pub mod report;
pub mod scan;

use colored::Colorize;

const BANNER: &str = r#"
 _ __ ___   ___ _ __  _   _ _ __ ___   __ _ _ __
| '_ ` _ \ / _ \ '_ \| | | | '_ ` _ \ / _` | '_ \
| | | | | |  __/ | | | |_| | | | | | | (_| | |_) |
|_| |_| |_|\___|_| |_|\__,_|_| |_| |_|\__,_| .__/
                                           |_|
"#;

pub fn print_banner() {
    println!("{}", BANNER.bright_cyan());
    println!(
        "{}",
        format!(
            "  v{} - navigation menu structure scanner\n",
            env!("CARGO_PKG_VERSION")
        )
        .dimmed()
    );
}
