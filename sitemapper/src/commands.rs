use crate::CLAP_STYLING;
use clap::arg;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemapper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemapper")
        .styles(CLAP_STYLING)
        .about(
            "Builds one XML sitemap per seed host by crawling every same-origin \
            page reachable from the seed.",
        )
        .arg(
            arg!(-f --"file-path" <PATH>)
                .required(false)
                .help("Seed list file, one URL per line, relative to your home directory")
                .default_value("link.txt"),
        )
        .arg(
            arg!(-d --"max-depth" <DEPTH>)
                .required(false)
                .help("The maximum number of link levels to traverse")
                .value_parser(clap::value_parser!(usize))
                .default_value("10"),
        )
}
