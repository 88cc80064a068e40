#[macro_use]
extern crate log;

use {
    clap::{ColorChoice, Parser},
    flexi_logger::Logger,
};

mod count;
mod group;
mod input;
mod sort;
mod tally;

#[derive(Parser, Debug)]
#[clap(version, author, color(ColorChoice::Auto), infer_subcommands = true)]
#[command(
    name = "ordvec",
    about = "Sorts, counts, tallies and groups words using sorted-vector sets and maps."
)]
pub struct Opts {
    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Parser, Debug)]
pub enum SubCommand {
    /// Print the distinct words of the input in order
    Sort(sort::Opts),
    /// Count how many times a word occurs in the input
    Count(count::Opts),
    /// Print every word of the input together with its number of occurrences
    Tally(tally::Opts),
    /// Group "key value" lines by key
    Group(group::Opts),
}

fn main() {
    let opts = Opts::parse();

    let _logger = Logger::try_with_env()
        .and_then(|logger| logger.start())
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"));

    let result = match opts.subcmd {
        SubCommand::Sort(s) => sort::run(s),
        SubCommand::Count(c) => count::run(c),
        SubCommand::Tally(t) => tally::run(t),
        SubCommand::Group(g) => group::run(g),
    };

    if let Err(e) = result {
        println!("Error: {e}");
        for cause in e.chain().skip(1) {
            println!("\tcaused by: {cause}");
        }
        std::process::exit(1);
    }
}
