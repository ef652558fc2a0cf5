use crate::CLAP_STYLING;
use clap::{arg, command};
use std::path::PathBuf;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkrank")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("linkrank")
        .about("Finds rank leaks and rank sinks in a link graph, or computes its PageRank")
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .arg(
            arg!(<NETWORK_FILE>)
                .help("Edge list with one `<src_url> <dst_url>` pair per line")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(-l --"log-level" <LEVEL>)
                .required(false)
                .global(true)
                .help("Verbosity: 0 silent, 1 info, 2 debug (default), 3 trace")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            arg!(-g --"growth-rate" <GROWTH_RATE>)
                .required(false)
                .global(true)
                .help("Adjacency storage growth increment (default: 20000)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(-f --"format" <FORMAT>)
                .required(false)
                .global(true)
                .help("Report format: text, json")
                .value_parser(["text", "json"])
                .default_value("text"),
        )
        .arg(
            arg!(-o --"output" <PATH>)
                .required(false)
                .global(true)
                .help("Save report to file (default: display to screen)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            arg!(--"progress")
                .required(false)
                .global(true)
                .help("Show a spinner while the network is being read")
                .action(clap::ArgAction::SetTrue),
        )
        .subcommand(command!("check").about(
            "Lists rank leaks (nodes without outbound links) and rank sinks (groups of \
                nodes that cannot reach the rest of the network)",
        ))
        .subcommand(
            command!("run")
                .about("Computes PageRank by power iteration")
                .arg(
                    arg!(<DECAY>)
                        .help("Decay factor, strictly between 0 and 1 (e.g. 0.85)")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(<ITERATIONS>)
                        .help("Maximum number of power iterations")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    arg!(-e --"epsilon" <EPSILON>)
                        .required(false)
                        .help("Stop once every rank changes by less than this (default: never check)")
                        .value_parser(clap::value_parser!(f64)),
                ),
        )
}
