use linkrank::commands::command_argument_builder;
use linkrank::handlers::{handle_check, handle_run, init_tracing, verbosity};

fn main() {
    let cmd = command_argument_builder();
    let chosen_command = match cmd.try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            // usage errors, --help and --version all end here with the same exit code
            let _ = e.print();
            std::process::exit(0);
        }
    };

    match chosen_command.subcommand() {
        Some(("check", mode)) => {
            init_tracing(verbosity(mode));
            handle_check(&chosen_command, mode);
        }
        Some(("run", mode)) => {
            init_tracing(verbosity(mode));
            handle_run(&chosen_command, mode);
        }
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
