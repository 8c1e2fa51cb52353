use core::panic;

use botargs_parser::{FixedFlags, ParseOptions, ParsedCommand};

fn main() {
    let line = r#"!ban spammer --reason="too many links" --days:7 --silent"#;

    let options = ParseOptions::default();
    let cmd: ParsedCommand<'_, FixedFlags<'_, 4>> =
        ParsedCommand::try_parse(line, &options).expect("must be parsed");

    if !cmd.is_command("ban") {
        panic!("invalid command");
    }

    if cmd.first_value() != "spammer" {
        panic!("invalid target");
    }

    let reason = cmd.get_str(&["reason", "r"]).expect("must be present");
    if reason != "too many links" {
        panic!("invalid reason");
    }

    let days: u32 = cmd
        .get_str(&["days"])
        .and_then(|x| x.parse().ok())
        .expect("must be a number");
    if days != 7 {
        panic!("invalid days");
    }

    if cmd.get_bool(&["silent"]) != Some(true) {
        panic!("invalid silent");
    }
}
