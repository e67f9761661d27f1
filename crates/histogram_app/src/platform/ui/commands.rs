use histogram_core::Msg;

pub const HELP_TEXT: &str = "\
Commands:
  submit | s      fetch the source and rebuild the histogram
  export | e      write the current histogram as CSV
  url <URL>       change the source URL
  top <K>         keep the K most frequent words on the next submit
  help | h        show this help
  quit | q        exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Help,
    Quit,
}

/// Parses one line of terminal input.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "" => Command::Dispatch(Msg::NoOp),
        "submit" | "s" => Command::Dispatch(Msg::SubmitClicked),
        "export" | "e" => Command::Dispatch(Msg::ExportClicked),
        "url" if !rest.is_empty() => Command::Dispatch(Msg::UrlChanged(rest.to_string())),
        "url" => return Err("usage: url <URL>".to_string()),
        "top" => {
            let top_k = rest
                .parse::<usize>()
                .map_err(|_| format!("usage: top <K>, got {rest:?}"))?;
            Command::Dispatch(Msg::TopKChanged(top_k))
        }
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_and_aliases() {
        assert_eq!(
            parse_command("submit"),
            Ok(Command::Dispatch(Msg::SubmitClicked))
        );
        assert_eq!(parse_command("  S \n"), Ok(Command::Dispatch(Msg::SubmitClicked)));
        assert_eq!(parse_command("e"), Ok(Command::Dispatch(Msg::ExportClicked)));
        assert_eq!(parse_command("q"), Ok(Command::Quit));
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command(""), Ok(Command::Dispatch(Msg::NoOp)));
    }

    #[test]
    fn arguments_are_parsed() {
        assert_eq!(
            parse_command("url   http://localhost/doc.txt "),
            Ok(Command::Dispatch(Msg::UrlChanged(
                "http://localhost/doc.txt".to_string()
            )))
        );
        assert_eq!(parse_command("top 0"), Ok(Command::Dispatch(Msg::TopKChanged(0))));
        assert_eq!(parse_command("top 15"), Ok(Command::Dispatch(Msg::TopKChanged(15))));
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse_command("url").is_err());
        assert!(parse_command("top -1").is_err());
        assert!(parse_command("top").is_err());
        assert_eq!(
            parse_command("frobnicate"),
            Err("unknown command \"frobnicate\"".to_string())
        );
    }
}
