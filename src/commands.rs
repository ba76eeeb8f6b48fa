//! Line commands understood by the interactive shell.

use crate::adapters::ToolId;
use crate::catalog::CatalogEntry;
use crate::session::Action;

pub const HELP: &str = "\
Commands:
  list [category]               show categories, or the fragments of one
  select <category> <n>         add fragment n (1-based) of a category
  pick <text>                   add free text as a fragment
  drop <text>                   remove a fragment
  edit                          rewrite the prompt, one fragment per line, end with '.'
                                (a fragment cannot be a lone '.', line ends are
                                read as '\\n', and a single empty line means an
                                empty prompt)
  clear                         empty the prompt
  tool [name]                   show or set the target tool
  tools                         list supported tools
  optimize                      improve the prompt and derive a negative prompt
  show                          print the prompt formatted for the current tool
  history [n]                   last n optimizations (default 5)
  add <category>[/<subcategory>] | <text> [| <translation>]
                                append a fragment to the catalog file
  reload                        reload the catalog file
  help                          this text
  quit                          leave";

const DEFAULT_HISTORY: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Mutates the session through the controller.
    Act(Action),
    /// `edit` needs the following lines before it becomes an action.
    BeginEdit,
    List(Option<String>),
    Tool,
    Tools,
    Show,
    History(usize),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List(non_empty(rest)),
            "select" | "sel" => parse_select(rest)?,
            "pick" => Command::Act(Action::Select(required(rest, "pick <text>")?)),
            "drop" => Command::Act(Action::Deselect(required(rest, "drop <text>")?)),
            "edit" => Command::BeginEdit,
            "clear" => Command::Act(Action::Clear),
            "tool" if rest.is_empty() => Command::Tool,
            "tool" => Command::Act(Action::SetTool(ToolId::parse(rest))),
            "tools" => Command::Tools,
            "optimize" | "opt" => Command::Act(Action::Optimize),
            "show" => Command::Show,
            "history" => Command::History(if rest.is_empty() {
                DEFAULT_HISTORY
            } else {
                rest.parse()
                    .map_err(|_| format!("'{}' is not a number", rest))?
            }),
            "add" => parse_add(rest)?,
            "reload" => Command::Act(Action::ReloadCatalog),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            "" => return Err("type 'help' for the list of commands".to_string()),
            other => return Err(format!("unknown command '{}', type 'help'", other)),
        };
        Ok(command)
    }
}

/// `select <category> <n>`; the category may contain spaces.
fn parse_select(rest: &str) -> Result<Command, String> {
    let usage = "usage: select <category> <n>";
    let (category, number) = rest.rsplit_once(char::is_whitespace).ok_or(usage)?;
    let number: usize = number.parse().map_err(|_| usage.to_string())?;
    if number == 0 || category.trim().is_empty() {
        return Err(usage.to_string());
    }
    Ok(Command::Act(Action::SelectFromCatalog {
        category: category.trim().to_string(),
        position: number - 1,
    }))
}

/// `add <category>[/<subcategory>] | <text> [| <translation>]`
fn parse_add(rest: &str) -> Result<Command, String> {
    let mut parts = rest.split('|').map(str::trim);
    let heading = parts.next().unwrap_or_default();
    let text = parts.next().unwrap_or_default();
    let translation = parts.next().and_then(non_empty);
    let (category, subcategory) = match heading.split_once('/') {
        Some((category, subcategory)) => (category.trim(), non_empty(subcategory)),
        None => (heading, None),
    };
    if category.is_empty() || text.is_empty() {
        return Err("usage: add <category>[/<subcategory>] | <text> [| <translation>]".to_string());
    }
    Ok(Command::Act(Action::AddFragment(CatalogEntry {
        category: category.to_string(),
        subcategory,
        text: text.to_string(),
        translation,
    })))
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    non_empty(rest).ok_or_else(|| format!("usage: {}", usage))
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_takes_last_word_as_number() {
        assert_eq!(
            Command::parse("select Camera Angle 2").unwrap(),
            Command::Act(Action::SelectFromCatalog {
                category: "Camera Angle".into(),
                position: 1,
            })
        );
        assert!(Command::parse("select Lighting").is_err());
        assert!(Command::parse("select Lighting 0").is_err());
    }

    #[test]
    fn tool_without_name_shows_current() {
        assert_eq!(Command::parse("tool").unwrap(), Command::Tool);
        assert_eq!(
            Command::parse("tool stable diffusion").unwrap(),
            Command::Act(Action::SetTool(ToolId::StableDiffusion))
        );
    }

    #[test]
    fn add_splits_on_pipes() {
        assert_eq!(
            Command::parse("add Mood | eerie, quiet | sinistro").unwrap(),
            Command::Act(Action::AddFragment(
                CatalogEntry::new("Mood", "eerie, quiet").with_translation("sinistro")
            ))
        );
        assert!(Command::parse("add Mood").is_err());
    }

    #[test]
    fn add_reads_subcategory_after_slash() {
        assert_eq!(
            Command::parse("add Lighting / Studio | softbox").unwrap(),
            Command::Act(Action::AddFragment(
                CatalogEntry::new("Lighting", "softbox").with_subcategory("Studio")
            ))
        );
        assert!(Command::parse("add /Studio | softbox").is_err());
    }

    #[test]
    fn history_defaults_and_validates() {
        assert_eq!(Command::parse("history").unwrap(), Command::History(5));
        assert_eq!(Command::parse("history 2").unwrap(), Command::History(2));
        assert!(Command::parse("history lots").is_err());
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(Command::parse("  OPTIMIZE ").unwrap(), Command::Act(Action::Optimize));
        assert_eq!(Command::parse("Quit").unwrap(), Command::Quit);
        assert!(Command::parse("dance").is_err());
        assert!(Command::parse("").is_err());
    }

    #[test]
    fn help_explains_edit_terminator() {
        assert!(HELP.contains("cannot be a lone '.'"));
        assert!(HELP.contains("single empty line"));
    }

    #[test]
    fn pick_keeps_inner_spacing() {
        assert_eq!(
            Command::parse("pick a  cat").unwrap(),
            Command::Act(Action::Select("a  cat".into()))
        );
    }
}
