//! Line-oriented content browser.
//!
//! Reads one request per line from stdin:
//! - Lines starting with `#` are commands (domain, get, level, region, quit)
//! - Any other line is a search in the current domain, or across the whole
//!   catalog when no domain is selected

use crate::commands::{self, Context};
use anyhow::Result;
use medref_core::content::education::ComplexityLevel;
use medref_core::Domain;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
  #domain <name>   - Search only one domain (oncology, labs, lab-panels, education, regions)
  #all             - Search across every domain
  #get <id>        - Show an entry from the current domain
  #level <1-5>     - Set the complexity level for #topic
  #topic <id>      - Show an educational topic at the current level
  #region <id>     - Show an anatomical region
  #rank <query>    - Ranked search in the current domain
  #count           - Entries per domain
  #quit            - Exit the browser
  #help            - Show this help";

/// What the browser is currently pointed at.
#[derive(Debug, Clone, Copy)]
struct BrowseState {
    domain: Option<Domain>,
    level: ComplexityLevel,
}

impl BrowseState {
    fn prompt(&self) -> String {
        match self.domain {
            Some(domain) => format!("{}> ", domain),
            None => "all> ".to_string(),
        }
    }
}

/// Run the browser until end of input or `#quit`.
pub fn run_browse(ctx: Context) -> Result<()> {
    let mut state = BrowseState {
        domain: None,
        level: ctx.config.default_level,
    };

    println!("=== medref browser ===");
    println!("Level: {}", state.level);
    println!();
    println!("Commands:");
    println!("{}", HELP);
    println!();
    println!("Enter a search term or a command (one per line):");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    print!("{}", state.prompt());
    stdout.flush().ok();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Error reading input: {e}");
                break;
            }
        };

        let line = line.trim();
        if line.is_empty() {
            print!("{}", state.prompt());
            stdout.flush().ok();
            continue;
        }

        if let Some(command) = line.strip_prefix('#') {
            match handle_command(&ctx, &mut state, command) {
                Ok(Flow::Quit) => {
                    println!("Goodbye!");
                    break;
                }
                Ok(Flow::Continue) => {}
                Err(e) => println!("[ERROR] {e}"),
            }
        } else {
            let result = match state.domain {
                Some(domain) => commands::search(&ctx, domain, line, None),
                None => commands::find(&ctx, line),
            };
            if let Err(e) = result {
                println!("[ERROR] {e}");
            }
        }

        print!("{}", state.prompt());
        stdout.flush().ok();
    }

    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

fn handle_command(ctx: &Context, state: &mut BrowseState, command: &str) -> Result<Flow> {
    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match (name, arg) {
        ("quit" | "exit", _) => return Ok(Flow::Quit),
        ("help", _) => {
            println!("[HELP]");
            println!("{}", HELP);
            println!("  (anything else is a search)");
        }
        ("all", _) => state.domain = None,
        ("domain", "") => println!("[ERROR] Usage: #domain <name>"),
        ("domain", name) => {
            let domain: Domain = name.parse()?;
            state.domain = Some(domain);
        }
        ("level", "") => println!("[LEVEL] {}", state.level),
        ("level", number) => {
            let number: u8 = number.parse()?;
            state.level = ComplexityLevel::try_from(number)?;
            println!("[LEVEL] {}", state.level);
        }
        ("get", "") | ("topic", "") | ("region", "") => {
            println!("[ERROR] Usage: #{} <id>", name);
        }
        ("get", id) => match state.domain {
            Some(domain) => commands::get(ctx, domain, id)?,
            None => match medref_core::Catalog::global().find(id) {
                Some(entry) => commands::get(ctx, entry.domain(), id)?,
                None => commands::get(ctx, Domain::Education, id)?,
            },
        },
        ("topic", id) => commands::level(ctx, id, Some(state.level.number()))?,
        ("region", id) => commands::region(ctx, id)?,
        ("rank", "") => println!("[ERROR] Usage: #rank <query>"),
        ("rank", query) => match state.domain {
            Some(domain) => commands::rank(ctx, domain, query)?,
            None => println!("[ERROR] Select a domain first with #domain <name>"),
        },
        ("count", _) => commands::count(ctx, state.domain)?,
        _ => println!("[ERROR] Unknown command. Type #help for help."),
    }

    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medref_core::LibraryConfig;

    fn context() -> Context {
        Context {
            config: LibraryConfig::new(),
            json: false,
        }
    }

    fn state() -> BrowseState {
        BrowseState {
            domain: None,
            level: ComplexityLevel::Patient,
        }
    }

    #[test]
    fn test_domain_command_switches_domain() {
        let mut state = state();
        assert!(handle_command(&context(), &mut state, "domain labs").is_ok());
        assert_eq!(state.domain, Some(Domain::LabTests));
        assert_eq!(state.prompt(), "labs> ");

        assert!(handle_command(&context(), &mut state, "all").is_ok());
        assert_eq!(state.domain, None);
    }

    #[test]
    fn test_unknown_domain_is_an_error() {
        let mut state = state();
        assert!(handle_command(&context(), &mut state, "domain spells").is_err());
        assert_eq!(state.domain, None);
    }

    #[test]
    fn test_level_command_validates_range() {
        let mut state = state();
        assert!(handle_command(&context(), &mut state, "level 4").is_ok());
        assert_eq!(state.level, ComplexityLevel::MedicalStudent);
        assert!(handle_command(&context(), &mut state, "level 9").is_err());
        assert_eq!(state.level, ComplexityLevel::MedicalStudent);
    }

    #[test]
    fn test_quit() {
        let mut state = state();
        assert!(matches!(
            handle_command(&context(), &mut state, "quit"),
            Ok(Flow::Quit)
        ));
    }
}
