//! Line-oriented command layer used by the `multiway-shell` binary.
//!
//! Parsing and execution live here so they can be tested without a terminal;
//! the binary only reads lines and prints replies.

use std::str::FromStr;

use log::debug;
use strum::EnumString;

use crate::config::TreeConfig;
use crate::error::{TreeError, TreeResult};
use crate::tree::{AnyPolicy, BalancePolicy, MultiwayTree};
use crate::utils::util::pretty_format_tree;

pub const HELP: &str = "\
commands:
  insert <key>...    add keys (also: i, add)
  delete <key>...    remove keys (also: d, del, remove)
  print              level-order dump (also: dump, p)
  table              level-order dump as tables (also: t)
  contains <key>     look a key up (also: find, f)
  stats              key count, node count and height
  check              verify the tree's structural invariants
  clear              remove every key
  help               show this text (also: h, ?)
  exit               leave the shell (also: quit, q, \\q)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum Verb {
    #[strum(serialize = "insert", serialize = "i", serialize = "add")]
    Insert,
    #[strum(serialize = "delete", serialize = "d", serialize = "del", serialize = "remove")]
    Delete,
    #[strum(serialize = "print", serialize = "dump", serialize = "p")]
    Print,
    #[strum(serialize = "table", serialize = "t")]
    Table,
    #[strum(serialize = "contains", serialize = "find", serialize = "f")]
    Contains,
    #[strum(serialize = "stats")]
    Stats,
    #[strum(serialize = "check")]
    Check,
    #[strum(serialize = "clear")]
    Clear,
    #[strum(serialize = "help", serialize = "h", serialize = "?")]
    Help,
    #[strum(serialize = "exit", serialize = "quit", serialize = "q", serialize = "\\q")]
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insert(Vec<i64>),
    Delete(Vec<i64>),
    Print,
    Table,
    Contains(i64),
    Stats,
    Check,
    Clear,
    Help,
    Exit,
}

fn parse_keys(args: &[&str]) -> TreeResult<Vec<i64>> {
    args.iter()
        .flat_map(|arg| arg.split(','))
        .filter(|word| !word.is_empty())
        .map(|word| {
            word.parse::<i64>()
                .map_err(|e| TreeError::Command(format!("invalid key '{}': {}", word, e)))
        })
        .collect()
}

fn expect_no_args(verb: &str, args: &[&str]) -> TreeResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(TreeError::Command(format!("{} takes no arguments", verb)))
    }
}

impl FromStr for Command {
    type Err = TreeError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((first, args)) = words.split_first() else {
            return Err(TreeError::Command("empty command".to_string()));
        };
        let verb = Verb::from_str(first).map_err(|_| {
            TreeError::Command(format!("unknown command '{}', try 'help'", first))
        })?;

        match verb {
            Verb::Insert | Verb::Delete => {
                let keys = parse_keys(args)?;
                if keys.is_empty() {
                    return Err(TreeError::Command(format!(
                        "{} expects at least one key",
                        first
                    )));
                }
                if verb == Verb::Insert {
                    Ok(Command::Insert(keys))
                } else {
                    Ok(Command::Delete(keys))
                }
            }
            Verb::Contains => match parse_keys(args)?.as_slice() {
                [key] => Ok(Command::Contains(*key)),
                _ => Err(TreeError::Command(format!("{} expects one key", first))),
            },
            Verb::Print => expect_no_args(first, args).map(|_| Command::Print),
            Verb::Table => expect_no_args(first, args).map(|_| Command::Table),
            Verb::Stats => expect_no_args(first, args).map(|_| Command::Stats),
            Verb::Check => expect_no_args(first, args).map(|_| Command::Check),
            Verb::Clear => expect_no_args(first, args).map(|_| Command::Clear),
            Verb::Help => Ok(Command::Help),
            Verb::Exit => Ok(Command::Exit),
        }
    }
}

/// One tree held across commands.
pub struct Session {
    tree: MultiwayTree<i64, AnyPolicy>,
}

impl Session {
    pub fn new(config: &TreeConfig) -> TreeResult<Self> {
        Ok(Session {
            tree: MultiwayTree::from_config(config)?,
        })
    }

    pub fn tree(&self) -> &MultiwayTree<i64, AnyPolicy> {
        &self.tree
    }

    /// Parses and executes one input line. Blank lines produce no output.
    pub fn run_line(&mut self, line: &str) -> TreeResult<Option<String>> {
        if line.trim().is_empty() {
            return Ok(None);
        }
        let command = Command::from_str(line)?;
        self.execute(&command).map(Some)
    }

    pub fn execute(&mut self, command: &Command) -> TreeResult<String> {
        debug!("executing {:?}", command);
        let reply = match command {
            Command::Insert(keys) => keys
                .iter()
                .map(|key| {
                    if self.tree.insert(*key) {
                        format!("key {} inserted.", key)
                    } else {
                        format!("key {} already present.", key)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Delete(keys) => keys
                .iter()
                .map(|key| {
                    if self.tree.delete(key) {
                        format!("key {} deleted.", key)
                    } else {
                        format!("key {} not found.", key)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
            Command::Print => {
                if self.tree.is_empty() {
                    self.tree.to_string()
                } else {
                    format!("{}:\n{}", self.tree.policy().describe(), self.tree)
                }
            }
            Command::Table => pretty_format_tree(&self.tree),
            Command::Contains(key) => {
                if self.tree.contains(key) {
                    format!("key {} found.", key)
                } else {
                    format!("key {} not found.", key)
                }
            }
            Command::Stats => format!(
                "{}: {} keys, {} nodes, height {}",
                self.tree.policy().describe(),
                self.tree.len(),
                self.tree.node_count(),
                self.tree.height()
            ),
            Command::Check => {
                self.tree.check_invariants()?;
                "ok".to_string()
            }
            Command::Clear => {
                self.tree.clear();
                "tree cleared.".to_string()
            }
            Command::Help => HELP.to_string(),
            Command::Exit => "bye!".to_string(),
        };
        Ok(reply)
    }
}
