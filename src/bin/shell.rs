use clap::Parser;
use multiway_tree::config::{TreeConfig, Variant};
use multiway_tree::error::TreeResult;
use multiway_tree::shell::{Command, Session};
use multiway_tree::tree::BalancePolicy;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const HISTORY_FILE: &str = ".multiway_history";

#[derive(Debug, Parser, PartialEq)]
#[clap(author, version, about, long_about= None)]
struct Args {
    #[clap(
        long,
        default_value = "btree",
        help = "Tree variant to build (btree|mway)",
        value_name = "VARIANT"
    )]
    variant: Variant,
    #[clap(
        short = 'p',
        long,
        help = "Minimum degree t for btree, order m for mway (defaults: t = 2, m = 3)"
    )]
    parameter: Option<usize>,
    #[clap(
        short = 'k',
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        help = "Comma separated keys inserted before the prompt opens"
    )]
    keys: Vec<i64>,
}

fn main() -> TreeResult<()> {
    env_logger::init();
    let args = Args::parse();

    let config = TreeConfig {
        variant: args.variant,
        parameter: args
            .parameter
            .unwrap_or_else(|| args.variant.default_parameter()),
    };
    let mut session = match Session::new(&config) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if !args.keys.is_empty() {
        match session.execute(&Command::Insert(args.keys)) {
            Ok(reply) => println!("{}", reply),
            Err(e) => println!("{}", e),
        }
    }

    println!(
        ":) {} ready, type 'help' for commands.",
        session.tree().policy().describe()
    );
    let mut rl = DefaultEditor::new()?;
    rl.load_history(HISTORY_FILE).ok();

    loop {
        let readline = rl.readline("multiway> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                if matches!(line.trim().parse::<Command>(), Ok(Command::Exit)) {
                    println!("bye!");
                    break;
                }
                match session.run_line(&line) {
                    Ok(Some(reply)) => println!("{}", reply),
                    Ok(None) => {}
                    Err(e) => println!("{}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    rl.save_history(HISTORY_FILE).ok();
    Ok(())
}
