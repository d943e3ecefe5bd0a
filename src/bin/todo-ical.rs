//! Convert tasks from the command line
//!
//! * `todo-ical decode [FILE]` prints the task found in an iCal file (or stdin) as JSON
//! * `todo-ical encode FILE [CONFIG]` prints a calendar built from a JSON list of todos, with an optional JSON config

use std::error::Error;
use std::io::Read;

use todo_ical::{Config, Todo};

const USAGE: &str = "usage: todo-ical decode [FILE] | todo-ical encode FILE [CONFIG]";

fn read_input(path: Option<&String>) -> Result<String, Box<dyn Error>> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut content = String::new();
            std::io::stdin().read_to_string(&mut content)?;
            content
        },
    };
    Ok(content)
}

fn run(args: &[String]) -> Result<String, Box<dyn Error>> {
    match args.first().map(String::as_str) {
        Some("decode") => {
            let content = read_input(args.get(1))?;
            let task = todo_ical::ical::parse(&content)?;
            Ok(serde_json::to_string_pretty(&task)?)
        },
        Some("encode") => {
            let path = args.get(1).ok_or(USAGE)?;
            let todos: Vec<Todo> = serde_json::from_str(&read_input(Some(path))?)?;
            let config: Config = match args.get(2) {
                Some(config_path) => serde_json::from_str(&read_input(Some(config_path))?)?,
                None => Config::default(),
            };
            log::debug!("Encoding {} todos into calendar {:?}", todos.len(), config.name);
            Ok(todo_ical::ical::build_calendar(&config, &todos))
        },
        _ => Err(USAGE.into()),
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(err) => {
            log::error!("{}", err);
            eprintln!("{}", err);
            std::process::exit(1);
        },
    }
}
