//! Interactive menu shell
//!
//! A numbered menu of the operations the signed-in role may perform.
//! Errors from one action are reported and the menu is shown again.

use anyhow::{anyhow, Result};

use herdbook_core::{AnimalDraft, AnimalId, AnimalRepository, Operation, Operator, RecordStorage};

use crate::commands::animal;
use crate::output::Output;
use crate::prompt::{prompt_number, prompt_required, read_line};

/// What the user picked from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    Run(Operation),
    Quit,
    Invalid,
}

/// Run the menu loop until the user quits or input ends
pub fn run<S: RecordStorage>(
    repo: &mut AnimalRepository<S>,
    operator: &Operator,
    output: &Output,
) -> Result<()> {
    let operations = operator.role.operations();

    println!();
    println!("Welcome to Herdbook, {} ({}).", operator.username, operator.role);
    for warning in repo.load_warnings() {
        output.warn(&format!("Skipped corrupt record at {}", warning));
    }

    loop {
        println!();
        print_menu(&operations);

        let Some(input) = read_line("> ")? else {
            break;
        };

        match parse_choice(&input, &operations) {
            Choice::Quit => break,
            Choice::Invalid => println!("Invalid choice: '{}'", input.trim()),
            Choice::Run(operation) => {
                println!();
                if let Err(e) = dispatch(repo, operator, operation, output) {
                    eprintln!("Error: {:#}", e);
                    output.recovery_hint(&e);
                }
            }
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn print_menu(operations: &[Operation]) {
    for (index, operation) in operations.iter().enumerate() {
        println!("  [{}] {}", index + 1, menu_label(*operation));
    }
    println!("  [q] Quit");
}

fn menu_label(operation: Operation) -> &'static str {
    match operation {
        Operation::List => "List animals",
        Operation::Show => "Show an animal",
        Operation::Create => "Add an animal",
        Operation::Update => "Edit an animal",
        Operation::Delete => "Delete an animal",
    }
}

fn parse_choice(input: &str, operations: &[Operation]) -> Choice {
    let input = input.trim();
    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return Choice::Quit;
    }

    input
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|index| operations.get(index))
        .map_or(Choice::Invalid, |op| Choice::Run(*op))
}

fn dispatch<S: RecordStorage>(
    repo: &mut AnimalRepository<S>,
    operator: &Operator,
    operation: Operation,
    output: &Output,
) -> Result<()> {
    match operation {
        Operation::List => animal::list(repo, operator, output),
        Operation::Show => {
            let id = prompt_id()?;
            animal::show(repo, operator, id, output)
        }
        Operation::Create => {
            operator.authorize(Operation::Create)?;
            let name = prompt_required("Name")?;
            let age = prompt_number::<u32>("Age", None)?;
            let species = prompt_required("Species")?;
            animal::create(repo, operator, AnimalDraft::new(name, age, species), output)
                .map(|_| ())
        }
        Operation::Update => {
            operator.authorize(Operation::Update)?;
            let id = prompt_id()?;
            let current = repo
                .get(id)
                .ok_or_else(|| anyhow!("Animal not found: {}", id))?;
            let patch = animal::prompt_patch(&current)?;
            if patch.is_empty() {
                println!("No changes.");
                return Ok(());
            }
            animal::edit(repo, operator, id, patch, output)
        }
        Operation::Delete => {
            let id = prompt_id()?;
            animal::delete(repo, operator, id, false, output)
        }
    }
}

fn prompt_id() -> Result<AnimalId> {
    let input = prompt_required("Animal ID")?;
    input.parse::<AnimalId>().map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use herdbook_core::Role;

    #[test]
    fn test_parse_choice_for_viewer() {
        let ops = Role::Viewer.operations();

        assert_eq!(parse_choice("1", &ops), Choice::Run(Operation::List));
        assert_eq!(parse_choice(" 2 \n", &ops), Choice::Run(Operation::Show));
        assert_eq!(parse_choice("3", &ops), Choice::Invalid);
        assert_eq!(parse_choice("0", &ops), Choice::Invalid);
        assert_eq!(parse_choice("Q", &ops), Choice::Quit);
        assert_eq!(parse_choice("quit", &ops), Choice::Quit);
        assert_eq!(parse_choice("list", &ops), Choice::Invalid);
    }

    #[test]
    fn test_parse_choice_for_administrator() {
        let ops = Role::Administrator.operations();

        assert_eq!(parse_choice("3", &ops), Choice::Run(Operation::Create));
        assert_eq!(parse_choice("5", &ops), Choice::Run(Operation::Delete));
        assert_eq!(parse_choice("6", &ops), Choice::Invalid);
    }
}
