//! Animal command handlers
//!
//! Every handler checks the operator's role before touching the repository.

use anyhow::{anyhow, bail, Context, Result};

use herdbook_core::{
    Animal, AnimalDraft, AnimalId, AnimalPatch, AnimalRepository, Operation, Operator,
    RecordStorage,
};

use crate::output::Output;
use crate::prompt::{confirm, is_interactive, prompt_number, prompt_with_default};

/// List all animals
pub fn list<S: RecordStorage>(
    repo: &AnimalRepository<S>,
    operator: &Operator,
    output: &Output,
) -> Result<()> {
    operator.authorize(Operation::List)?;
    output.print_animals(&repo.list());
    Ok(())
}

/// Show a single animal
pub fn show<S: RecordStorage>(
    repo: &AnimalRepository<S>,
    operator: &Operator,
    id: AnimalId,
    output: &Output,
) -> Result<()> {
    operator.authorize(Operation::Show)?;
    let animal = find(repo, id)?;
    output.print_animal(&animal);
    Ok(())
}

/// Create a new animal
pub fn create<S: RecordStorage>(
    repo: &mut AnimalRepository<S>,
    operator: &Operator,
    draft: AnimalDraft,
    output: &Output,
) -> Result<Animal> {
    operator.authorize(Operation::Create)?;

    let animal = repo.create(draft).context("Failed to create animal")?;

    output.success(&format!("Created animal: {}", animal.id));
    output.print_animal(&animal);
    Ok(animal)
}

/// Edit an animal
///
/// With an empty patch and a terminal attached, prompts for each field,
/// keeping the current value when the answer is blank.
pub fn edit<S: RecordStorage>(
    repo: &mut AnimalRepository<S>,
    operator: &Operator,
    id: AnimalId,
    patch: AnimalPatch,
    output: &Output,
) -> Result<()> {
    operator.authorize(Operation::Update)?;
    let current = find(repo, id)?;

    let patch = if patch.is_empty() {
        if !is_interactive() {
            bail!("Nothing to change. Pass --name, --age or --species.");
        }
        prompt_patch(&current)?
    } else {
        patch
    };

    if !repo
        .update_with(id, patch)
        .context("Failed to update animal")?
    {
        bail!("Animal not found: {}", id);
    }

    output.success("Animal updated");
    if let Some(animal) = repo.get(id) {
        output.print_animal(&animal);
    }
    Ok(())
}

/// Delete an animal
pub fn delete<S: RecordStorage>(
    repo: &mut AnimalRepository<S>,
    operator: &Operator,
    id: AnimalId,
    skip_confirm: bool,
    output: &Output,
) -> Result<()> {
    operator.authorize(Operation::Delete)?;
    let animal = find(repo, id)?;

    if output.should_prompt() && !skip_confirm {
        println!("Delete animal: {} - {} ({})", animal.id, animal.name, animal.species);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if !repo.remove(id).context("Failed to delete animal")? {
        bail!("Animal not found: {}", id);
    }

    output.success(&format!("Deleted animal: {}", id));
    Ok(())
}

fn find<S: RecordStorage>(repo: &AnimalRepository<S>, id: AnimalId) -> Result<Animal> {
    repo.get(id)
        .ok_or_else(|| anyhow!("Animal not found: {}", id))
}

/// Ask for each field in turn, blank keeps the current value
pub fn prompt_patch(current: &Animal) -> Result<AnimalPatch> {
    println!("Editing animal: {}", current.id);
    println!("Press Enter to keep current value, or type new value.\n");

    let name = prompt_with_default("Name", &current.name)?;
    let age = prompt_number("Age", Some(current.age))?;
    let species = prompt_with_default("Species", &current.species)?;

    Ok(AnimalPatch {
        name,
        age: (age != current.age).then_some(age),
        species,
    })
}
