use std::path::Path;

use rac_core::db::SqliteKeyValueStore;
use rac_core::export::ExportKind;
use rac_core::{Category, TaxonomyStore};

use crate::cli::TaxonomyCommands;
use crate::commands::common::{open_database, write_output};
use crate::error::CliError;

pub fn run_taxonomy(command: &TaxonomyCommands, db_path: &Path) -> Result<(), CliError> {
    let db = open_database(db_path)?;
    let mut taxonomy = TaxonomyStore::load(SqliteKeyValueStore::new(db.connection()));

    match command {
        TaxonomyCommands::List { category, json } => {
            if *json {
                match category {
                    Some(category) => println!(
                        "{}",
                        serde_json::to_string_pretty(taxonomy.values(*category))?
                    ),
                    None => println!("{}", taxonomy.export()?),
                }
            } else {
                let categories = category.map_or_else(|| Category::ALL.to_vec(), |c| vec![c]);
                for line in format_taxonomy_lines(&taxonomy, &categories) {
                    println!("{line}");
                }
            }
        }
        TaxonomyCommands::Add { category, value } => {
            if taxonomy.add(*category, value)? {
                println!("Added '{}' to {category}", value.trim());
            } else {
                println!("{category} unchanged");
            }
        }
        TaxonomyCommands::Remove { category, value } => {
            if taxonomy.remove(*category, value)? {
                println!("Removed '{value}' from {category}");
            } else {
                println!("{category} unchanged");
            }
        }
        TaxonomyCommands::Export { output } => {
            write_output(&taxonomy.export()?, output.as_deref(), ExportKind::Taxonomy)?;
        }
        TaxonomyCommands::Import { path } => {
            let raw = std::fs::read_to_string(path)?;
            taxonomy.import_from(&raw)?;
            println!("Imported option lists from {}", path.display());
        }
    }

    Ok(())
}

pub fn format_taxonomy_lines<S: rac_core::db::KeyValueStore>(
    taxonomy: &TaxonomyStore<S>,
    categories: &[Category],
) -> Vec<String> {
    let mut lines = Vec::new();
    for category in categories {
        lines.push(format!("{category}:"));
        lines.extend(
            taxonomy
                .values(*category)
                .iter()
                .map(|value| format!("  {value}")),
        );
    }
    lines
}
