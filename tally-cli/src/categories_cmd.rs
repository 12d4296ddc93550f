use anyhow::Result;
use clap::Subcommand;
use tally_finance::Workbench;

use crate::render;

#[derive(Subcommand, Debug)]
pub enum CategoriesCommand {
    /// List categories and the descriptions each one matches
    List,

    /// Create a category (no-op if it exists)
    Add {
        name: String,
    },

    /// Teach a category a transaction description
    Learn {
        category: String,
        keyword: String,
    },
}

pub fn run(wb: &mut Workbench, cmd: CategoriesCommand) -> Result<()> {
    match cmd {
        CategoriesCommand::List => {
            print!("{}", render::categories(wb.store().categories()));
        }
        CategoriesCommand::Add { name } => {
            if wb.create_category(&name)? {
                println!("Added category '{}'", name.trim());
            } else {
                println!("Nothing to add");
            }
        }
        CategoriesCommand::Learn { category, keyword } => {
            if !wb.store().categories().contains(&category) {
                anyhow::bail!("unknown category '{category}' (add it with `tally categories add`)");
            }
            if wb.apply_correction(&category, &keyword)? {
                println!("{category} now matches '{}'", keyword.trim());
            } else {
                println!("Nothing to learn");
            }
        }
    }
    println!("Store: {}", wb.store().path().display());
    Ok(())
}
