use anyhow::Context;
use devprofile_lib::{Client, ProfileFields};
use dialoguer::Confirm;
use serde::Serialize;
use std::path::{Path, PathBuf};
use structopt::StructOpt;

/// Inspect and edit a local profile database. The server must be stopped,
/// sled allows one process per database.
#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(parse(from_os_str))]
    db_path: PathBuf,
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Print the stored profile
    Show,
    /// Create the profile from a JSON file
    Import {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
    /// Overwrite the fields present in a JSON file
    Update {
        #[structopt(parse(from_os_str))]
        file: PathBuf,
    },
    /// Remove the profile
    Delete {
        #[structopt(long)]
        yes: bool,
    },
    /// Projects using a skill
    Projects { skill: String },
    /// Tech stack entries ranked by use
    TopSkills,
    /// Search name, skills and projects
    Search { query: String },
}

fn read_fields(file: &Path) -> anyhow::Result<ProfileFields> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a valid profile", file.display()))
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    let client = Client::new(&opt.db_path)
        .with_context(|| format!("Failed to open {}", opt.db_path.display()))?;

    match opt.cmd {
        Command::Show => print(&client.read()?)?,
        Command::Import { file } => print(&client.create(read_fields(&file)?)?)?,
        Command::Update { file } => print(&client.update(read_fields(&file)?)?)?,
        Command::Delete { yes } => {
            let profile = client.read()?;
            let confirmed = yes
                || Confirm::new()
                    .with_prompt(format!("Delete the profile of {}?", profile.name))
                    .default(false)
                    .interact()?;
            if confirmed {
                print(&client.delete()?)?;
            } else {
                println!("Nothing deleted");
            }
        }
        Command::Projects { skill } => print(&client.projects_by_skill(&skill)?)?,
        Command::TopSkills => print(&client.top_skills()?)?,
        Command::Search { query } => print(&client.search(&query)?)?,
    }

    Ok(())
}
