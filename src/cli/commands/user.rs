use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_rows, output_success};
use crate::cli::OutputFormat;
use crate::database::NoteRepository;

use super::connect_postgres;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "Register a user that can own notes")]
    Add {
        #[arg(help = "Display name")]
        username: String,
    },

    #[command(about = "List registered users")]
    List,
}

pub async fn handle(cmd: UserCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    if let UserCommands::Add { username } = &cmd {
        if username.trim().is_empty() {
            anyhow::bail!("username must not be empty");
        }
    }

    let repo = connect_postgres().await?;

    let result: anyhow::Result<()> = async {
        match cmd {
            UserCommands::Add { username } => {
                let user = repo.add_user(username.trim()).await?;
                output_success(
                    output_format,
                    &format!("Created user '{}' with ID {}", user.username, user.id),
                    Some(json!(user)),
                )
            }
            UserCommands::List => {
                let users = repo.list_users().await?;
                let rows = users
                    .iter()
                    .map(|user| (user.id.to_string(), user.username.clone()))
                    .collect();
                output_rows(output_format, rows, json!(users))
            }
        }
    }
    .await;

    repo.close().await;
    result
}
