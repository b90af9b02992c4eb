use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::NoteRepository;

use super::connect_postgres;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let repo = connect_postgres().await?;
    let result = repo.migrate().await;
    repo.close().await;
    result?;

    output_success(output_format, "Schema is up to date", None)
}
