use anyhow::Result;

use crate::app::App;
use crate::terminal_output::{note_info, render_table, Column};

/// List stored favorite words.
pub async fn run(app: &App) -> Result<()> {
    let words = app.favorites().load().await?;
    if words.is_empty() {
        note_info("No favorite words yet");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = words
        .into_iter()
        .enumerate()
        .map(|(i, word)| vec![(i + 1).to_string(), word])
        .collect();
    print!("{}", render_table(&[Column::right("#"), Column::left("Word")], &rows));
    Ok(())
}
