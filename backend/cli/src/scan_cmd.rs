//! `scan`, `read`, and `favorite`: everything that starts from an image.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use readaloud_reader::ReaderPage;
use readaloud_understanding::TextItem;

use crate::app::App;
use crate::say_cmd::{report, settle, spoke};
use crate::terminal_output::{render_table, Column};

/// What to do with the recognized lines.
#[derive(Debug, Clone, Copy)]
pub enum Then {
    Print,
    PlayAll,
    FavoriteAll,
}

/// Returns whether the image had text and the follow-up step succeeded.
pub async fn run(app: &App, image: &Path, then: Then) -> Result<bool> {
    let mut page = app.page()?;
    // Failures and empty results were already shown as notices.
    let Ok(items) = page.recognize_file(image).await else {
        return Ok(false);
    };
    if items.is_empty() {
        return Ok(false);
    }
    print!("{}", items_table(items));

    Ok(match then {
        Then::Print => true,
        Then::PlayAll => play_all(app, &page).await,
        Then::FavoriteAll => page.favorite_all().await?.is_some(),
    })
}

async fn play_all(app: &App, page: &ReaderPage) -> bool {
    let outcome = page.play_all().await;
    report(app, page.audio(), &outcome);
    settle(Arc::clone(page.audio().host())).await;
    spoke(&outcome)
}

fn items_table(items: &[TextItem]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .enumerate()
        .map(|(i, item)| vec![(i + 1).to_string(), item.content.clone()])
        .collect();
    render_table(&[Column::right("#"), Column::left("Text")], &rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal_output::strip_ansi;

    #[test]
    fn items_are_numbered_from_one() {
        let items = vec![
            TextItem { id: "text-0-1".into(), content: "hello".into() },
            TextItem { id: "text-1-1".into(), content: "world".into() },
        ];
        let table = strip_ansi(&items_table(&items));
        assert!(table.contains("1  hello"));
        assert!(table.contains("2  world"));
    }
}
