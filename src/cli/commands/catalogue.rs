//! Catalogue inspection commands.

use tokio::runtime::Runtime;

use super::{load_catalogue, player_client};
use crate::catalogue::Catalogue;
use crate::config::Config;
use crate::matcher;

/// Print every track with its catalogue index
pub fn cmd_catalogue(rt: &Runtime, config: &Config) -> anyhow::Result<()> {
    rt.block_on(async {
        let client = player_client(config)?;
        let catalogue = load_catalogue(&client).await?;
        for entry in catalogue.iter() {
            println!("{:>5}  {}", entry.index, entry.display);
        }
        println!("\n{} tracks.", catalogue.len());
        Ok::<(), anyhow::Error>(())
    })
}

/// Show which tracks a query matches and which of them a request would pick from
pub fn cmd_search(rt: &Runtime, config: &Config, query: &str) -> anyhow::Result<()> {
    rt.block_on(async {
        let client = player_client(config)?;
        let catalogue = load_catalogue(&client).await?;
        for line in describe_search(&catalogue, query) {
            println!("{}", line);
        }
        Ok::<(), anyhow::Error>(())
    })
}

/// Lines describing the matches for `query`. Tracks in the pick pool are starred.
fn describe_search(catalogue: &Catalogue, query: &str) -> Vec<String> {
    let tokens = matcher::tokenize(query);
    let Ok(candidates) = matcher::find_candidates(catalogue, &tokens) else {
        return vec!["No search terms.".to_string()];
    };
    if candidates.is_empty() {
        return vec![format!("No match for \"{}\".", tokens.join(" "))];
    }

    let pool = matcher::preferred_pool(catalogue, &candidates);
    let mut lines: Vec<String> = candidates
        .iter()
        .filter_map(|&i| catalogue.get(i))
        .map(|entry| {
            let mark = if pool.contains(&entry.index) { '*' } else { ' ' };
            format!("{} {:>5}  {}", mark, entry.index, entry.display)
        })
        .collect();
    lines.push(format!(
        "\n{} matches, a request picks from the {} starred.",
        candidates.len(),
        pool.len()
    ));
    lines
}
