use anyhow::{Context, Result};
use art_store::{Driver, Repository};

use super::Selection;

/// Print one record as pretty JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoOperation {
    pub group_id: String,
    pub name: String,
    pub selection: Selection,
}

impl InfoOperation {
    pub fn run<D: Driver>(&self, repo: &mut Repository<D>) -> Result<()> {
        println!("{}", self.render(repo)?);
        Ok(())
    }

    /// The selected record in its stored JSON form.
    pub fn render<D: Driver>(&self, repo: &mut Repository<D>) -> Result<String> {
        let record = self.selection.resolve(repo, &self.name)?;
        serde_json::to_string_pretty(&record)
            .with_context(|| format!("cannot encode {}", record.basic_info()))
    }
}
