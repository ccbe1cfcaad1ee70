use anyhow::Result;
use art_core::Artifact;
use art_store::{Driver, Repository, StoreError};

/// Show the records of one name, or every name in the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOperation {
    pub group_id: String,
    pub name: Option<String>,
}

impl ListOperation {
    pub fn run<D: Driver>(&self, repo: &mut Repository<D>) -> Result<()> {
        for line in self.render(repo)? {
            println!("{line}");
        }
        Ok(())
    }

    /// Output lines: one per record when a name is given, else one per name.
    pub fn render<D: Driver>(&self, repo: &mut Repository<D>) -> Result<Vec<String>> {
        let Some(name) = &self.name else {
            return Ok(repo.names()?);
        };
        let manifest = repo.load(name)?;
        if manifest.is_empty() {
            return Err(StoreError::not_found(format!("{}/{name}", self.group_id)).into());
        }
        Ok(manifest.iter().map(format_record).collect())
    }
}

/// `filename  r<rev>  size  mtime  md5  branch@hash`
fn format_record(record: &Artifact) -> String {
    let basic = record.basic_info();
    let file = record.file_info();
    let provenance = record
        .git_info()
        .map(|g| format!("{}@{}", g.branch(), g.short_hash()))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:<40} r{:<4} {:>12}  {}  {}  {}",
        basic.filename(),
        basic.revision(),
        file.size(),
        file.modified_time(),
        file.md5(),
        provenance
    )
}
