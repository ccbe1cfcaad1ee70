/// Print usage text. Needs no repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpOperation {
    usage: String,
}

impl HelpOperation {
    pub fn new(usage: impl Into<String>) -> Self {
        Self {
            usage: usage.into(),
        }
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    pub fn run(&self) -> u8 {
        println!("{}", self.usage.trim_end());
        0
    }
}
