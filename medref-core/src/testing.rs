//! Small fixture schema for repository and search tests.

use crate::content_category;
use crate::entry::Entry;
use crate::repository::Repository;
use crate::search::weights;
use crate::Searchable;

content_category! {
    pub enum TestKind: "test kind" {
        Alpha => "alpha",
        Beta => "beta",
        Gamma => "gamma",
    }
}

#[derive(Debug, Clone, PartialEq, Searchable)]
pub struct TestEntry {
    #[search(weight = weights::IDENTIFIER)]
    pub id: String,
    #[search(weight = weights::NAME)]
    pub name: String,
    #[search(weight = weights::SIGNIFICANCE)]
    pub kind: TestKind,
    #[search]
    pub body: String,
    #[search(weight = weights::LIST)]
    pub tags: Vec<String>,
}

impl TestEntry {
    pub fn new(id: &str, name: &str, kind: TestKind) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            body: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

impl Entry for TestEntry {
    type Category = TestKind;

    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> TestKind {
        self.kind
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Four entries; only the two beta entries mention "beta" anywhere.
pub fn sample_repository() -> Repository<TestEntry> {
    Repository::from_entries(vec![
        TestEntry::new("alpha-one", "Alpha One", TestKind::Alpha)
            .with_body("First shared body text.")
            .with_tags(&["first"]),
        TestEntry::new("beta-one", "Beta One", TestKind::Beta)
            .with_body("A shared note.")
            .with_tags(&["shared"]),
        TestEntry::new("gamma-one", "Gamma One", TestKind::Gamma)
            .with_body("Nothing in common."),
        TestEntry::new("beta-two", "Beta Two", TestKind::Beta)
            .with_body("Second shared body text.")
            .with_tags(&["shared"]),
    ])
}
