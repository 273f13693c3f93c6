//! Command implementations shared by the CLI and the browser.

use crate::render::{render_level, Render};
use anyhow::{anyhow, bail, Context as _, Result};
use medref_core::content::education::{education_repository, ComplexityLevel, EducationalContent};
use medref_core::content::labs::{
    get_lab_test, get_lab_test_by_name, lab_panel_repository, lab_test_repository, LabPanel, LabTest, Sex,
};
use medref_core::content::oncology::{oncology_repository, OncologyCondition};
use medref_core::content::regions::{get_region_content, region_repository, RegionContent, IN_DEVELOPMENT_MESSAGE};
use medref_core::persist::{peek_domain, ContentSnapshot, DomainEntry};
use medref_core::validation::{validate_catalog, validate_repository, Validate};
use medref_core::{Catalog, CatalogHit, Category, Domain, LibraryConfig, Repository, Searchable};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

/// Run `$func(repo, args...)` against the built-in repository for `$domain`.
macro_rules! with_repository {
    ($domain:expr, $func:ident($($arg:expr),* $(,)?)) => {
        match $domain {
            Domain::Oncology => $func(oncology_repository(), $($arg),*),
            Domain::LabTests => $func(lab_test_repository(), $($arg),*),
            Domain::LabPanels => $func(lab_panel_repository(), $($arg),*),
            Domain::Education => $func(education_repository(), $($arg),*),
            Domain::Regions => $func(region_repository(), $($arg),*),
        }
    };
}

/// Settings every command reads.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub config: LibraryConfig,
    /// Print JSON instead of text.
    pub json: bool,
}

impl Context {
    fn emit<T: Serialize + ?Sized>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let text = text();
            if !text.is_empty() {
                println!("{}", text.trim_end());
            }
        }
        Ok(())
    }

    /// Bilingual notice for content that does not exist yet.
    fn in_development(&self, domain: Domain, id: &str) -> Result<()> {
        tracing::debug!(%domain, id, "content not found");
        let value = serde_json::json!({
            "status": "in-development",
            "domain": domain,
            "id": id,
            "message": IN_DEVELOPMENT_MESSAGE,
        });
        self.emit(&value, || IN_DEVELOPMENT_MESSAGE.to_string())
    }
}

fn lines<E: Render>(entries: &[&E]) -> String {
    if entries.is_empty() {
        return "No matches.".to_string();
    }
    entries
        .iter()
        .map(|e| e.summary_line())
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Queries
// =============================================================================

pub fn get(ctx: &Context, domain: Domain, id: &str) -> Result<()> {
    fn show<E: Render + Serialize>(repo: &Repository<E>, ctx: &Context, domain: Domain, id: &str) -> Result<()> {
        match repo.get(id) {
            Some(entry) => ctx.emit(entry, || entry.detail()),
            None => ctx.in_development(domain, id),
        }
    }
    with_repository!(domain, show(ctx, domain, id))
}

pub fn search(ctx: &Context, domain: Domain, query: &str, field: Option<&str>) -> Result<()> {
    fn run<E>(repo: &Repository<E>, ctx: &Context, query: &str, field: Option<&str>) -> Result<()>
    where
        E: Render + Searchable + Serialize,
    {
        let config = ctx.config.query;
        let hits = match field {
            Some(field) => repo.filter_by_field_with(config, field, query),
            None => repo.search_with(config, query),
        };
        ctx.emit(&hits, || lines(&hits))
    }
    with_repository!(domain, run(ctx, query, field))
}

pub fn rank(ctx: &Context, domain: Domain, query: &str) -> Result<()> {
    fn run<E: Render + Searchable + Serialize>(repo: &Repository<E>, ctx: &Context, query: &str) -> Result<()> {
        let ranked = repo.ranked(query);
        ctx.emit(&ranked, || {
            if ranked.is_empty() {
                return "No matches.".to_string();
            }
            ranked
                .iter()
                .map(|hit| format!("{:>4}  {}", hit.score, hit.entry.summary_line()))
                .collect::<Vec<_>>()
                .join("\n")
        })
    }
    with_repository!(domain, run(ctx, query))
}

pub fn category(ctx: &Context, domain: Domain, names: &[String]) -> Result<()> {
    fn run<E: Render + Serialize>(repo: &Repository<E>, ctx: &Context, domain: Domain, names: &[String]) -> Result<()> {
        let categories = names
            .iter()
            .map(|name| {
                <E::Category as Category>::parse(name)
                    .ok_or_else(|| anyhow!("unknown {} category: {}", domain, name))
            })
            .collect::<Result<Vec<_>>>()?;
        let hits = repo.filter_by_category(&categories);
        ctx.emit(&hits, || lines(&hits))
    }
    with_repository!(domain, run(ctx, domain, names))
}

pub fn categories(ctx: &Context, domain: Domain) -> Result<()> {
    fn run<E: Render>(repo: &Repository<E>, ctx: &Context) -> Result<()> {
        let names: Vec<&str> = repo.categories().iter().map(|c| c.as_str()).collect();
        ctx.emit(&names, || names.join("\n"))
    }
    with_repository!(domain, run(ctx))
}

pub fn count(ctx: &Context, domain: Option<Domain>) -> Result<()> {
    let catalog = Catalog::global();
    match domain {
        Some(domain) => {
            let count = catalog.count(domain);
            ctx.emit(&count, || count.to_string())
        }
        None => {
            let counts: serde_json::Map<String, serde_json::Value> = catalog
                .counts()
                .into_iter()
                .map(|(domain, count)| (domain.to_string(), count.into()))
                .collect();
            ctx.emit(&counts, || {
                catalog
                    .counts()
                    .iter()
                    .map(|(domain, count)| format!("{:<12} {}", domain, count))
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
    }
}

fn find_hits(ctx: &Context, query: &str) -> Vec<CatalogHit<'static>> {
    Catalog::global().search_all_with(ctx.config.query, query)
}

pub fn find(ctx: &Context, query: &str) -> Result<()> {
    let hits = find_hits(ctx, query);
    ctx.emit(&hits, || {
        if hits.is_empty() {
            return "No matches.".to_string();
        }
        hits.iter()
            .map(|hit| format!("{:<12} {:<28} {}", hit.domain, hit.id, hit.name))
            .collect::<Vec<_>>()
            .join("\n")
    })
}

/// One level of an educational topic; the configured default when `level` is `None`.
pub fn level(ctx: &Context, id: &str, level: Option<u8>) -> Result<()> {
    let level = match level {
        Some(number) => ComplexityLevel::try_from(number)?,
        None => ctx.config.default_level,
    };
    let Some(content) = education_repository().get(id) else {
        return ctx.in_development(Domain::Education, id);
    };
    let Some(view) = content.level(level) else {
        return ctx.in_development(Domain::Education, id);
    };
    ctx.emit(view, || render_level(content, level, view))
}

pub fn region(ctx: &Context, region_id: &str) -> Result<()> {
    let availability = get_region_content(region_id);
    ctx.emit(&availability, || match availability.content() {
        Some(content) => content.detail(),
        None => IN_DEVELOPMENT_MESSAGE.to_string(),
    })
}

#[derive(Serialize)]
struct Interpretation<'a> {
    test: &'a str,
    value: f64,
    unit: Option<&'a str>,
    flag: &'static str,
    critical: bool,
}

/// Classify a result for a lab test given by id or name.
pub fn interpret(ctx: &Context, test: &str, value: f64, sex: Sex) -> Result<()> {
    let Some(lab) = get_lab_test(test).or_else(|| get_lab_test_by_name(test)) else {
        return ctx.in_development(Domain::LabTests, test);
    };
    let Some(flag) = lab.interpret(value, sex) else {
        bail!("{} is not a finite number", value);
    };
    let range = lab.reference_range_for(sex);
    let result = Interpretation {
        test: &lab.id,
        value,
        unit: range.map(|r| r.unit.as_str()),
        flag: flag.label(),
        critical: flag.is_critical(),
    };
    ctx.emit(&result, || {
        let mut text = format!("{} {}: {}", lab.name, value, flag.label());
        if let Some(range) = range {
            text.push_str(&format!(" (reference {} - {} {})", range.low, range.high, range.unit));
        }
        if flag.is_critical() {
            text.push_str("\nCritical value: needs immediate attention.");
        }
        text
    })
}

// =============================================================================
// Validation and snapshots
// =============================================================================

/// Validate the built-in catalog. Returns whether it had no errors.
pub fn validate(ctx: &Context) -> Result<bool> {
    let report = validate_catalog(Catalog::global());
    ctx.emit(&report, || {
        let mut text: Vec<String> = report.issues.iter().map(|i| i.to_string()).collect();
        text.push(format!(
            "{} errors, {} warnings",
            report.errors().count(),
            report.warnings().count()
        ));
        text.join("\n")
    })?;
    Ok(report.is_valid())
}

#[derive(Serialize)]
struct ExportSummary<'a> {
    domain: Domain,
    entries: usize,
    path: &'a Path,
}

pub async fn export(ctx: &Context, domain: Domain, path: &Path) -> Result<()> {
    async fn save<E: DomainEntry + Clone>(ctx: &Context, repo: &Repository<E>, path: &Path) -> Result<()> {
        ContentSnapshot::from_repository(repo)
            .save_json(path)
            .await
            .with_context(|| format!("Failed to export to {}", path.display()))?;
        let summary = ExportSummary {
            domain: E::DOMAIN,
            entries: repo.count(),
            path,
        };
        ctx.emit(&summary, || {
            format!("Exported {} {} entries to {}", summary.entries, summary.domain, path.display())
        })
    }
    match domain {
        Domain::Oncology => save(ctx, oncology_repository(), path).await,
        Domain::LabTests => save(ctx, lab_test_repository(), path).await,
        Domain::LabPanels => save(ctx, lab_panel_repository(), path).await,
        Domain::Education => save(ctx, education_repository(), path).await,
        Domain::Regions => save(ctx, region_repository(), path).await,
    }
}

/// Load a snapshot and validate its entries against the catalog.
///
/// The snapshot's own ids count as known, so references between imported
/// entries are not reported as dangling.
pub async fn import(ctx: &Context, domain: Option<Domain>, path: &Path) -> Result<bool> {
    async fn load<E: DomainEntry + Validate>(ctx: &Context, path: &Path) -> Result<bool> {
        let repo = ContentSnapshot::<E>::load_json(path)
            .await
            .with_context(|| format!("Failed to import {}", path.display()))?
            .into_repository();

        let mut known: HashSet<&str> = Catalog::global().known_ids();
        known.extend(repo.ids());
        let report = validate_repository(&repo, &known);

        ctx.emit(&report, || {
            let mut text: Vec<String> = report.issues.iter().map(|i| i.to_string()).collect();
            text.push(format!(
                "Imported {} {} entries: {} errors, {} warnings",
                repo.count(),
                E::DOMAIN,
                report.errors().count(),
                report.warnings().count()
            ));
            text.join("\n")
        })?;
        Ok(report.is_valid())
    }

    let info = peek_domain(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if let Some(expected) = domain {
        if expected != info.domain {
            bail!("{} holds {} entries, not {}", path.display(), info.domain, expected);
        }
    }

    match info.domain {
        Domain::Oncology => load::<OncologyCondition>(ctx, path).await,
        Domain::LabTests => load::<LabTest>(ctx, path).await,
        Domain::LabPanels => load::<LabPanel>(ctx, path).await,
        Domain::Education => load::<EducationalContent>(ctx, path).await,
        Domain::Regions => load::<RegionContent>(ctx, path).await,
    }
}
