use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use platecost_catalog::{CatalogSource, Catalogs, FixtureSource, JsonFileSource, RecipeGraph};
use platecost_core::{Config, MenuItem, Report, Severity};
use platecost_engine::{validate, CostResolver, CostSheet, MenuItemDraft, PricingBreakdown, ResolveError};

/// PlateCost - recipe costing, allergens and menu pricing
#[derive(Parser)]
#[command(name = "platecost")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: platecost.toml)
    #[arg(short, long, global = true, env = "PLATECOST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the catalogs come from
#[derive(Args, Debug, Clone)]
struct CatalogArgs {
    /// Catalog snapshot JSON (default: [catalog].snapshot from config)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Use the built-in demo catalog
    #[arg(long, conflicts_with = "snapshot")]
    demo: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost every recipe in the catalog
    Costs {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Write the cost sheet as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Suggest a selling price for a recipe
    Price {
        /// Recipe id
        recipe: String,

        #[command(flatten)]
        catalog: CatalogArgs,

        /// Menu item name (default: recipe name)
        #[arg(short, long, requires = "menu_output")]
        name: Option<String>,

        /// Write a menu item at the suggested price
        #[arg(long)]
        menu_output: Option<PathBuf>,
    },

    /// Check the catalog for problems that silently cost zero
    Check {
        #[command(flatten)]
        catalog: CatalogArgs,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Show which recipes change cost when a (sub-)recipe changes
    Impact {
        /// Recipe id to analyze
        recipe: String,

        #[command(flatten)]
        catalog: CatalogArgs,
    },

    /// Write a default platecost.toml
    Init {
        /// Where to write the config
        #[arg(short, long, default_value = "platecost.toml")]
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config if specified
    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new("platecost.toml").exists() {
        Config::from_file(Path::new("platecost.toml"))?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    tracing::debug!(
        currency = %config.currency,
        snapshot = ?config.snapshot_path(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Costs { catalog, output } => costs_command(&config, &catalog, output.as_deref(), cli.verbose),
        Commands::Price {
            recipe,
            catalog,
            name,
            menu_output,
        } => price_command(&config, &catalog, &recipe, name, menu_output.as_deref()),
        Commands::Check {
            catalog,
            output,
            markdown,
        } => check_command(&config, &catalog, &output, markdown.as_deref(), cli.verbose),
        Commands::Impact { recipe, catalog } => impact_command(&config, &catalog, &recipe),
        Commands::Init { path } => init_command(&path),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load catalogs from the demo fixture, the `--snapshot` flag or the config
fn load_catalogs(config: &Config, args: &CatalogArgs, verbose: bool) -> Result<Catalogs> {
    if args.demo {
        if verbose {
            eprintln!("{}", "Using built-in demo catalog".cyan());
        }
        return Ok(FixtureSource::demo().load()?);
    }

    let path = args
        .snapshot
        .clone()
        .or_else(|| config.snapshot_path())
        .ok_or_else(|| {
            anyhow!("No catalog snapshot given. Pass --snapshot, set [catalog].snapshot in platecost.toml, or use --demo.")
        })?;

    if verbose {
        eprintln!("{} {}", "Loading snapshot from:".cyan(), path.display());
    }

    let catalogs = JsonFileSource::new(&path)
        .load()
        .with_context(|| format!("Failed to load catalog snapshot {}", path.display()))?;

    if verbose {
        eprintln!(
            "  {} recipes, {} inventory items",
            catalogs.recipes.len(),
            catalogs.inventory.len()
        );
    }

    Ok(catalogs)
}

/// Costs command - one resolution pass over the whole catalog
fn costs_command(config: &Config, args: &CatalogArgs, output: Option<&Path>, verbose: bool) -> Result<()> {
    let catalogs = load_catalogs(config, args, verbose)?;

    let sheet = match CostSheet::build(&catalogs.recipes, &catalogs.inventory, &config.currency) {
        Ok(sheet) => sheet,
        Err(err) => {
            print_cycle(&err);
            std::process::exit(1);
        }
    };

    print_cost_sheet(&sheet);

    if let Some(path) = output {
        std::fs::write(path, sheet.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{} {}", "Cost sheet saved to:".green(), path.display());
    }

    Ok(())
}

/// Price command - suggested selling price under the configured strategy
fn price_command(
    config: &Config,
    args: &CatalogArgs,
    recipe_id: &str,
    name: Option<String>,
    menu_output: Option<&Path>,
) -> Result<()> {
    let catalogs = load_catalogs(config, args, false)?;
    let recipe = catalogs
        .recipes
        .get(recipe_id)
        .ok_or_else(|| anyhow!("Recipe '{}' not found in catalog", recipe_id))?;

    let mut resolver = CostResolver::new(&catalogs.recipes, &catalogs.inventory);
    let costing = match resolver.costing(recipe_id) {
        Ok(costing) => costing,
        Err(err) => {
            print_cycle(&err);
            std::process::exit(1);
        }
    };

    let pricing = PricingBreakdown::compute(costing.cost_per_portion, &config.costing);
    print_pricing(&costing.name, &config.currency, &pricing, &costing.allergens);

    if pricing.is_degenerate() {
        eprintln!(
            "{}",
            "⚠ Labor, overhead and profit add up to 100% or more; no price can be suggested".yellow().bold()
        );
    }

    if let Some(path) = menu_output {
        let mut draft = MenuItemDraft::from_pricing(recipe, &pricing);
        if let Some(name) = name {
            draft = draft.with_name(name);
        }

        let item: MenuItem = draft.into_menu_item(chrono::Utc::now());
        std::fs::write(path, serde_json::to_string_pretty(&item)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{} {} ({})", "Menu item saved to:".green(), path.display(), item.id);
    }

    Ok(())
}

/// Check command - validate the catalog
fn check_command(
    config: &Config,
    args: &CatalogArgs,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let catalogs = load_catalogs(config, args, verbose)?;

    if verbose {
        eprintln!("{}", "Running catalog checks...".cyan());
    }

    let diagnostics = validate(&catalogs.recipes, &catalogs.inventory, config);
    let report = Report::from_diagnostics(diagnostics)
        .with_counts(catalogs.recipes.len(), catalogs.inventory.len())
        .with_metadata(serde_json::json!({
            "currency": config.currency,
            "target_food_cost_percentage": config.costing.target_food_cost_percentage(),
        }));

    print_report_summary(&report);

    report
        .save_to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!("{} {}", "Report saved to:".green(), output.display());

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))
            .with_context(|| format!("Failed to write {}", md_path.display()))?;
        eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
    }

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Impact command - every recipe whose cost moves with this one
fn impact_command(config: &Config, args: &CatalogArgs, recipe_id: &str) -> Result<()> {
    let catalogs = load_catalogs(config, args, false)?;
    if !catalogs.recipes.contains(recipe_id) {
        return Err(anyhow!("Recipe '{}' not found in catalog", recipe_id));
    }

    let graph = RecipeGraph::from_catalog(&catalogs.recipes);
    let downstream = graph.downstream(recipe_id);

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Cost Impact Analysis".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();
    println!("{} {}", "Recipe:".bold(), recipe_id.green());
    println!("{} {}", "Affected recipes:".bold(), downstream.len());
    println!();

    if downstream.is_empty() {
        println!("{}", "✓ No other recipe uses this one".green());
    } else {
        // Dependency order when the graph allows one
        let ordered: Vec<String> = match graph.topological_sort() {
            Some(order) => order.into_iter().filter(|id| downstream.contains(id)).collect(),
            None => downstream,
        };

        for (i, id) in ordered.iter().enumerate() {
            let name = catalogs.recipes.get(id).map(|r| r.name.as_str()).unwrap_or("");
            println!("  {}. {} {}", i + 1, id.yellow(), name);
        }

        println!();
        println!("{}", "⚠ Prices of these recipes should be reviewed after a change".yellow().bold());
    }

    println!();
    Ok(())
}

/// Init command - write a default config
fn init_command(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(anyhow!("{} already exists", path.display()));
    }

    Config::default().save_to_file(path)?;
    println!("{} {}", "Config written to:".green(), path.display());
    Ok(())
}

fn print_cycle(err: &ResolveError) {
    let ResolveError::CyclicReference { chain } = err;
    eprintln!("{} {}", "✗ Cyclic sub-recipe reference:".red().bold(), chain.join(" -> "));
    eprintln!("  Run `platecost check` for every cycle in the catalog.");
}

fn print_cost_sheet(sheet: &CostSheet) {
    println!("\n{}", "=".repeat(78).bright_blue());
    println!("{}", "Recipe Cost Sheet".bold().bright_blue());
    println!("{}", "=".repeat(78).bright_blue());
    println!();

    println!(
        "{:<14} {:<28} {:>12} {:>12}  {}",
        "ID".bold(),
        "Name".bold(),
        format!("Batch ({})", sheet.currency).bold(),
        "Per portion".bold(),
        "Allergens".bold()
    );

    for row in &sheet.recipes {
        let id = if row.is_sub_recipe {
            row.recipe_id.cyan()
        } else {
            row.recipe_id.normal()
        };

        let allergens = if row.allergens.is_empty() {
            "-".dimmed()
        } else {
            row.allergens.join(", ").yellow()
        };

        println!(
            "{:<14} {:<28} {:>12.2} {:>12.2}  {}",
            id, row.name, row.total_batch_cost, row.cost_per_portion, allergens
        );
    }

    println!();
    println!("{}", "=".repeat(78).bright_blue());
}

fn print_pricing(name: &str, currency: &str, pricing: &PricingBreakdown, allergens: &[String]) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", format!("Pricing: {}", name).bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("  Cost per portion:  {:.2} {}", pricing.cost_per_portion, currency);
    println!("  Labor:             {}%", pricing.labor_cost_percentage);
    println!("  Overhead:          {}%", pricing.overhead_cost_percentage);
    println!("  Target profit:     {}%", pricing.target_profit_margin_percentage);
    println!("  Target food cost:  {}%", pricing.target_food_cost_percentage);
    println!();

    if pricing.is_degenerate() {
        println!("  Suggested price:   {}", "n/a".red().bold());
    } else {
        println!(
            "  Suggested price:   {}",
            format!("{:.2} {}", pricing.suggested_price, currency).green().bold()
        );
    }

    if !allergens.is_empty() {
        println!("  Allergens:         {}", allergens.join(", ").yellow());
    }

    println!();
}

fn print_report_summary(report: &Report) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Catalog Check Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!(
        "Checked: {} recipes, {} inventory items",
        report.summary.recipes_checked, report.summary.inventory_items
    );
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total diagnostics: {}", report.summary.total);

    if report.summary.errors > 0 {
        println!("  Errors:   {}", format!("{}", report.summary.errors).red().bold());
    } else {
        println!("  Errors:   {}", format!("{}", report.summary.errors).green());
    }

    if report.summary.warnings > 0 {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).yellow());
    } else {
        println!("  Warnings: {}", format!("{}", report.summary.warnings).green());
    }

    println!("  Info:     {}", report.summary.info);
    println!();

    if report.diagnostics.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Diagnostics:".bold());
        for diag in &report.diagnostics {
            let severity_str = match diag.severity {
                Severity::Error => "ERROR".red().bold(),
                Severity::Warn => "WARN".yellow().bold(),
                Severity::Info => "INFO".cyan(),
            };

            println!("  [{}] {}: {}", severity_str, diag.code, diag.message);

            if let Some(loc) = &diag.location {
                println!("    at {}", loc);
            }

            if let Some(exp) = &diag.expected {
                println!("    Expected: {}", exp);
            }
            if let Some(act) = &diag.actual {
                println!("    Actual:   {}", act);
            }

            if !diag.impact.is_empty() {
                println!("    Impact: {} recipes", diag.impact.len());
                for recipe in &diag.impact {
                    println!("      - {}", recipe);
                }
            }
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
fn generate_markdown_report(report: &Report) -> String {
    let mut md = String::new();

    md.push_str("# Catalog Check Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Recipes checked: {}\n", report.summary.recipes_checked));
    md.push_str(&format!("- Inventory items: {}\n", report.summary.inventory_items));
    md.push_str(&format!("- Total diagnostics: {}\n", report.summary.total));
    md.push_str(&format!("- Errors: {}\n", report.summary.errors));
    md.push_str(&format!("- Warnings: {}\n", report.summary.warnings));
    md.push_str(&format!("- Info: {}\n", report.summary.info));
    md.push('\n');

    if report.diagnostics.is_empty() {
        md.push_str("✅ **No issues found!**\n");
    } else {
        md.push_str("## Diagnostics\n\n");

        for diag in &report.diagnostics {
            let severity_emoji = match diag.severity {
                Severity::Error => "❌",
                Severity::Warn => "⚠️",
                Severity::Info => "ℹ️",
            };

            md.push_str(&format!("### {} {} - {}\n\n", severity_emoji, diag.severity, diag.code));
            md.push_str(&format!("{}\n\n", diag.message));

            if let Some(loc) = &diag.location {
                md.push_str(&format!("**Location:** `{}`\n\n", loc));
            }

            if let Some(exp) = &diag.expected {
                md.push_str(&format!("**Expected:** `{}`\n\n", exp));
            }
            if let Some(act) = &diag.actual {
                md.push_str(&format!("**Actual:** `{}`\n\n", act));
            }

            if !diag.impact.is_empty() {
                md.push_str(&format!("**Impact:** {} recipes\n\n", diag.impact.len()));
                for recipe in &diag.impact {
                    md.push_str(&format!("- {}\n", recipe));
                }
                md.push('\n');
            }
        }
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use platecost_core::{Diagnostic, DiagnosticCode, Location};

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn price_name_needs_menu_output() {
        let err = Cli::try_parse_from(["platecost", "price", "rec-001", "--demo", "--name", "Koshari"])
            .err()
            .unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        assert!(Cli::try_parse_from([
            "platecost", "price", "rec-001", "--demo", "--name", "Koshari", "--menu-output", "menu.json",
        ])
        .is_ok());
    }

    #[test]
    fn markdown_lists_diagnostics() {
        let report = Report::from_diagnostics(vec![Diagnostic::of(
            DiagnosticCode::RefMissingInventoryItem,
            "Line rec-1#2 references unknown inventory item 'inv-9'",
        )
        .with_location(Location::with_line("rec-1", 2))
        .with_impact(vec!["rec-1".to_string(), "rec-7".to_string()])]);

        let md = generate_markdown_report(&report);
        assert!(md.contains("REF_MISSING_INVENTORY_ITEM"));
        assert!(md.contains("**Location:** `rec-1#2`"));
        assert!(md.contains("**Impact:** 2 recipes"));
        assert!(md.contains("- Warnings: 1"));
    }

    #[test]
    fn markdown_for_clean_catalog() {
        let md = generate_markdown_report(&Report::new());
        assert!(md.contains("No issues found"));
    }

    #[test]
    fn demo_catalog_loads_without_snapshot() {
        let args = CatalogArgs {
            snapshot: None,
            demo: true,
        };

        let catalogs = load_catalogs(&Config::default(), &args, false).unwrap();
        assert_eq!(catalogs.recipes.len(), 4);
    }

    #[test]
    fn missing_snapshot_is_an_error() {
        let args = CatalogArgs {
            snapshot: None,
            demo: false,
        };

        assert!(load_catalogs(&Config::default(), &args, false).is_err());
    }
}
