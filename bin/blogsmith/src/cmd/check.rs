//! Check command - validate configuration and posts without writing

use std::path::Path;

use blogsmith_core::BuildConfig;
use blogsmith_generator::{ContentLoader, StyleCompiler};
use blogsmith_parser::SyntaxHighlighter;
use color_eyre::eyre::{Result, WrapErr, bail};

use super::load_config;

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Errors are problems that would fail a build. Warnings are problems the
/// build tolerates, such as skipped posts; `strict` treats them as errors.
pub fn run(root: &Path, strict: bool) -> Result<()> {
    tracing::info!(?root, strict, "Checking configuration and posts");

    println!("Checking configuration...");
    let config = load_config(root)?;
    println!("  ✓ Configuration valid");

    let result = validate(&config)?;

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn validate(config: &BuildConfig) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    println!("\nChecking posts...");
    check_posts(config, &mut result)?;

    println!("\nChecking stylesheet...");
    check_style(config, &mut result);

    println!("\nChecking templates and assets...");
    check_files(config, &mut result);

    println!("\nChecking configuration values...");
    check_config_values(config, &mut result);

    Ok(result)
}

fn check_posts(config: &BuildConfig, result: &mut ValidationResult) -> Result<()> {
    if !config.posts_dir.is_dir() {
        result.add_warning(format!(
            "Posts directory {} does not exist",
            config.posts_dir.display()
        ));
        return Ok(());
    }

    let collection = ContentLoader::new(&config.posts_dir)
        .load()
        .wrap_err("Failed to list posts")?;

    for skipped in &collection.skipped {
        result.add_warning(format!("{}: {}", skipped.path.display(), skipped.reason));
    }

    let highlighter = SyntaxHighlighter::default();
    for doc in &collection.documents {
        for lang in fence_languages(&doc.body) {
            if !highlighter.is_supported(lang) {
                result.add_warning(format!(
                    "{}: code language `{lang}` is not highlighted",
                    doc.source.display()
                ));
            }
        }
    }

    if collection.skipped.is_empty() {
        println!(
            "  ✓ {} posts valid ({} drafts)",
            collection.documents.len(),
            collection.drafts
        );
    } else {
        println!(
            "  ✗ {} posts valid, {} skipped ({} drafts)",
            collection.documents.len(),
            collection.skipped.len(),
            collection.drafts
        );
    }

    Ok(())
}

/// Languages declared on the fenced code blocks of a markdown body.
fn fence_languages(body: &str) -> Vec<&str> {
    let mut langs = Vec::new();
    let mut open: Option<&str> = None;

    for line in body.lines() {
        let trimmed = line.trim_start();
        let fence = if trimmed.starts_with("```") {
            "```"
        } else if trimmed.starts_with("~~~") {
            "~~~"
        } else {
            continue;
        };

        match open {
            Some(current) if current == fence => open = None,
            Some(_) => {}
            None => {
                open = Some(fence);
                let info = trimmed.trim_start_matches(['`', '~']);
                if let Some(lang) = info.split_whitespace().next() {
                    langs.push(lang);
                }
            }
        }
    }

    langs
}

fn check_style(config: &BuildConfig, result: &mut ValidationResult) {
    match StyleCompiler::new(&config.style_entry).compile() {
        Ok(css) => println!("  ✓ Stylesheet compiles ({} bytes)", css.len()),
        Err(e) => {
            println!("  ✗ Stylesheet does not compile");
            result.add_error(e.to_string());
        }
    }
}

fn check_files(config: &BuildConfig, result: &mut ValidationResult) {
    for name in ["post.html", "index.html"] {
        let path = config.template_dir.join(name);
        if path.is_file() {
            println!("  ✓ {}", path.display());
        } else {
            result.add_warning(format!(
                "Template {} not found, the built-in default will be used",
                path.display()
            ));
        }
    }

    for name in &config.assets {
        let path = config.assets_dir.join(name);
        if path.is_file() {
            println!("  ✓ {}", path.display());
        } else {
            result.add_warning(format!("Asset {} not found", path.display()));
        }
    }
}

fn check_config_values(config: &BuildConfig, result: &mut ValidationResult) {
    if config.site_url.contains("example.com") {
        result.add_warning("site_url is still the example.com placeholder");
    }

    if !config.site_url.starts_with("http://") && !config.site_url.starts_with("https://") {
        result.add_warning(format!("site_url {} is not an http(s) URL", config.site_url));
    }

    if config.analytics().is_none() && !config.analytics_provider.eq_ignore_ascii_case("none") {
        result.add_warning(format!(
            "analytics_provider {} is unknown or has no analytics_id",
            config.analytics_provider
        ));
    }

    let highlighter = SyntaxHighlighter::default();
    if !highlighter
        .available_themes()
        .contains(&config.syntax_theme.as_str())
    {
        result.add_warning(format!(
            "syntax_theme {} is not bundled, the default theme will be used",
            config.syntax_theme
        ));
    }

    if !result.has_warnings() {
        println!("  ✓ Configuration values look good");
    }
}
