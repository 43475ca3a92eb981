use horadric_catalog::builtin_stats::BUILTIN_STATS;
use horadric_import::{PropertyResolver, StatRegistry, extract_value, template_key};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use crate::CliError;

use super::Context;

/// Resolve one property line against the catalog's stat registry and show
/// how it was matched. Nothing is written.
pub(crate) fn run_resolve(ctx: &Context, text: &str, hint: Option<&str>) -> Result<(), CliError> {
    let conn = ctx.open_catalog()?;
    let mut registry = StatRegistry::load(&conn)?;
    if registry.count() == 0 {
        log::debug!("Stat registry is empty; probing against the built-in stats");
        registry = StatRegistry::from_stats(BUILTIN_STATS.iter().map(|s| s.to_stat_code()).collect());
    }

    let mut resolver = PropertyResolver::new(&registry);
    let assignment = resolver.resolve_text(text, hint);

    log::info!("  Text:      {text}");
    log::info!("  Template:  {}", template_key(text));
    if let Some((min, max)) = extract_value(text) {
        log::info!("  Value:     {min}..{max}");
    }

    if assignment.is_raw() {
        log::info!(
            "  Result:    {}",
            "no matching stat (kept as raw text)".if_supports_color(Stdout, |t| t.yellow()),
        );
        return Ok(());
    }

    let name = registry
        .resolve(&assignment.code)
        .map(|s| s.name.clone())
        .unwrap_or_default();
    log::info!(
        "  Result:    {} ({}) {}..{}",
        assignment.code.if_supports_color(Stdout, |t| t.green()),
        name,
        assignment.min,
        assignment.max,
    );
    if let Some(param) = &assignment.param {
        log::info!("  Param:     {param}");
    }
    Ok(())
}
